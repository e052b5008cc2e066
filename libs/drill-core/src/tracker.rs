//! Per-card performance tracking.
//!
//! Every scored attempt lands in the card's rolling history. The success rate
//! is recomputed from that window and difficulty moves one step after three
//! identical outcomes in a row.

use crate::matching::SUCCESS_THRESHOLD;
use crate::types::{Card, MAX_DIFFICULTY, MIN_DIFFICULTY};
use chrono::{DateTime, Utc};

/// Length of the streak that moves difficulty.
const STREAK_WINDOW: usize = 3;

/// Record an attempt scored `similarity` against `card`, stamped with the
/// current time.
pub fn record(card: &mut Card, similarity: u8) {
    record_at(card, similarity, Utc::now());
}

/// Record an attempt scored `similarity` against `card` at `now`.
pub fn record_at(card: &mut Card, similarity: u8, now: DateTime<Utc>) {
    let success = similarity >= SUCCESS_THRESHOLD;

    card.attempt_history.push(success);
    card.total_attempts += 1;
    card.success_rate = success_rate(card);
    card.last_seen = Some(now);

    let before = card.difficulty;
    adjust_difficulty(card);

    tracing::debug!(
        question = %card.question,
        similarity,
        success,
        success_rate = card.success_rate,
        difficulty_before = before,
        difficulty = card.difficulty,
        "recorded attempt"
    );
}

/// Percentage of successes in the card's history window; 0 when empty.
pub fn success_rate(card: &Card) -> f64 {
    let history = &card.attempt_history;
    if history.is_empty() {
        return 0.0;
    }
    100.0 * history.successes() as f64 / history.len() as f64
}

/// Shift difficulty after three identical outcomes in a row.
///
/// Three successes make the card one step easier, three failures one step
/// harder, clamped to `MIN_DIFFICULTY..=MAX_DIFFICULTY`. Anything else leaves
/// it alone.
pub fn adjust_difficulty(card: &mut Card) {
    if card.attempt_history.len() < STREAK_WINDOW {
        return;
    }

    let successes = card
        .attempt_history
        .recent(STREAK_WINDOW)
        .filter(|&success| success)
        .count();

    if successes == STREAK_WINDOW {
        card.difficulty = card.difficulty.saturating_sub(1).max(MIN_DIFFICULTY);
    } else if successes == 0 {
        card.difficulty = card.difficulty.saturating_add(1).min(MAX_DIFFICULTY);
    }
}
