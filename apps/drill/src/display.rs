//! Text rendering for the terminal host.

use chrono::{DateTime, Utc};
use drill_core::{AnswerOutcome, Card, DeckProgress, Verdict};

/// Feedback line for a submitted answer.
pub fn feedback(outcome: &AnswerOutcome) -> String {
    let similarity = outcome.assessment().similarity;
    match outcome {
        AnswerOutcome::Accepted { assessment } => match assessment.verdict {
            Verdict::Perfect => "Perfect!".to_string(),
            Verdict::Correct => format!("Correct! Similarity: {similarity}%"),
            _ => format!("Very close! Similarity: {similarity}%. Accepted for now."),
        },
        AnswerOutcome::Retry { remaining, .. } => {
            format!("Try again. Similarity: {similarity}%. Remaining attempts: {remaining}")
        }
        AnswerOutcome::Failed { answer, .. } => format!("Wrong! Answer: {answer}"),
    }
}

/// Attempt history as dots, oldest first.
pub fn history(card: &Card) -> String {
    if card.attempt_history.is_empty() {
        return "No attempts yet".to_string();
    }
    card.attempt_history
        .iter()
        .map(|success| if success { '●' } else { '○' })
        .collect()
}

/// Coarse "time ago" description.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else if days == 1 {
        "yesterday".to_string()
    } else {
        format!("{days} days ago")
    }
}

/// Deck progress summary.
pub fn progress(deck_name: &str, progress: &DeckProgress, now: DateTime<Utc>) -> String {
    let last = match progress.last_studied {
        Some(then) => time_ago(then, now),
        None => "not studied yet".to_string(),
    };
    format!(
        "{} progress\n  Total attempts: {}\n  Successful attempts: {}\n  Last studied: {}",
        deck_title(deck_name),
        progress.total_attempts,
        progress.successful_attempts,
        last
    )
}

/// Human deck title: file extension dropped, first letter capitalised.
pub fn deck_title(name: &str) -> String {
    let stem = name
        .strip_suffix(".json")
        .or_else(|| name.strip_suffix(".md"))
        .unwrap_or(name);
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
