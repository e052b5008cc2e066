//! Card selection.
//!
//! Two independent ways to pick the next card:
//! - [`select_next`] ranks the whole deck by priority,
//! - [`linear_next`] / [`linear_previous`] step through the deck in order.

use crate::error::{DrillError, Result};
use crate::types::Card;
use std::cmp::Ordering;

/// Success-rate gap (percentage points) that must be exceeded before it
/// affects ordering.
pub const SUCCESS_RATE_GAP: f64 = 10.0;

/// Order two cards by how urgently they should be shown. `Less` means `a`
/// comes first.
///
/// Never-seen cards come before everything else. Among seen cards, harder
/// ones come first; then the weaker success rate, but only when the gap
/// exceeds [`SUCCESS_RATE_GAP`]; then the one seen longest ago.
pub fn compare_priority(a: &Card, b: &Card) -> Ordering {
    let (a_seen, b_seen) = match (a.last_seen, b.last_seen) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a_seen), Some(b_seen)) => (a_seen, b_seen),
    };

    b.difficulty
        .cmp(&a.difficulty)
        .then_with(|| compare_success_rate(a.success_rate, b.success_rate))
        .then_with(|| a_seen.cmp(&b_seen))
}

fn compare_success_rate(a: f64, b: f64) -> Ordering {
    if (a - b).abs() > SUCCESS_RATE_GAP {
        a.total_cmp(&b)
    } else {
        Ordering::Equal
    }
}

/// Index of the highest-priority card. Ties keep deck order.
pub fn select_next_index(cards: &[Card]) -> Result<usize> {
    let index = cards
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare_priority(a, b))
        .map(|(index, _)| index)
        .ok_or(DrillError::EmptyDeck)?;

    tracing::debug!(index, deck_size = cards.len(), "selected card by priority");
    Ok(index)
}

/// The highest-priority card. The deck itself is left untouched.
pub fn select_next(cards: &[Card]) -> Result<&Card> {
    select_next_index(cards).map(|index| &cards[index])
}

/// Step forward, wrapping from the last card back to the first.
pub fn linear_next(current: usize, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(DrillError::EmptyDeck);
    }
    if current >= len - 1 {
        Ok(0)
    } else {
        Ok(current + 1)
    }
}

/// Step back. Stays put at the first card.
pub fn linear_previous(current: usize, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(DrillError::EmptyDeck);
    }
    Ok(current.min(len - 1).saturating_sub(1))
}
