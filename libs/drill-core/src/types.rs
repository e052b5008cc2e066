//! Core types for the drill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::VecDeque;

/// Number of recent outcomes kept per card.
pub const HISTORY_CAPACITY: usize = 10;

/// Lowest (easiest) difficulty level.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest (hardest) difficulty level.
pub const MAX_DIFFICULTY: u8 = 5;

/// Rolling window of recent attempt outcomes, oldest first.
///
/// Serialized as an array of `0`/`1` integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptHistory {
    outcomes: VecDeque<bool>,
}

impl AttemptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome, evicting the oldest one once the window is full.
    pub fn push(&mut self, success: bool) {
        if self.outcomes.len() >= HISTORY_CAPACITY {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(success);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of successful outcomes in the window.
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|&&success| success).count()
    }

    /// The newest `n` outcomes, oldest first. Shorter if fewer were recorded.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = bool> + '_ {
        let skip = self.outcomes.len().saturating_sub(n);
        self.outcomes.iter().copied().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.outcomes.iter().copied()
    }
}

impl FromIterator<bool> for AttemptHistory {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut history = Self::new();
        for success in iter {
            history.push(success);
        }
        history
    }
}

impl Serialize for AttemptHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.outcomes.iter().map(|&success| u8::from(success)))
    }
}

/// Question/answer content as supplied by a deck source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub question: String,
    pub answer: String,
}

/// A card with its accumulated performance record.
///
/// Deserializing goes through [`crate::deck::upgrade_record`], so stored
/// records of any age come back repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "serde_json::Value")]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(rename = "lastAttempts")]
    pub attempt_history: AttemptHistory,
    #[serde(rename = "attempts")]
    pub total_attempts: u64,
    pub success_rate: f64,
    pub last_seen: Option<DateTime<Utc>>,
    pub difficulty: u8,
}

impl Card {
    /// A card that has never been attempted.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            attempt_history: AttemptHistory::new(),
            total_attempts: 0,
            success_rate: 0.0,
            last_seen: None,
            difficulty: MIN_DIFFICULTY,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_seen.is_none()
    }
}

impl From<CardContent> for Card {
    fn from(content: CardContent) -> Self {
        Self::new(content.question, content.answer)
    }
}

/// How plain "next" navigation picks the following card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Walk the deck in order, wrapping at the end.
    Linear,
    /// Pick by scheduling priority.
    Priority,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::Linear
    }
}

impl Navigation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Priority => "priority",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(Self::Linear),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

/// Session behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Answers allowed per card before it is marked failed.
    pub attempts_per_card: u32,
    pub navigation: Navigation,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            attempts_per_card: 3,
            navigation: Navigation::default(),
        }
    }
}

/// Aggregate progress across a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckProgress {
    /// Sum of every card's lifetime attempt count.
    pub total_attempts: u64,
    /// Successes still inside the cards' history windows.
    pub successful_attempts: u64,
    pub last_studied: Option<DateTime<Utc>>,
}
