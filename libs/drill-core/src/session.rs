//! A drill session over a single deck.

use crate::deck::Deck;
use crate::error::{DrillError, Result};
use crate::matching::{assess, Assessment};
use crate::scheduler::{linear_next, linear_previous, select_next_index};
use crate::tracker::record_at;
use crate::types::{Card, DeckProgress, Navigation, SessionSettings};
use chrono::{DateTime, Utc};

/// What happened to a submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Close enough. The attempt was recorded as a success.
    Accepted { assessment: Assessment },
    /// Wrong, but attempts remain. Nothing was recorded.
    Retry {
        assessment: Assessment,
        remaining: u32,
    },
    /// Wrong with no attempts left. The attempt was recorded as a failure.
    Failed {
        assessment: Assessment,
        answer: String,
    },
}

impl AnswerOutcome {
    pub fn assessment(&self) -> Assessment {
        match self {
            Self::Accepted { assessment }
            | Self::Retry { assessment, .. }
            | Self::Failed { assessment, .. } => *assessment,
        }
    }

    /// Whether the card's stats changed and the deck needs saving.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::Retry { .. })
    }
}

/// Session state: the deck, the card on screen and its remaining attempts.
#[derive(Debug, Clone)]
pub struct Session {
    deck: Deck,
    settings: SessionSettings,
    current: Option<usize>,
    remaining_attempts: u32,
    resolved: bool,
}

impl Session {
    /// Start a session and show its first card: the head of the deck for
    /// linear navigation, the top-priority card otherwise.
    pub fn new(deck: Deck, settings: SessionSettings) -> Self {
        let mut session = Self {
            deck,
            remaining_attempts: settings.attempts_per_card,
            settings,
            current: None,
            resolved: false,
        };

        let first = match session.settings.navigation {
            Navigation::Linear => Some(0).filter(|_| !session.deck.is_empty()),
            Navigation::Priority => select_next_index(&session.deck.cards).ok(),
        };
        if let Some(index) = first {
            session.present(index);
        }
        session
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn current(&self) -> Option<&Card> {
        self.current.map(|index| &self.deck.cards[index])
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.remaining_attempts
    }

    /// Whether the card on screen has been answered or exhausted its attempts.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn progress(&self) -> DeckProgress {
        self.deck.progress()
    }

    /// Show the card at `index`, resetting its attempt counter.
    pub fn show(&mut self, index: usize) -> Result<&Card> {
        if self.deck.is_empty() {
            return Err(DrillError::EmptyDeck);
        }
        if index >= self.deck.len() {
            return Err(DrillError::NoSuchCard(index));
        }
        self.present(index);
        Ok(&self.deck.cards[index])
    }

    /// Advance using the configured navigation mode.
    pub fn next(&mut self) -> Result<&Card> {
        match self.settings.navigation {
            Navigation::Linear => self.next_linear(),
            Navigation::Priority => self.pick(),
        }
    }

    /// Step forward in deck order, wrapping at the end.
    pub fn next_linear(&mut self) -> Result<&Card> {
        let index = linear_next(self.current.unwrap_or(0), self.deck.len())?;
        self.show(index)
    }

    /// Step back in deck order. Stays on the first card.
    pub fn previous(&mut self) -> Result<&Card> {
        let index = linear_previous(self.current.unwrap_or(0), self.deck.len())?;
        self.show(index)
    }

    /// Jump to the card with the highest scheduling priority.
    pub fn pick(&mut self) -> Result<&Card> {
        let index = select_next_index(&self.deck.cards)?;
        self.show(index)
    }

    /// Swap in a different deck (after a reset, say) and show its first card.
    pub fn replace_deck(&mut self, deck: Deck) {
        *self = Self::new(deck, self.settings.clone());
    }

    /// Submit an answer for the card on screen.
    pub fn submit(&mut self, answer: &str) -> Result<AnswerOutcome> {
        self.submit_at(answer, Utc::now())
    }

    /// Submit an answer, recording any resolved attempt at `now`.
    pub fn submit_at(&mut self, answer: &str, now: DateTime<Utc>) -> Result<AnswerOutcome> {
        let index = self.current.ok_or(DrillError::EmptyDeck)?;
        if self.resolved {
            return Err(DrillError::CardResolved);
        }

        let card = &mut self.deck.cards[index];
        let assessment = assess(answer, &card.answer);

        if assessment.verdict.is_success() {
            record_at(card, assessment.similarity, now);
            self.resolved = true;
            return Ok(AnswerOutcome::Accepted { assessment });
        }

        self.remaining_attempts = self.remaining_attempts.saturating_sub(1);
        if self.remaining_attempts > 0 {
            return Ok(AnswerOutcome::Retry {
                assessment,
                remaining: self.remaining_attempts,
            });
        }

        record_at(card, assessment.similarity, now);
        self.resolved = true;
        Ok(AnswerOutcome::Failed {
            assessment,
            answer: card.answer.clone(),
        })
    }

    fn present(&mut self, index: usize) {
        self.current = Some(index);
        self.remaining_attempts = self.settings.attempts_per_card;
        self.resolved = false;
    }
}
