//! Core of the flashcard drill.
//!
//! Provides:
//! - Answer similarity scoring (case-insensitive Levenshtein)
//! - Per-card performance tracking (rolling history, success rate, difficulty)
//! - Card scheduling (priority selection and linear navigation)
//! - Deck seeding, lenient rehydration and key/blob persistence
//! - Session state for a drill over one deck

pub mod deck;
pub mod error;
pub mod matching;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod tracker;
pub mod types;

pub use deck::{parse_source, upgrade_record, Deck};
pub use error::{DrillError, ParseError, Result};
pub use matching::{assess, levenshtein_distance, score, Assessment, Verdict, SUCCESS_THRESHOLD};
pub use scheduler::{
    compare_priority, linear_next, linear_previous, select_next, select_next_index,
};
pub use session::{AnswerOutcome, Session};
pub use store::{
    corrupt_key, DeckLoader, DeckSource, DeckStore, DirectorySource, FileStore, MemorySource,
    MemoryStore,
};
pub use tracker::{adjust_difficulty, record, record_at};
pub use types::{
    AttemptHistory, Card, CardContent, DeckProgress, Navigation, SessionSettings, HISTORY_CAPACITY,
    MAX_DIFFICULTY, MIN_DIFFICULTY,
};
