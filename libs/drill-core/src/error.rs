//! Error types for drill-core.

use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors that can occur while parsing a markdown deck.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing question at line {line}")]
    MissingQuestion { line: usize },

    #[error("missing answer at line {line}")]
    MissingAnswer { line: usize },
}

/// Errors surfaced by the drill core.
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("deck has no cards")]
    EmptyDeck,

    #[error("current card is already resolved")]
    CardResolved,

    #[error("no card at index {0}")]
    NoSuchCard(usize),

    #[error("invalid deck key: {0}")]
    InvalidKey(String),

    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_deck() {
        assert_eq!(DrillError::EmptyDeck.to_string(), "deck has no cards");
    }

    #[test]
    fn test_error_display_parse() {
        let error = DrillError::from(ParseError::MissingAnswer { line: 4 });
        assert_eq!(error.to_string(), "parse error: missing answer at line 4");
    }

    #[test]
    fn test_error_display_invalid_key() {
        let error = DrillError::InvalidKey("../etc".to_string());
        assert_eq!(error.to_string(), "invalid deck key: ../etc");
    }
}
