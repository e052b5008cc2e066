//! Decks: seeding from source content, rehydration from stored blobs and
//! aggregate progress.

use crate::error::Result;
use crate::parser;
use crate::types::{Card, CardContent, DeckProgress, MAX_DIFFICULTY, MIN_DIFFICULTY};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// An ordered set of cards identified by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            cards,
        }
    }

    /// Build a deck of never-attempted cards from source content.
    pub fn seed(name: impl Into<String>, contents: Vec<CardContent>) -> Self {
        Self::new(name, contents.into_iter().map(Card::from).collect())
    }

    /// Rehydrate a deck from a stored blob.
    ///
    /// Individual records are repaired field by field (see [`upgrade_record`]).
    /// Returns `None` only when the blob is not a JSON array at all.
    pub fn from_blob(name: impl Into<String>, blob: &str) -> Option<Self> {
        let name = name.into();
        let records = match serde_json::from_str::<Value>(blob) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                tracing::warn!(deck = %name, "stored deck is not an array");
                return None;
            }
            Err(e) => {
                tracing::warn!(deck = %name, error = %e, "stored deck is not valid json");
                return None;
            }
        };

        let total = records.len();
        let cards: Vec<Card> = records.iter().filter_map(upgrade_record).collect();
        if cards.len() < total {
            tracing::warn!(
                deck = %name,
                dropped = total - cards.len(),
                "dropped stored records without question and answer"
            );
        }

        Some(Self::new(name, cards))
    }

    /// Serialize the cards for the store.
    pub fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.cards)?)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Totals across every card in the deck.
    pub fn progress(&self) -> DeckProgress {
        DeckProgress {
            total_attempts: self.cards.iter().map(|card| card.total_attempts).sum(),
            successful_attempts: self
                .cards
                .iter()
                .map(|card| card.attempt_history.successes() as u64)
                .sum(),
            last_studied: self.cards.iter().filter_map(|card| card.last_seen).max(),
        }
    }
}

/// Parse deck source content. Files ending in `.md` use the markdown format,
/// everything else is a JSON array of `{question, answer}` objects.
pub fn parse_source(name: &str, content: &str) -> Result<Vec<CardContent>> {
    if name.ends_with(".md") {
        Ok(parser::parse(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

/// Upgrade a stored record of any age to the current card shape.
///
/// Missing or mistyped fields fall back to their fresh-card defaults,
/// difficulty is clamped into range and history keeps its newest entries.
/// Records without a string question and answer cannot be recovered.
pub fn upgrade_record(record: &Value) -> Option<Card> {
    let record = record.as_object()?;
    let question = record.get("question")?.as_str()?;
    let answer = record.get("answer")?.as_str()?;

    let mut card = Card::new(question, answer);

    let history = field(record, &["lastAttempts", "attemptHistory"]).and_then(Value::as_array);
    if let Some(history) = history {
        card.attempt_history = history
            .iter()
            .filter_map(Value::as_u64)
            .map(|bit| bit == 1)
            .collect();
    }

    let attempts = field(record, &["attempts", "totalAttempts"])
        .and_then(Value::as_u64)
        .unwrap_or(0);
    card.total_attempts = attempts.max(card.attempt_history.len() as u64);

    if let Some(rate) = field(record, &["successRate"]).and_then(Value::as_f64) {
        card.success_rate = rate.clamp(0.0, 100.0);
    }

    card.last_seen = field(record, &["lastSeen"])
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    if let Some(difficulty) = field(record, &["difficulty"]).and_then(Value::as_u64) {
        card.difficulty = difficulty.clamp(MIN_DIFFICULTY as u64, MAX_DIFFICULTY as u64) as u8;
    }

    Some(card)
}

impl TryFrom<Value> for Card {
    type Error = &'static str;

    fn try_from(record: Value) -> std::result::Result<Self, Self::Error> {
        upgrade_record(&record).ok_or("card record needs a string question and answer")
    }
}

fn field<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| record.get(*name))
        .filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::record_at;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn content(question: &str, answer: &str) -> CardContent {
        CardContent {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn seed_creates_fresh_cards() {
        let deck = Deck::seed("capitals.json", vec![content("France?", "Paris")]);
        assert_eq!(deck.cards, vec![Card::new("France?", "Paris")]);
    }

    #[test]
    fn blob_round_trip_preserves_every_field() {
        let mut deck = Deck::seed(
            "capitals.json",
            vec![
                content("France?", "Paris"),
                content("Italy?", "Rome"),
                content("Spain?", "Madrid"),
            ],
        );
        for (minute, similarity) in [100, 20, 85, 0, 91].into_iter().enumerate() {
            record_at(&mut deck.cards[0], similarity, at(minute as i64));
        }
        record_at(&mut deck.cards[1], 50, at(30));

        let blob = deck.to_blob().unwrap();
        let restored = Deck::from_blob("capitals.json", &blob).unwrap();
        assert_eq!(restored, deck);
    }

    #[test]
    fn missing_fields_default() {
        let blob = r#"[{"question": "France?", "answer": "Paris"}]"#;
        let deck = Deck::from_blob("capitals.json", blob).unwrap();
        assert_eq!(deck.cards, vec![Card::new("France?", "Paris")]);
    }

    #[test]
    fn existing_fields_preserved() {
        let record = json!({
            "question": "France?",
            "answer": "Paris",
            "lastAttempts": [1, 0, 1],
            "attempts": 14,
            "successRate": 66.66666666666667,
            "lastSeen": "2024-03-01T09:00:00.000Z",
            "difficulty": 3
        });
        let card = upgrade_record(&record).unwrap();
        assert_eq!(card.attempt_history.iter().collect::<Vec<_>>(), vec![true, false, true]);
        assert_eq!(card.total_attempts, 14);
        assert_eq!(card.success_rate, 66.66666666666667);
        assert_eq!(card.last_seen, Some(at(0)));
        assert_eq!(card.difficulty, 3);
    }

    #[test]
    fn malformed_fields_are_repaired() {
        let record = json!({
            "question": "France?",
            "answer": "Paris",
            "lastAttempts": "oops",
            "attempts": -3,
            "successRate": 250.0,
            "lastSeen": "yesterday",
            "difficulty": 0
        });
        let card = upgrade_record(&record).unwrap();
        assert!(card.attempt_history.is_empty());
        assert_eq!(card.total_attempts, 0);
        assert_eq!(card.success_rate, 100.0);
        assert_eq!(card.last_seen, None);
        assert_eq!(card.difficulty, 1);
    }

    #[test]
    fn deserializing_a_card_repairs_like_upgrade() {
        let record = json!({
            "question": "France?",
            "answer": "Paris",
            "difficulty": 0,
            "successRate": 250.0,
            "attempts": 0,
            "lastAttempts": [1, 1, 1]
        });
        let card: Card = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(Some(card.clone()), upgrade_record(&record));
        assert_eq!(card.difficulty, 1);
        assert_eq!(card.success_rate, 100.0);
        assert_eq!(card.total_attempts, 3);

        let listed: Vec<Card> = serde_json::from_value(json!([record])).unwrap();
        assert_eq!(listed, vec![card]);
    }

    #[test]
    fn deserializing_a_card_without_answer_fails() {
        let err = serde_json::from_value::<Card>(json!({"question": "Q"})).unwrap_err();
        assert!(err.to_string().contains("question and answer"));
    }

    #[test]
    fn oversized_history_keeps_newest() {
        let bits: Vec<u8> = (0..12).map(|i| if i < 2 { 0 } else { 1 }).collect();
        let record = json!({"question": "Q", "answer": "A", "lastAttempts": bits, "difficulty": 9});
        let card = upgrade_record(&record).unwrap();
        assert_eq!(card.attempt_history.len(), 10);
        assert_eq!(card.attempt_history.successes(), 10);
        assert_eq!(card.total_attempts, 10);
        assert_eq!(card.difficulty, 5);
    }

    #[test]
    fn accepts_long_field_names() {
        let record = json!({
            "question": "Q",
            "answer": "A",
            "attemptHistory": [0, 0],
            "totalAttempts": 7
        });
        let card = upgrade_record(&record).unwrap();
        assert_eq!(card.attempt_history.len(), 2);
        assert_eq!(card.total_attempts, 7);
    }

    #[test]
    fn records_without_content_are_dropped() {
        let blob = r#"[{"question": "Q"}, 42, {"question": "France?", "answer": "Paris"}]"#;
        let deck = Deck::from_blob("capitals.json", blob).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.cards[0].question, "France?");
    }

    #[test]
    fn non_array_blob_is_rejected() {
        assert!(Deck::from_blob("d", "{}").is_none());
        assert!(Deck::from_blob("d", "not json").is_none());
    }

    #[test]
    fn progress_aggregates_cards() {
        let contents = vec![content("a", "1"), content("b", "2"), content("c", "3")];
        let mut deck = Deck::seed("d", contents);
        record_at(&mut deck.cards[0], 100, at(0));
        record_at(&mut deck.cards[0], 0, at(1));
        record_at(&mut deck.cards[1], 90, at(5));

        assert_eq!(
            deck.progress(),
            DeckProgress {
                total_attempts: 3,
                successful_attempts: 2,
                last_studied: Some(at(5)),
            }
        );
    }

    #[test]
    fn progress_of_untouched_deck() {
        let deck = Deck::seed("d", vec![content("a", "1")]);
        let progress = deck.progress();
        assert_eq!(progress.total_attempts, 0);
        assert_eq!(progress.successful_attempts, 0);
        assert_eq!(progress.last_studied, None);
    }

    #[test]
    fn parse_source_by_extension() {
        let json = r#"[{"question": "France?", "answer": "Paris", "hint": "ignored"}]"#;
        assert_eq!(
            parse_source("capitals.json", json).unwrap(),
            vec![content("France?", "Paris")]
        );

        let md = "Q: France?\nA: Paris";
        assert_eq!(parse_source("capitals.md", md).unwrap(), vec![content("France?", "Paris")]);
    }

    #[test]
    fn parse_source_rejects_bad_json() {
        assert!(parse_source("capitals.json", "[{\"question\": 1}]").is_err());
    }
}
