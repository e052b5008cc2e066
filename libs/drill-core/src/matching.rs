//! Answer matching for free-text answers.

use serde::{Deserialize, Serialize};

/// Lowest similarity score counted as a successful attempt.
pub const SUCCESS_THRESHOLD: u8 = 80;

/// Classification of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Below the success threshold.
    Incorrect,
    /// 80–89: accepted, but only just.
    Close,
    /// 90–99.
    Correct,
    /// Exact match after case-folding.
    Perfect,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        match score {
            100..=u8::MAX => Self::Perfect,
            90..=99 => Self::Correct,
            SUCCESS_THRESHOLD..=89 => Self::Close,
            _ => Self::Incorrect,
        }
    }

    pub fn is_success(self) -> bool {
        !matches!(self, Self::Incorrect)
    }
}

/// Result of comparing a typed answer to the reference answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Similarity score between 0 and 100.
    pub similarity: u8,
    pub verdict: Verdict,
}

/// Score a typed answer and classify the result.
pub fn assess(typed: &str, reference: &str) -> Assessment {
    let similarity = score(typed, reference);
    Assessment {
        similarity,
        verdict: Verdict::from_score(similarity),
    }
}

/// Case-insensitive similarity between two strings, 0 to 100.
///
/// `round((1 - distance / max_len) * 100)` over Levenshtein distance. Two empty
/// strings are identical.
pub fn score(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    if a == b {
        return 100;
    }

    let longest = a.len().max(b.len());
    let distance = edit_distance(&a, &b);
    ((1.0 - distance as f64 / longest as f64) * 100.0).round() as u8
}

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    edit_distance(&a, &b)
}

/// Single-row Levenshtein over char slices. `row[j]` holds the distance
/// between the prefix of `a` seen so far and `b[..j]`.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}
