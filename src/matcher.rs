//! Fuzzy name lookup for guests.
//!
//! A typed query is compared against every guest's full name with a
//! blend of token overlap and leading-character agreement. Scores are
//! in `[0.0, 1.0]` and the best-scoring guest wins, however low the
//! score is. Deciding whether a score is good enough to show with
//! confidence is [`ConfidenceTier`]'s job, not the scorer's.

use crate::Guest;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const TOKEN_WEIGHT: f64 = 0.7;
const PREFIX_WEIGHT: f64 = 0.3;

/// Canonical form used on both sides of every comparison: lower-cased,
/// stripped to ASCII letters and whitespace, ends trimmed.
///
/// "O'Brien-Smith" and "obriensmith" normalize identically, so guests
/// can type their name without worrying about punctuation.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Score how closely `input` resembles `candidate`.
///
/// Both sides are normalized first. Either side normalizing to empty
/// scores 0.0 and normalized equality scores 1.0; otherwise the score
/// is 0.7 * token overlap + 0.3 * shared prefix, clamped to 1.0.
pub fn similarity_score(input: &str, candidate: &str) -> f64 {
    let a = normalize(input);
    let b = normalize(candidate);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_tokens: HashSet<&str> = a.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b.split_whitespace().collect();
    let overlap = a_tokens.intersection(&b_tokens).count();
    let token_score = overlap as f64 / a_tokens.len().max(b_tokens.len()) as f64;

    // Normalization keeps any Unicode whitespace, so count chars, not
    // bytes.
    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();
    let prefix_score = prefix_len as f64 / a.chars().count().max(b.chars().count()) as f64;

    (token_score * TOKEN_WEIGHT + prefix_score * PREFIX_WEIGHT).min(1.0)
}

/// Scan `guests` for the best-scoring full name. Ties keep the earliest
/// guest scanned, so roster order decides between equal scores.
///
/// Returns `None` only when the trimmed query is empty or there are no
/// guests at all.
pub fn find_best_match<'a>(query: &str, guests: &'a [Guest]) -> Option<(&'a Guest, f64)> {
    if query.trim().is_empty() {
        return None;
    }
    let mut best: Option<(&Guest, f64)> = None;
    for guest in guests {
        let score = similarity_score(query, &guest.full_name());
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((guest, score)),
        }
    }
    best
}

/// How loudly the UI may claim the match, derived from the score.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.90 {
            ConfidenceTier::High
        } else if score >= 0.75 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            ConfidenceTier::High => "We found your party",
            ConfidenceTier::Medium => "We think we found your party",
            ConfidenceTier::Low => "We found a possible match",
        }
    }
}
