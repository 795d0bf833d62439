//! Error types and utilities for butterfly-osm toolkit
//!
//! Provides the shared input-validation error and fuzzy matching against closed
//! vocabularies (highway classes, segmenting policies, output formats).

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

/// Find the best fuzzy match using hybrid semantic + character-based scoring
///
/// Combines character-based similarity (Jaro-Winkler 70% + Normalized Levenshtein 30%)
/// with semantic bonuses:
/// - Prefix matching: 20% bonus for strong prefix similarity (≥4 chars)
/// - Substring matching: 12% bonus for compound parts (`motorway_link`, `attribute_runs`)
/// - Anti-bias penalty: -10% for inappropriate short matches
///
/// Minimum threshold: 0.65 similarity to balance precision vs recall
fn find_best_fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    if candidates.is_empty() {
        return None;
    }

    let input_lower = input.to_lowercase();
    let mut best_match = None;
    let mut best_score = 0.0f64;

    // 0.65 keeps "motorwya" -> "motorway" while rejecting "banana".
    let min_threshold = 0.65;

    for &candidate in candidates {
        let candidate_lower = candidate.to_lowercase();

        let jw_score = jaro_winkler(&input_lower, &candidate_lower);
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);
        let combined_score = (jw_score * 0.7) + (lev_score * 0.3);

        let mut semantic_bonus = 0.0;

        let prefix_len = input_lower.chars().count().min(7);
        if prefix_len >= 4 {
            let input_prefix = input_lower.chars().take(prefix_len).collect::<String>();
            let candidate_prefix = candidate_lower.chars().take(prefix_len).collect::<String>();

            let prefix_similarity = normalized_levenshtein(&input_prefix, &candidate_prefix);
            if prefix_similarity > 0.7 {
                semantic_bonus += 0.2 * prefix_similarity;
            }
        }

        // Compound vocabulary entries match well when the input is close to one part.
        if candidate_lower.contains('_') || candidate_lower.contains('-') {
            for part in candidate_lower.split(&['_', '-'][..]) {
                if part.len() >= 4 {
                    let part_similarity = jaro_winkler(&input_lower, part);
                    if part_similarity > 0.85 {
                        semantic_bonus += 0.12 * part_similarity;
                    }
                }
            }
        }

        if input_lower.len() >= 8 && candidate_lower.len() <= 4 {
            semantic_bonus -= 0.1;
        }

        let final_score = combined_score + semantic_bonus;

        if final_score >= min_threshold && final_score > best_score {
            best_score = final_score;
            best_match = Some(candidate);
        }
    }

    best_match
}

/// Suggest a correction for a value that is not part of `vocabulary`.
///
/// Returns `None` for exact (case-insensitive) matches and for inputs too far
/// from every candidate.
pub fn suggest_correction(input: &str, vocabulary: &[&str]) -> Option<String> {
    if vocabulary.iter().any(|v| v.eq_ignore_ascii_case(input)) {
        return None;
    }

    find_best_fuzzy_match(input, vocabulary).map(str::to_string)
}

/// Main error type for butterfly-osm input validation
#[derive(Debug, Error)]
pub enum Error {
    /// A value outside a closed vocabulary
    #[error("Unknown {kind} '{value}'{}", suggestion_suffix(.suggestion))]
    UnknownValue {
        kind: &'static str,
        value: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// Build an [`Error::UnknownValue`] with a fuzzy suggestion from `vocabulary`.
    pub fn unknown_value(kind: &'static str, value: &str, vocabulary: &[&str]) -> Self {
        Error::UnknownValue {
            kind,
            value: value.to_string(),
            suggestion: suggest_correction(value, vocabulary),
        }
    }
}
