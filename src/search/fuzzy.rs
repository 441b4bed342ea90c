//! Fuzzy Corrector
//!
//! Proposes "did you mean" corrections for a query by comparing it with
//! previously issued queries under Levenshtein edit distance.

use super::options::FuzzyOptions;
use crate::utils::normalize_query;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Corrections further than this many edits away are never proposed
pub const MAX_CORRECTION_EDITS: usize = 2;

/// A suggested replacement for a mistyped query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypoCorrection {
    pub candidate_query: String,
    /// `1 - distance / max(len(query), len(candidate))`, in (0, 1]
    pub confidence: f64,
    pub original_query: String,
}

pub struct FuzzyCorrector;

impl FuzzyCorrector {
    /// Suggest corrections for `query` from `prior_queries`, best first.
    ///
    /// Comparison is on NFC-normalized, lowercased text. Identical queries
    /// (distance 0) are not corrections. Repeated history entries count once.
    pub fn suggest<S: AsRef<str>>(
        query: &str,
        prior_queries: &[S],
        options: &FuzzyOptions,
    ) -> Vec<TypoCorrection> {
        let normalized = normalize_query(query);
        if normalized.is_empty() || options.max_suggestions == 0 {
            return Vec::new();
        }
        let query_len = normalized.chars().count();

        let mut seen = HashSet::new();
        let mut corrections = Vec::new();

        for prior in prior_queries {
            let candidate = prior.as_ref().trim();
            let candidate_norm = normalize_query(candidate);
            if candidate_norm.is_empty() || !seen.insert(candidate_norm.clone()) {
                continue;
            }

            // Length difference is a lower bound on edit distance
            let candidate_len = candidate_norm.chars().count();
            if query_len.abs_diff(candidate_len) > MAX_CORRECTION_EDITS {
                continue;
            }

            let distance =
                match edit_distance_within(&normalized, &candidate_norm, MAX_CORRECTION_EDITS) {
                    Some(d) if d > 0 => d,
                    _ => continue,
                };

            let confidence = 1.0 - distance as f64 / query_len.max(candidate_len) as f64;
            if confidence > options.min_confidence {
                corrections.push(TypoCorrection {
                    candidate_query: candidate.to_string(),
                    confidence,
                    original_query: query.to_string(),
                });
            }
        }

        // Stable sort keeps history order among equal confidences
        corrections.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        corrections.truncate(options.max_suggestions);
        corrections
    }
}

/// Levenshtein distance in chars with unit costs
pub fn edit_distance(a: &str, b: &str) -> usize {
    edit_distance_within(a, b, usize::MAX).unwrap_or(usize::MAX)
}

/// Levenshtein distance if it is at most `max`, otherwise `None`.
///
/// Gives up early when the length difference alone exceeds `max`, or when
/// every cell of a DP row does.
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a.chars().count();
    let b_len = b_chars.len();

    if a_len.abs_diff(b_len) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=b_len).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, &bc) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ac != bc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
            row_min = row_min.min(row[j + 1]);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[b_len];
    (distance <= max).then_some(distance)
}
