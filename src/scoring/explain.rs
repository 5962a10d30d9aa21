//! Linear contribution explainer
//!
//! Decomposes the classifier's decision into per-feature contributions
//! (transformed value x coefficient) and ranks them. The bias term and
//! feature interactions are out of scope.

use serde::{Deserialize, Serialize};

/// Top contributing feature names in each direction, at most three per
/// side, ordered by contribution (descending for positive, ascending for
/// negative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub top_positive_factors: Vec<String>,
    pub top_negative_factors: Vec<String>,
}

/// How many factors each direction reports.
const TOP_FACTORS: usize = 3;

/// Rank per-coordinate contributions and name the top drivers.
///
/// Ties break by original coordinate order (first seen wins), keeping the
/// output deterministic. With fewer than three coordinates the lists are
/// simply shorter; there is no padding and no error.
pub fn explain(features: &[f64], coefficients: &[f64], names: &[String]) -> Explanation {
    debug_assert_eq!(features.len(), coefficients.len());
    debug_assert_eq!(features.len(), names.len());

    let contributions: Vec<(usize, f64)> = features
        .iter()
        .zip(coefficients.iter())
        .map(|(x, w)| x * w)
        .enumerate()
        .collect();

    let mut descending = contributions.clone();
    // Stable sort preserves coordinate order among equal contributions.
    descending.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ascending = contributions;
    ascending.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    Explanation {
        top_positive_factors: descending
            .iter()
            .take(TOP_FACTORS)
            .map(|(idx, _)| names[*idx].clone())
            .collect(),
        top_negative_factors: ascending
            .iter()
            .take(TOP_FACTORS)
            .map(|(idx, _)| names[*idx].clone())
            .collect(),
    }
}
