//! Evaluation metrics for the held-out partition

/// ROC-AUC via the rank-based Mann-Whitney U statistic with tie handling.
///
/// Returns 0.5 (no discrimination) for degenerate inputs: empty data or a
/// single-class label vector.
pub fn roc_auc(scores: &[f64], labels: &[i32]) -> f64 {
    if scores.is_empty() || scores.len() != labels.len() {
        return 0.5;
    }

    let total_pos = labels.iter().filter(|&&l| l == 1).count() as f64;
    let total_neg = labels.len() as f64 - total_pos;
    if total_pos == 0.0 || total_neg == 0.0 {
        return 0.5;
    }

    let mut pairs: Vec<(f64, i32)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let n = pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;

    while i < n {
        let current = pairs[i].0;
        let mut j = i;
        while j < n && (pairs[j].0 - current).abs() < 1e-12 {
            j += 1;
        }

        // Ties share the average rank of their group (1-based ranks).
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for pair in &pairs[i..j] {
            if pair.1 == 1 {
                rank_sum_pos += avg_rank;
            }
        }

        i = j;
    }

    let u = rank_sum_pos - total_pos * (total_pos + 1.0) / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}

/// Confusion counts at a probability threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / total as f64
    }

    pub fn precision(&self) -> f64 {
        let predicted_pos = self.true_positives + self.false_positives;
        if predicted_pos == 0 {
            return 0.0;
        }
        self.true_positives as f64 / predicted_pos as f64
    }

    pub fn recall(&self) -> f64 {
        let actual_pos = self.true_positives + self.false_negatives;
        if actual_pos == 0 {
            return 0.0;
        }
        self.true_positives as f64 / actual_pos as f64
    }
}

/// Tally predictions against labels at the given threshold.
pub fn confusion_counts(probabilities: &[f64], labels: &[i32], threshold: f64) -> ConfusionCounts {
    let mut counts = ConfusionCounts {
        true_positives: 0,
        true_negatives: 0,
        false_positives: 0,
        false_negatives: 0,
    };

    for (&p, &label) in probabilities.iter().zip(labels.iter()) {
        let predicted = p >= threshold;
        match (predicted, label == 1) {
            (true, true) => counts.true_positives += 1,
            (false, false) => counts.true_negatives += 1,
            (true, false) => counts.false_positives += 1,
            (false, true) => counts.false_negatives += 1,
        }
    }

    counts
}
