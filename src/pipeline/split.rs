//! Stratified train/test splitting
//!
//! The held-out partition is sampled per class so the label balance of
//! the full table is preserved in both partitions. Shuffling uses a
//! seeded RNG, so a given (table, seed) pair always produces the same
//! split.

use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, ScoreError};

/// Row indices for the two partitions, in ascending order within each.
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<u32>,
    pub test: Vec<u32>,
}

/// Stratified split of row indices by binary label.
///
/// Each class contributes `round(n_class * test_fraction)` rows to the
/// held-out partition, clamped so that both partitions keep at least one
/// row of every class that has two or more members.
pub fn stratified_split_indices(
    labels: &[i32],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(ScoreError::Configuration(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut by_class: [Vec<u32>; 2] = [Vec::new(), Vec::new()];
    for (idx, &label) in labels.iter().enumerate() {
        match label {
            0 => by_class[0].push(idx as u32),
            1 => by_class[1].push(idx as u32),
            other => {
                return Err(ScoreError::Configuration(format!(
                    "label must be binary 0/1, found {}",
                    other
                )))
            }
        }
    }

    if by_class[0].is_empty() || by_class[1].is_empty() {
        return Err(ScoreError::Configuration(
            "training data must contain both classes (0 and 1)".to_string(),
        ));
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for indices in by_class.iter_mut() {
        indices.shuffle(&mut rng);

        let n = indices.len();
        let mut n_test = (n as f64 * test_fraction).round() as usize;
        if n >= 2 {
            n_test = n_test.clamp(1, n - 1);
        } else {
            n_test = 0; // a singleton class stays entirely in training
        }

        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}

/// Materialize a row subset of a DataFrame.
pub fn take_rows(df: &DataFrame, indices: &[u32]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec("idx".into(), indices.to_vec());
    Ok(df.take(&idx)?)
}

/// Subset of a label vector by the same indices.
pub fn take_labels(labels: &[i32], indices: &[u32]) -> Vec<i32> {
    indices.iter().map(|&i| labels[i as usize]).collect()
}
