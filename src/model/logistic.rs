//! Binary logistic classifier
//!
//! A single linear model fit by class-weighted gradient descent. Class
//! weights are set inversely proportional to class frequency, so a rare
//! positive class (few conversions) is not drowned out by the majority.
//! Fitting is deterministic: zero initialization, full-batch gradients,
//! no randomness.

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Gradient-descent hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Maximum full-batch epochs.
    pub epochs: usize,
    pub learning_rate: f64,
    /// L2 penalty on the weight vector (not the bias).
    pub l2: f64,
    /// Early-stop threshold on the gradient infinity norm.
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 500,
            learning_rate: 0.1,
            l2: 1e-4,
            tolerance: 1e-6,
        }
    }
}

/// Frozen weight vector and bias. One coefficient per feature-vector
/// coordinate; the length invariant against the preprocessor's output
/// width is checked when the artifact is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticModel {
    /// Fit on pre-transformed feature rows and binary labels.
    pub fn fit(rows: &[Vec<f64>], labels: &[i32], config: &FitConfig) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(ScoreError::Configuration(
                "cannot fit classifier on an empty training set".to_string(),
            ));
        }
        if labels.len() != n {
            return Err(ScoreError::Configuration(format!(
                "feature rows ({}) and labels ({}) differ in length",
                n,
                labels.len()
            )));
        }

        let width = rows[0].len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(ScoreError::Configuration(
                "feature rows have inconsistent widths".to_string(),
            ));
        }

        let n_pos = labels.iter().filter(|&&l| l == 1).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(ScoreError::Configuration(
                "training labels must contain both classes (0 and 1)".to_string(),
            ));
        }

        // "Balanced" class weights: n / (2 * n_class).
        let w_pos = n as f64 / (2.0 * n_pos as f64);
        let w_neg = n as f64 / (2.0 * n_neg as f64);
        let sample_weights: Vec<f64> = labels
            .iter()
            .map(|&l| if l == 1 { w_pos } else { w_neg })
            .collect();
        let total_weight: f64 = sample_weights.iter().sum();

        let x = Mat::<f64>::from_fn(n, width, |i, j| rows[i][j]);
        let mut weights = Mat::<f64>::zeros(width, 1);
        let mut bias = 0.0f64;

        for _ in 0..config.epochs {
            // z = X w + b, residual_i = cw_i * (sigmoid(z_i) - y_i)
            let z = &x * &weights;
            let mut residual = Mat::<f64>::zeros(n, 1);
            let mut bias_grad = 0.0;
            for i in 0..n {
                let p = sigmoid(z[(i, 0)] + bias);
                let y = f64::from(labels[i]);
                let r = sample_weights[i] * (p - y);
                residual[(i, 0)] = r;
                bias_grad += r;
            }

            let weight_grad = x.transpose() * &residual;
            bias_grad /= total_weight;

            let mut max_grad = bias_grad.abs();
            for j in 0..width {
                let g = weight_grad[(j, 0)] / total_weight + config.l2 * weights[(j, 0)];
                weights[(j, 0)] -= config.learning_rate * g;
                max_grad = max_grad.max(g.abs());
            }
            bias -= config.learning_rate * bias_grad;

            if max_grad < config.tolerance {
                break;
            }
        }

        Ok(Self {
            weights: (0..width).map(|j| weights[(j, 0)]).collect(),
            bias,
        })
    }

    /// Conversion probability in (0, 1) for one feature vector.
    pub fn predict_probability(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.weights.len());
        let z: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    /// One coefficient per feature-vector coordinate, positionally aligned
    /// with the preprocessor's output order.
    pub fn coefficients(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.bias
    }

    /// Construct directly from frozen parameters (tests, artifact repair
    /// tooling).
    pub fn from_parameters(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }
}

/// Numerically stable logistic function. The result is pinned inside
/// the open unit interval; extreme inputs saturate to the nearest
/// representable probability rather than an exact 0 or 1.
fn sigmoid(z: f64) -> f64 {
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(f64::EPSILON, 1.0 - f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linearly separable toy set: positive class sits at higher x.
    fn separable() -> (Vec<Vec<f64>>, Vec<i32>) {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let x = if i < 20 { -1.0 - (i as f64) * 0.05 } else { 1.0 + (i as f64 - 20.0) * 0.05 };
                vec![x]
            })
            .collect();
        let labels: Vec<i32> = (0..40).map(|i| if i < 20 { 0 } else { 1 }).collect();
        (rows, labels)
    }

    #[test]
    fn test_fit_separates_classes() {
        let (rows, labels) = separable();
        let model = LogisticModel::fit(&rows, &labels, &FitConfig::default()).unwrap();

        assert!(model.predict_probability(&[2.0]) > 0.8);
        assert!(model.predict_probability(&[-2.0]) < 0.2);
        assert!(model.coefficients()[0] > 0.0);
    }

    #[test]
    fn test_probability_stays_in_open_unit_interval() {
        let model = LogisticModel::from_parameters(vec![10.0], 0.0);
        let hi = model.predict_probability(&[100.0]);
        let lo = model.predict_probability(&[-100.0]);
        assert!(hi < 1.0 && hi > 0.99);
        assert!(lo > 0.0 && lo < 0.01);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (rows, labels) = separable();
        let a = LogisticModel::fit(&rows, &labels, &FitConfig::default()).unwrap();
        let b = LogisticModel::fit(&rows, &labels, &FitConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_class_weighting_counters_imbalance() {
        // 5 positives vs 45 negatives, separable
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..45 {
            rows.push(vec![-1.0 - (i as f64) * 0.01]);
            labels.push(0);
        }
        for i in 0..5 {
            rows.push(vec![1.0 + (i as f64) * 0.01]);
            labels.push(1);
        }

        let model = LogisticModel::fit(&rows, &labels, &FitConfig::default()).unwrap();
        // Without reweighting the rare class would be pushed well below 0.5.
        assert!(model.predict_probability(&[1.5]) > 0.5);
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let result = LogisticModel::fit(&[], &[], &FitConfig::default());
        assert!(matches!(result, Err(ScoreError::Configuration(_))));
    }

    #[test]
    fn test_fit_rejects_single_class() {
        let rows = vec![vec![1.0], vec![2.0]];
        let labels = vec![1, 1];
        let result = LogisticModel::fit(&rows, &labels, &FitConfig::default());
        assert!(matches!(result, Err(ScoreError::Configuration(_))));
    }

    #[test]
    fn test_fit_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let labels = vec![0, 1];
        let result = LogisticModel::fit(&rows, &labels, &FitConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_sigmoid_extremes() {
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_model_serde_round_trip() {
        let model = LogisticModel::from_parameters(vec![0.5, -1.25], 0.125);
        let json = serde_json::to_string(&model).unwrap();
        let back: LogisticModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
