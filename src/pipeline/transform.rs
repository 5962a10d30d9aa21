//! Preprocessing transformer
//!
//! Deterministic mapping from raw lead attributes to a fixed-length
//! feature vector: median imputation + standardization for numeric
//! fields, "missing"-sentinel imputation + one-hot encoding for
//! categorical fields. Fit once at training time, frozen thereafter.
//!
//! Output column order is load-bearing: all numeric fields in schema
//! order, then each categorical field expanded into its fit-time levels.
//! The classifier's coefficient vector and the explainer's name mapping
//! are both aligned to this order positionally.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::pipeline::lead::RawLead;
use crate::pipeline::schema::FeatureSchema;

/// Sentinel category substituted for absent/null categorical values.
pub const MISSING_CATEGORY: &str = "missing";

/// Frozen statistics for one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub field: String,
    /// Training-set median, used to impute missing values.
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation over non-missing training values.
    pub std: f64,
}

impl NumericStats {
    /// Impute then standardize a single value.
    fn encode(&self, value: Option<f64>) -> f64 {
        let x = value.unwrap_or(self.median);
        let divisor = if self.std > 0.0 { self.std } else { 1.0 };
        (x - self.mean) / divisor
    }
}

/// Frozen level set for one categorical field, sorted at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalLevels {
    pub field: String,
    pub levels: Vec<String>,
}

impl CategoricalLevels {
    /// One-hot row sized to the fit-time levels. Unseen values produce an
    /// all-zero row; absent values hit the "missing" sentinel level (which
    /// is itself all-zero unless the training set contained nulls).
    fn encode(&self, value: Option<&str>, out: &mut Vec<f64>) {
        let observed = value.unwrap_or(MISSING_CATEGORY);
        for level in &self.levels {
            out.push(if level == observed { 1.0 } else { 0.0 });
        }
    }
}

/// Deterministic raw-attributes -> feature-vector transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub schema: FeatureSchema,
    numeric_stats: Vec<NumericStats>,
    categorical_levels: Vec<CategoricalLevels>,
}

impl Preprocessor {
    /// Fit the transformer on a training table.
    ///
    /// Records median/mean/std per numeric field and the sorted distinct
    /// level set per categorical field (nulls imputed to the "missing"
    /// sentinel before levels are collected). A declared field absent from
    /// the table is a configuration error, never a silent skip.
    pub fn fit(df: &DataFrame, schema: &FeatureSchema) -> Result<Self> {
        schema.validate_against(df)?;

        let mut numeric_stats = Vec::with_capacity(schema.numeric.len());
        for field in &schema.numeric {
            let values = numeric_column(df, field)?;
            numeric_stats.push(fit_numeric(field, &values));
        }

        let mut categorical_levels = Vec::with_capacity(schema.categorical.len());
        for field in &schema.categorical {
            let values = categorical_column(df, field)?;
            let mut levels: Vec<String> = values
                .iter()
                .map(|v| v.as_deref().unwrap_or(MISSING_CATEGORY).to_string())
                .collect::<std::collections::BTreeSet<String>>()
                .into_iter()
                .collect();
            levels.sort();
            categorical_levels.push(CategoricalLevels {
                field: field.clone(),
                levels,
            });
        }

        Ok(Self {
            schema: schema.clone(),
            numeric_stats,
            categorical_levels,
        })
    }

    /// Transform one raw lead into a feature vector. Schema fields absent
    /// from the lead are treated as missing; extra keys are ignored. Never
    /// fails for lead-shaped problems.
    pub fn transform_lead(&self, lead: &RawLead) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.output_width());

        for stats in &self.numeric_stats {
            let value = lead.get(&stats.field).and_then(|v| v.as_f64());
            out.push(stats.encode(value));
        }

        for levels in &self.categorical_levels {
            let value = lead.get(&levels.field).map(|v| v.as_category());
            levels.encode(value.as_deref(), &mut out);
        }

        out
    }

    /// Transform every row of a table. Used by training and evaluation;
    /// each row goes through exactly the same path constants as a served
    /// lead, so train-time and serve-time vectors agree bit-for-bit.
    pub fn transform_frame(&self, df: &DataFrame) -> Result<Vec<Vec<f64>>> {
        let n_rows = df.height();

        let numeric_columns: Vec<Vec<Option<f64>>> = self
            .numeric_stats
            .iter()
            .map(|stats| numeric_column(df, &stats.field))
            .collect::<Result<_>>()?;

        let categorical_columns: Vec<Vec<Option<String>>> = self
            .categorical_levels
            .iter()
            .map(|levels| categorical_column(df, &levels.field))
            .collect::<Result<_>>()?;

        let mut rows = Vec::with_capacity(n_rows);
        for row_idx in 0..n_rows {
            let mut row = Vec::with_capacity(self.output_width());

            for (stats, column) in self.numeric_stats.iter().zip(&numeric_columns) {
                row.push(stats.encode(column[row_idx]));
            }
            for (levels, column) in self.categorical_levels.iter().zip(&categorical_columns) {
                levels.encode(column[row_idx].as_deref(), &mut row);
            }

            rows.push(row);
        }

        Ok(rows)
    }

    /// Human-readable name per output coordinate: numeric field names
    /// as-is, then `<field>_<level>` per categorical level, in the frozen
    /// output order.
    pub fn output_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.output_width());
        for stats in &self.numeric_stats {
            names.push(stats.field.clone());
        }
        for levels in &self.categorical_levels {
            for level in &levels.levels {
                names.push(format!("{}_{}", levels.field, level));
            }
        }
        names
    }

    /// Fixed feature-vector length.
    pub fn output_width(&self) -> usize {
        self.numeric_stats.len()
            + self
                .categorical_levels
                .iter()
                .map(|c| c.levels.len())
                .sum::<usize>()
    }

    /// Frozen per-field numeric statistics.
    pub fn numeric_stats(&self) -> &[NumericStats] {
        &self.numeric_stats
    }

    pub fn categorical_levels(&self) -> &[CategoricalLevels] {
        &self.categorical_levels
    }
}

/// Extract a declared numeric column as Option<f64> values.
fn numeric_column(df: &DataFrame, field: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(field).map_err(|_| {
        ScoreError::Configuration(format!(
            "declared numeric column '{}' not found in table",
            field
        ))
    })?;
    let float_col = col.cast(&DataType::Float64).map_err(|_| {
        ScoreError::Configuration(format!(
            "numeric column '{}' cannot be cast to Float64",
            field
        ))
    })?;
    Ok(float_col.f64()?.into_iter().collect())
}

/// Extract a declared categorical column as Option<String> values.
///
/// Numeric columns render through the same formatter the lead path
/// uses, so a float `1.0` in the training table and a served value of
/// `1.0` name the same level.
fn categorical_column(df: &DataFrame, field: &str) -> Result<Vec<Option<String>>> {
    let col = df.column(field).map_err(|_| {
        ScoreError::Configuration(format!(
            "declared categorical column '{}' not found in table",
            field
        ))
    })?;

    if col.dtype().is_primitive_numeric() {
        let float_col = col.cast(&DataType::Float64)?;
        return Ok(float_col
            .f64()?
            .into_iter()
            .map(|v| v.map(crate::pipeline::lead::format_category_number))
            .collect());
    }

    let string_col = col.cast(&DataType::String)?;
    Ok(string_col
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Median, mean, and population std over non-missing values. An all-null
/// column freezes to identity statistics so transform stays total.
fn fit_numeric(field: &str, values: &[Option<f64>]) -> NumericStats {
    let mut present: Vec<f64> = values.iter().filter_map(|v| *v).collect();

    if present.is_empty() {
        return NumericStats {
            field: field.to_string(),
            median: 0.0,
            mean: 0.0,
            std: 1.0,
        };
    }

    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = present.len();
    let median = if n % 2 == 1 {
        present[n / 2]
    } else {
        (present[n / 2 - 1] + present[n / 2]) / 2.0
    };

    let mean = present.iter().sum::<f64>() / n as f64;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    NumericStats {
        field: field.to_string(),
        median,
        mean,
        std: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::lead::FieldValue;

    fn training_df() -> DataFrame {
        df! {
            "time_on_site" => [Some(100.0f64), Some(200.0), Some(300.0), None],
            "channel" => [Some("Email"), Some("Ads"), None, Some("Email")],
        }
        .unwrap()
    }

    fn fitted() -> Preprocessor {
        let schema = FeatureSchema::new(
            vec!["time_on_site".to_string()],
            vec!["channel".to_string()],
        );
        Preprocessor::fit(&training_df(), &schema).unwrap()
    }

    #[test]
    fn test_fit_numeric_stats() {
        let pre = fitted();
        let stats = &pre.numeric_stats()[0];

        assert_eq!(stats.median, 200.0);
        assert_eq!(stats.mean, 200.0);
        // Population std of [100, 200, 300]
        assert!((stats.std - (20000.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_fit_collects_sorted_levels_with_missing_sentinel() {
        let pre = fitted();
        let levels = &pre.categorical_levels()[0].levels;

        // Nulls imputed to "missing" before level collection, sorted order.
        assert_eq!(levels, &vec!["Ads", "Email", "missing"]);
    }

    #[test]
    fn test_output_names_and_width() {
        let pre = fitted();
        assert_eq!(
            pre.output_names(),
            vec![
                "time_on_site",
                "channel_Ads",
                "channel_Email",
                "channel_missing"
            ]
        );
        assert_eq!(pre.output_width(), 4);
    }

    #[test]
    fn test_transform_lead_full_values() {
        let pre = fitted();
        let mut lead = RawLead::new();
        lead.insert("time_on_site".to_string(), FieldValue::Number(200.0));
        lead.insert("channel".to_string(), FieldValue::Text("Email".into()));
        lead.insert("ignored_extra".to_string(), FieldValue::Bool(true));

        let vec = pre.transform_lead(&lead);
        assert_eq!(vec.len(), 4);
        assert!((vec[0] - 0.0).abs() < 1e-12); // (200 - 200) / std
        assert_eq!(&vec[1..], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_transform_lead_missing_numeric_uses_median() {
        let pre = fitted();
        let lead = RawLead::new();

        let vec = pre.transform_lead(&lead);
        // Median 200 standardizes to 0 under mean 200.
        assert!((vec[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_lead_absent_categorical_hits_missing_level() {
        let pre = fitted();
        let lead = RawLead::new();

        let vec = pre.transform_lead(&lead);
        assert_eq!(&vec[1..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_float_categorical_levels_match_lead_rendering() {
        let frame = df! {
            "tier" => [1.0f64, 2.0, 1.0],
        }
        .unwrap();
        let schema = FeatureSchema::new(vec![], vec!["tier".to_string()]);
        let pre = Preprocessor::fit(&frame, &schema).unwrap();

        // Integer-valued floats freeze without a trailing ".0".
        assert_eq!(pre.categorical_levels()[0].levels, vec!["1", "2"]);

        let mut lead = RawLead::new();
        lead.insert("tier".to_string(), FieldValue::Number(1.0));
        let vec = pre.transform_lead(&lead);
        assert_eq!(vec, vec![1.0, 0.0]);
    }

    #[test]
    fn test_transform_lead_unseen_category_is_all_zero() {
        let pre = fitted();
        let mut lead = RawLead::new();
        lead.insert("channel".to_string(), FieldValue::Text("Webinar".into()));

        let vec = pre.transform_lead(&lead);
        assert_eq!(&vec[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unseen_sentinel_when_training_had_no_nulls() {
        let df = df! {
            "channel" => ["Email", "Ads"],
        }
        .unwrap();
        let schema = FeatureSchema::new(vec![], vec!["channel".to_string()]);
        let pre = Preprocessor::fit(&df, &schema).unwrap();

        // No nulls at fit time, so "missing" is not a level; an absent
        // value encodes as an all-zero block.
        let vec = pre.transform_lead(&RawLead::new());
        assert_eq!(vec, vec![0.0, 0.0]);
    }

    #[test]
    fn test_transform_frame_matches_transform_lead() {
        let pre = fitted();
        let rows = pre.transform_frame(&training_df()).unwrap();
        assert_eq!(rows.len(), 4);

        let mut lead = RawLead::new();
        lead.insert("time_on_site".to_string(), FieldValue::Number(100.0));
        lead.insert("channel".to_string(), FieldValue::Text("Email".into()));
        assert_eq!(rows[0], pre.transform_lead(&lead));
    }

    #[test]
    fn test_fit_fails_on_missing_declared_column() {
        let schema = FeatureSchema::new(
            vec!["downloads".to_string()],
            vec!["channel".to_string()],
        );
        let result = Preprocessor::fit(&training_df(), &schema);
        assert!(matches!(result, Err(ScoreError::Configuration(_))));
    }

    #[test]
    fn test_zero_variance_column_does_not_blow_up() {
        let df = df! {
            "constant" => [5.0f64, 5.0, 5.0],
        }
        .unwrap();
        let schema = FeatureSchema::new(vec!["constant".to_string()], vec![]);
        let pre = Preprocessor::fit(&df, &schema).unwrap();

        let mut lead = RawLead::new();
        lead.insert("constant".to_string(), FieldValue::Number(7.0));
        let vec = pre.transform_lead(&lead);
        assert!(vec[0].is_finite());
        assert_eq!(vec[0], 2.0); // divisor guards to 1.0
    }

    #[test]
    fn test_all_null_numeric_column_freezes_identity_stats() {
        let df = df! {
            "empty" => [None::<f64>, None, None],
        }
        .unwrap();
        let schema = FeatureSchema::new(vec!["empty".to_string()], vec![]);
        let pre = Preprocessor::fit(&df, &schema).unwrap();

        let vec = pre.transform_lead(&RawLead::new());
        assert_eq!(vec, vec![0.0]);
    }

    #[test]
    fn test_preprocessor_serde_round_trip() {
        let pre = fitted();
        let json = serde_json::to_string(&pre).unwrap();
        let back: Preprocessor = serde_json::from_str(&json).unwrap();
        assert_eq!(pre, back);
    }
}
