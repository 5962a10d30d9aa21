//! Offline training procedure
//!
//! Fits the preprocessing transformer and the logistic classifier on the
//! training partition of a labeled historical table, evaluates ROC-AUC on
//! the held-out partition, and assembles the frozen artifact. Any
//! schema/table mismatch aborts before an artifact exists; a training run
//! can never leave an unusable artifact behind.

use polars::prelude::*;

use crate::error::{Result, ScoreError};
use crate::model::artifact::ModelArtifact;
use crate::model::logistic::{FitConfig, LogisticModel};
use crate::model::metrics::{confusion_counts, roc_auc, ConfusionCounts};
use crate::pipeline::schema::FeatureSchema;
use crate::pipeline::split::{stratified_split_indices, take_labels, take_rows};
use crate::pipeline::transform::Preprocessor;

/// Columns stripped before training when present: identifiers and
/// ingestion timestamps carry no intent signal.
pub const DEFAULT_NON_FEATURE_COLUMNS: [&str; 2] = ["lead_id", "created_at"];

/// Tolerance for recognizing 0/1 labels stored as floats.
const LABEL_TOLERANCE: f64 = 1e-9;

/// Everything a training run needs besides the table itself.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Binary label column (1 = converted).
    pub target: String,
    /// Declared non-feature columns. Unlike the defaults, a declared
    /// column absent from the table is a configuration error.
    pub drop_columns: Vec<String>,
    /// Explicit field lists; when None the schema is inferred from dtypes.
    pub numeric_columns: Option<Vec<String>>,
    pub categorical_columns: Option<Vec<String>>,
    /// Held-out fraction for the stratified split.
    pub test_fraction: f64,
    pub seed: u64,
    pub fit: FitConfig,
}

impl TrainConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            drop_columns: Vec::new(),
            numeric_columns: None,
            categorical_columns: None,
            test_fraction: 0.2,
            seed: 42,
            fit: FitConfig::default(),
        }
    }
}

/// Result of one training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    pub auc: f64,
    pub confusion: ConfusionCounts,
    pub train_rows: usize,
    pub test_rows: usize,
    pub positives: usize,
    pub negatives: usize,
}

/// Run the full offline procedure on an already-loaded table.
pub fn run(df: &DataFrame, config: &TrainConfig) -> Result<TrainOutcome> {
    if df.height() == 0 {
        return Err(ScoreError::Configuration(
            "training table is empty".to_string(),
        ));
    }

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    // Declared non-feature columns must exist; silently ignoring a typo
    // here would leak the column into the feature set.
    for dropped in &config.drop_columns {
        if !columns.contains(dropped) {
            return Err(ScoreError::Configuration(format!(
                "declared non-feature column '{}' not found in training table",
                dropped
            )));
        }
    }

    let labels = extract_binary_labels(df, &config.target)?;

    // Rows without a label cannot teach anything; drop them up front.
    let labeled_indices: Vec<u32> = labels
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.map(|_| i as u32))
        .collect();
    if labeled_indices.len() < labels.len() {
        eprintln!(
            "Warning: dropping {} row(s) with null '{}' label",
            labels.len() - labeled_indices.len(),
            config.target
        );
    }
    let df = take_rows(df, &labeled_indices)?;
    let labels: Vec<i32> = labels.into_iter().flatten().collect();

    let schema = resolve_schema(&df, config)?;
    schema.validate_against(&df)?;

    let split = stratified_split_indices(&labels, config.test_fraction, config.seed)?;
    let train_df = take_rows(&df, &split.train)?;
    let test_df = take_rows(&df, &split.test)?;
    let train_labels = take_labels(&labels, &split.train);
    let test_labels = take_labels(&labels, &split.test);

    // Fit on the training partition only; the held-out rows never touch
    // the transformer statistics.
    let preprocessor = Preprocessor::fit(&train_df, &schema)?;
    let train_features = preprocessor.transform_frame(&train_df)?;
    let classifier = LogisticModel::fit(&train_features, &train_labels, &config.fit)?;

    let test_features = preprocessor.transform_frame(&test_df)?;
    let test_probabilities: Vec<f64> = test_features
        .iter()
        .map(|row| classifier.predict_probability(row))
        .collect();

    let auc = roc_auc(&test_probabilities, &test_labels);
    let confusion = confusion_counts(&test_probabilities, &test_labels, 0.5);

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;

    let artifact = ModelArtifact::new(schema, preprocessor, classifier, auc)?;

    Ok(TrainOutcome {
        artifact,
        auc,
        confusion,
        train_rows: train_df.height(),
        test_rows: test_df.height(),
        positives,
        negatives,
    })
}

/// Explicit field lists when provided, dtype inference otherwise.
fn resolve_schema(df: &DataFrame, config: &TrainConfig) -> Result<FeatureSchema> {
    match (&config.numeric_columns, &config.categorical_columns) {
        (None, None) => {
            let mut exclude = config.drop_columns.clone();
            for default in DEFAULT_NON_FEATURE_COLUMNS {
                let name = default.to_string();
                if !exclude.contains(&name) {
                    exclude.push(name);
                }
            }
            FeatureSchema::infer(df, &config.target, &exclude)
        }
        (numeric, categorical) => Ok(FeatureSchema::new(
            numeric.clone().unwrap_or_default(),
            categorical.clone().unwrap_or_default(),
        )),
    }
}

/// Extract the label column as 0/1 values, `None` for null rows.
///
/// Fails loudly when the column is absent, empty, all-null, or contains
/// anything other than 0/1 (with float tolerance).
fn extract_binary_labels(df: &DataFrame, target: &str) -> Result<Vec<Option<i32>>> {
    let col = df.column(target).map_err(|_| {
        ScoreError::Configuration(format!(
            "label column '{}' not found in training table",
            target
        ))
    })?;

    if col.len() == 0 {
        return Err(ScoreError::Configuration(format!(
            "label column '{}' is empty",
            target
        )));
    }
    if col.null_count() == col.len() {
        return Err(ScoreError::Configuration(format!(
            "label column '{}' contains only null values",
            target
        )));
    }

    let float_col = col.cast(&DataType::Float64).map_err(|_| {
        ScoreError::Configuration(format!(
            "label column '{}' must be numeric 0/1",
            target
        ))
    })?;

    let mut labels = Vec::with_capacity(col.len());
    for value in float_col.f64()?.into_iter() {
        match value {
            None => labels.push(None),
            Some(v) if (v - 0.0).abs() < LABEL_TOLERANCE => labels.push(Some(0)),
            Some(v) if (v - 1.0).abs() < LABEL_TOLERANCE => labels.push(Some(1)),
            Some(v) => {
                return Err(ScoreError::Configuration(format!(
                    "label column '{}' must be binary (0/1), found {}",
                    target, v
                )))
            }
        }
    }

    Ok(labels)
}
