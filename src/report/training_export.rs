//! Training run export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::train::TrainOutcome;

/// Metadata about the training run
#[derive(Serialize)]
pub struct TrainingMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Leadscore version
    pub leadscore_version: String,
    /// Input file path
    pub input_file: String,
    /// Target column name
    pub target_column: String,
    /// Held-out fraction used for evaluation
    pub test_fraction: f64,
    /// Split seed
    pub seed: u64,
    /// Classifier algorithm
    pub algorithm: String,
}

/// Summary statistics of the training run
#[derive(Serialize)]
pub struct TrainingSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub positives: usize,
    pub negatives: usize,
    pub roc_auc: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub numeric_features: usize,
    pub categorical_features: usize,
    pub encoded_width: usize,
}

/// One fitted coefficient, named by its encoded feature
#[derive(Serialize)]
pub struct CoefficientEntry {
    pub feature: String,
    pub coefficient: f64,
}

/// Complete training run export with metadata
#[derive(Serialize)]
pub struct TrainingRunExport {
    pub metadata: TrainingMetadata,
    pub summary: TrainingSummary,
    pub intercept: f64,
    pub coefficients: Vec<CoefficientEntry>,
}

/// Parameters for training run export
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub test_fraction: f64,
    pub seed: u64,
}

/// Export a training run to a JSON file with metadata and the named
/// coefficient table
pub fn export_training_run(
    outcome: &TrainOutcome,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let artifact = &outcome.artifact;
    let names = artifact.preprocessor.output_names();

    let coefficients: Vec<CoefficientEntry> = names
        .iter()
        .zip(artifact.classifier.coefficients())
        .map(|(feature, &coefficient)| CoefficientEntry {
            feature: feature.clone(),
            coefficient,
        })
        .collect();

    let export = TrainingRunExport {
        metadata: TrainingMetadata {
            timestamp: Utc::now().to_rfc3339(),
            leadscore_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            test_fraction: params.test_fraction,
            seed: params.seed,
            algorithm: artifact.metadata.algorithm.clone(),
        },
        summary: TrainingSummary {
            train_rows: outcome.train_rows,
            test_rows: outcome.test_rows,
            positives: outcome.positives,
            negatives: outcome.negatives,
            roc_auc: outcome.auc,
            accuracy: outcome.confusion.accuracy(),
            precision: outcome.confusion.precision(),
            recall: outcome.confusion.recall(),
            numeric_features: artifact.schema.numeric.len(),
            categorical_features: artifact.schema.categorical.len(),
            encoded_width: artifact.preprocessor.output_width(),
        },
        intercept: artifact.classifier.intercept(),
        coefficients,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize training run to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write training report to {}", output_path.display()))?;

    Ok(())
}
