//! Frozen model artifact
//!
//! The (schema, preprocessor, classifier, metadata) quadruple produced by
//! one training run. Immutable for the lifetime of a serving process and
//! replaced only as a unit. Persisted as a single JSON document, written
//! atomically so a crashed training run never leaves a half-written
//! artifact behind.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::model::logistic::LogisticModel;
use crate::pipeline::schema::FeatureSchema;
use crate::pipeline::transform::Preprocessor;

/// Algorithm identifier stamped into every artifact.
pub const ALGORITHM: &str = "logistic_regression";

/// Training-run metadata carried alongside the frozen pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    /// Held-out ROC-AUC from the producing training run.
    pub auc: f64,
    pub algorithm: String,
    /// ISO-8601 timestamp of the training run.
    pub trained_at: String,
    /// Crate version that produced the artifact.
    pub version: String,
}

/// The immutable (preprocessor, classifier) pair plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: FeatureSchema,
    pub preprocessor: Preprocessor,
    pub classifier: LogisticModel,
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Assemble an artifact from freshly fitted parts.
    pub fn new(
        schema: FeatureSchema,
        preprocessor: Preprocessor,
        classifier: LogisticModel,
        auc: f64,
    ) -> Result<Self> {
        let artifact = Self {
            metadata: ArtifactMetadata {
                numeric_cols: schema.numeric.clone(),
                categorical_cols: schema.categorical.clone(),
                auc,
                algorithm: ALGORITHM.to_string(),
                trained_at: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            schema,
            preprocessor,
            classifier,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// The coefficient/feature-width alignment is the invariant the whole
    /// explanation rests on; an artifact that violates it must never be
    /// used for scoring.
    pub fn validate(&self) -> Result<()> {
        let width = self.preprocessor.output_width();
        let coefs = self.classifier.coefficients().len();
        if coefs != width {
            return Err(ScoreError::ModelUnavailable(format!(
                "classifier has {} coefficients but the preprocessor produces {} features",
                coefs, width
            )));
        }
        Ok(())
    }

    /// Write the artifact atomically: serialize to a sibling temp file,
    /// then rename over the destination.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load and validate a frozen artifact. Any failure here, including
    /// a width mismatch, surfaces as `ModelUnavailable`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScoreError::ModelUnavailable(format!(
                "cannot read artifact '{}': {}",
                path.display(),
                e
            ))
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&contents).map_err(|e| {
            ScoreError::ModelUnavailable(format!(
                "cannot parse artifact '{}': {}",
                path.display(),
                e
            ))
        })?;

        artifact.validate()?;
        Ok(artifact)
    }
}
