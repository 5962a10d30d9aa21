//! Scorer: the sole externally-consumed entry point of the serving core
//!
//! `predict` is a pure function of (frozen artifact, raw lead): no shared
//! mutable state, no I/O, safe to call concurrently from any number of
//! threads. Everything that can fail (loading and validating the
//! artifact) fails at construction; per-lead scoring is infallible.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::artifact::ModelArtifact;
use crate::pipeline::lead::RawLead;
use crate::scoring::explain::{explain, Explanation};

/// One scored lead: bounded integer score, calibrated probability, and
/// the ranked feature attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// round(probability * 100), always in 0..=100.
    pub score: u8,
    /// Conversion probability rounded to 4 decimal places.
    pub probability: f64,
    pub explanation: Explanation,
}

/// Frozen artifact plus the precomputed coordinate->name mapping.
#[derive(Debug, Clone)]
pub struct Scorer {
    artifact: ModelArtifact,
    feature_names: Vec<String>,
}

impl Scorer {
    /// Wrap an already-validated artifact.
    pub fn new(artifact: ModelArtifact) -> Self {
        let feature_names = artifact.preprocessor.output_names();
        Self {
            artifact,
            feature_names,
        }
    }

    /// Load the frozen artifact from disk. Fails with `ModelUnavailable`
    /// when the artifact is missing or structurally inconsistent; callers
    /// must treat that as scoring infrastructure being down, not as a
    /// property of any lead.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(ModelArtifact::load(path)?))
    }

    /// Score one raw lead. Missing schema fields and unseen category
    /// values are normalized by the preprocessor; no lead shape can make
    /// this fail.
    pub fn predict(&self, lead: &RawLead) -> ScoreRecord {
        let features = self.artifact.preprocessor.transform_lead(lead);
        let raw_probability = self.artifact.classifier.predict_probability(&features);

        // The reported probability is rounded to 4 decimal places and the
        // score derives from that reported value, so the two never
        // disagree at a rounding boundary.
        let probability = (raw_probability * 10_000.0).round() / 10_000.0;
        let score = (probability * 100.0).round() as u8;

        let explanation = explain(
            &features,
            self.artifact.classifier.coefficients(),
            &self.feature_names,
        );

        ScoreRecord {
            score,
            probability,
            explanation,
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}
