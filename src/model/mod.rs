//! The classifier, its evaluation metrics, and the frozen artifact.

pub mod artifact;
pub mod logistic;
pub mod metrics;

pub use artifact::{ArtifactMetadata, ModelArtifact};
pub use logistic::{FitConfig, LogisticModel};
