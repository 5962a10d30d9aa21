//! Online scoring: per-lead prediction and factor attribution.

pub mod explain;
pub mod scorer;

pub use explain::Explanation;
pub use scorer::{ScoreRecord, Scorer};
