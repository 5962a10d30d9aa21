//! Terminal summaries and JSON export of training runs.

pub mod summary;
pub mod training_export;

pub use summary::{display_score_record, display_training_summary};
pub use training_export::{export_training_run, ExportParams};
