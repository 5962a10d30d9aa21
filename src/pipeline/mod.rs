//! Data preparation: raw lead representation, feature schema, the
//! fitted preprocessing transformer, table loading, and the offline
//! training procedure.

pub mod lead;
pub mod loader;
pub mod schema;
pub mod split;
pub mod train;
pub mod transform;

pub use lead::{leads_from_frame, FieldValue, RawLead};
pub use schema::FeatureSchema;
pub use transform::{Preprocessor, MISSING_CATEGORY};
