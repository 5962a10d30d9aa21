//! Lead persistence.
//!
//! Scoring itself never touches storage; the orchestrator talks to a
//! [`LeadStore`] so the persistence backend can be swapped without
//! touching the model code. The bundled backend is a single-file JSON
//! store, enough for batch jobs and local runs.

pub mod json;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::RawLead;
use crate::scoring::ScoreRecord;

pub use json::{JsonLeadStore, StoreConfig};

/// A lead as the store returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLead {
    pub id: String,
    pub tenant_id: String,
    pub fields: RawLead,
    pub created_at: String,
}

/// A persisted score row, joined to its lead by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    pub lead_id: String,
    pub score: u8,
    pub probability: f64,
    pub explanation: crate::scoring::Explanation,
    pub scored_at: String,
}

/// Contract between the orchestrator and whatever holds the leads.
pub trait LeadStore {
    /// Persist a raw lead and return its assigned id.
    fn insert_lead(&self, lead: &RawLead, tenant_id: &str) -> Result<String>;

    /// Attach a score record to a previously inserted lead.
    fn insert_score(&self, lead_id: &str, record: &ScoreRecord) -> Result<()>;

    /// Leads that have no score row yet, oldest first.
    fn get_unscored_leads(&self) -> Result<Vec<StoredLead>>;
}
