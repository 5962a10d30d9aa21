//! Single-file JSON store.
//!
//! Every operation reads the whole file, mutates in memory, and writes
//! back through a temp-file rename so a crashed process never leaves a
//! half-written store behind. Suitable for batch jobs, not for
//! concurrent writers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScoreError};
use crate::pipeline::RawLead;
use crate::scoring::ScoreRecord;
use crate::store::{LeadStore, StoredLead, StoredScore};

/// Backend configuration, passed in explicitly rather than read from
/// the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    leads: Vec<StoredLead>,
    scores: Vec<StoredScore>,
}

/// File-backed [`LeadStore`] implementation.
#[derive(Debug, Clone)]
pub struct JsonLeadStore {
    config: StoreConfig,
}

impl JsonLeadStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn read(&self) -> Result<StoreFile> {
        if !self.config.path.exists() {
            return Ok(StoreFile::default());
        }
        let raw = fs::read_to_string(&self.config.path)
            .map_err(|e| ScoreError::Store(format!("failed to read store file: {}", e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ScoreError::Store(format!("store file is corrupt: {}", e)))
    }

    fn write(&self, file: &StoreFile) -> Result<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScoreError::Store(format!("failed to create store dir: {}", e)))?;
            }
        }
        let tmp = self.config.path.with_extension("json.tmp");
        let serialized = serde_json::to_string_pretty(file)
            .map_err(|e| ScoreError::Store(format!("failed to serialize store: {}", e)))?;
        fs::write(&tmp, serialized)
            .map_err(|e| ScoreError::Store(format!("failed to write store file: {}", e)))?;
        fs::rename(&tmp, &self.config.path)
            .map_err(|e| ScoreError::Store(format!("failed to replace store file: {}", e)))?;
        Ok(())
    }
}

impl LeadStore for JsonLeadStore {
    fn insert_lead(&self, lead: &RawLead, tenant_id: &str) -> Result<String> {
        let mut file = self.read()?;
        let id = Uuid::new_v4().to_string();
        file.leads.push(StoredLead {
            id: id.clone(),
            tenant_id: tenant_id.to_string(),
            fields: lead.clone(),
            created_at: Utc::now().to_rfc3339(),
        });
        self.write(&file)?;
        Ok(id)
    }

    fn insert_score(&self, lead_id: &str, record: &ScoreRecord) -> Result<()> {
        let mut file = self.read()?;
        if !file.leads.iter().any(|l| l.id == lead_id) {
            return Err(ScoreError::Store(format!(
                "cannot attach score to unknown lead '{}'",
                lead_id
            )));
        }
        file.scores.push(StoredScore {
            lead_id: lead_id.to_string(),
            score: record.score,
            probability: record.probability,
            explanation: record.explanation.clone(),
            scored_at: Utc::now().to_rfc3339(),
        });
        self.write(&file)
    }

    fn get_unscored_leads(&self) -> Result<Vec<StoredLead>> {
        let file = self.read()?;
        Ok(file
            .leads
            .into_iter()
            .filter(|lead| !file.scores.iter().any(|s| s.lead_id == lead.id))
            .collect())
    }
}
