//! Scoring orchestration
//!
//! Ties the scorer to lead storage: a new lead is persisted, scored,
//! its score row written back, and a follow-up action fires when the
//! score clears the threshold. A storage failure after prediction is
//! reported but never withholds the score from the caller.

use rayon::prelude::*;

use crate::error::Result;
use crate::pipeline::{leads_from_frame, RawLead};
use crate::scoring::{ScoreRecord, Scorer};
use crate::store::LeadStore;

/// Scores at or above this trigger the follow-up action.
pub const DEFAULT_ACTION_THRESHOLD: u8 = 70;

type ActionHook = Box<dyn Fn(&str, &ScoreRecord) + Send + Sync>;

/// One fully processed lead.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedLead {
    pub lead_id: String,
    pub record: ScoreRecord,
    /// Whether the score cleared the action threshold.
    pub action_triggered: bool,
    /// Whether the score row reached the store.
    pub score_persisted: bool,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub processed: Vec<ProcessedLead>,
    pub persistence_failures: usize,
    pub actions_triggered: usize,
}

pub struct Orchestrator<'a, S: LeadStore> {
    scorer: &'a Scorer,
    store: &'a S,
    threshold: u8,
    on_action: Option<ActionHook>,
}

impl<'a, S: LeadStore> Orchestrator<'a, S> {
    pub fn new(scorer: &'a Scorer, store: &'a S) -> Self {
        Self {
            scorer,
            store,
            threshold: DEFAULT_ACTION_THRESHOLD,
            on_action: None,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Called once per lead whose score clears the threshold.
    pub fn with_action_hook(
        mut self,
        hook: impl Fn(&str, &ScoreRecord) + Send + Sync + 'static,
    ) -> Self {
        self.on_action = Some(Box::new(hook));
        self
    }

    /// Persist, score, and write back a single incoming lead.
    ///
    /// Inserting the lead must succeed; without an id there is nothing
    /// to attach the score to. Writing the score row back is best
    /// effort: a failure there is reported on stderr and reflected in
    /// `score_persisted`, and the caller still gets the record.
    pub fn process_new_lead(&self, lead: &RawLead, tenant_id: &str) -> Result<ProcessedLead> {
        let lead_id = self.store.insert_lead(lead, tenant_id)?;
        let record = self.scorer.predict(lead);
        Ok(self.finish(lead_id, record))
    }

    /// Score every row of a table. Prediction runs in parallel;
    /// persistence stays sequential and per-lead, so one bad write
    /// never poisons the rest of the batch.
    pub fn process_batch(
        &self,
        df: &polars::prelude::DataFrame,
        exclude_columns: &[String],
        tenant_id: &str,
    ) -> Result<BatchOutcome> {
        let leads = leads_from_frame(df, exclude_columns)?;

        let records: Vec<ScoreRecord> = leads
            .par_iter()
            .map(|lead| self.scorer.predict(lead))
            .collect();

        let mut outcome = BatchOutcome::default();
        for (lead, record) in leads.iter().zip(records) {
            match self.store.insert_lead(lead, tenant_id) {
                Ok(lead_id) => {
                    let processed = self.finish(lead_id, record);
                    if !processed.score_persisted {
                        outcome.persistence_failures += 1;
                    }
                    if processed.action_triggered {
                        outcome.actions_triggered += 1;
                    }
                    outcome.processed.push(processed);
                }
                Err(e) => {
                    eprintln!("Warning: failed to persist lead: {}", e);
                    outcome.persistence_failures += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Score every stored lead that has no score row yet.
    pub fn sync_unscored(&self) -> Result<Vec<ProcessedLead>> {
        let unscored = self.store.get_unscored_leads()?;
        Ok(unscored
            .into_iter()
            .map(|stored| {
                let record = self.scorer.predict(&stored.fields);
                self.finish(stored.id, record)
            })
            .collect())
    }

    fn finish(&self, lead_id: String, record: ScoreRecord) -> ProcessedLead {
        let score_persisted = match self.store.insert_score(&lead_id, &record) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Warning: failed to persist score for lead {}: {}", lead_id, e);
                false
            }
        };

        let action_triggered = record.score >= self.threshold;
        if action_triggered {
            if let Some(hook) = &self.on_action {
                hook(&lead_id, &record);
            }
        }

        ProcessedLead {
            lead_id,
            record,
            action_triggered,
            score_persisted,
        }
    }
}
