//! Integration tests for the full train-then-score pipeline

use polars::prelude::*;

use leadscore::model::ModelArtifact;
use leadscore::orchestrator::Orchestrator;
use leadscore::pipeline::loader::load_table;
use leadscore::pipeline::{FieldValue, RawLead};
use leadscore::scoring::Scorer;
use leadscore::store::{JsonLeadStore, LeadStore, StoreConfig};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn engaged_lead() -> RawLead {
    let mut lead = RawLead::new();
    lead.insert("channel".to_string(), FieldValue::from("Email"));
    lead.insert("campaign".to_string(), FieldValue::from("Demo_Request"));
    lead.insert("time_on_site".to_string(), FieldValue::from(600.0));
    lead.insert("pages_visited".to_string(), FieldValue::from(10i64));
    lead.insert("newsletter_sub".to_string(), FieldValue::from(true));
    lead.insert("downloads".to_string(), FieldValue::from(3i64));
    lead
}

#[test]
fn test_train_from_csv_then_score() {
    let mut df = create_leads_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);

    let df = load_table(&csv_path, 100).unwrap();
    let outcome = train_fixture(&df);
    assert!(outcome.auc > 0.9, "fixture signal is separable, got AUC {}", outcome.auc);

    let artifact_path = temp_dir.path().join("model.json");
    outcome.artifact.save(&artifact_path).unwrap();

    let scorer = Scorer::from_path(&artifact_path).unwrap();
    let record = scorer.predict(&engaged_lead());

    assert!(record.score >= 70, "engaged lead should score high, got {}", record.score);
    assert_eq!(record.score, (record.probability * 100.0).round() as u8);
    assert!(record.explanation.top_positive_factors.len() <= 3);
    assert!(record.explanation.top_negative_factors.len() <= 3);
}

#[test]
fn test_saved_artifact_is_loadable_and_equal() {
    let df = create_leads_dataframe();
    let outcome = train_fixture(&df);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    outcome.artifact.save(&path).unwrap();

    let loaded = ModelArtifact::load(&path).unwrap();
    assert_eq!(loaded, outcome.artifact);
    assert_eq!(loaded.metadata.algorithm, "logistic_regression");
    assert_eq!(
        loaded.metadata.numeric_cols,
        loaded.schema.numeric,
    );
}

#[test]
fn test_batch_scoring_persists_every_lead() {
    let df = create_leads_dataframe();
    let outcome = train_fixture(&df);
    let scorer = Scorer::new(outcome.artifact);

    let dir = tempfile::tempdir().unwrap();
    let store = JsonLeadStore::new(StoreConfig::new(dir.path().join("leads.json")));
    let orchestrator = Orchestrator::new(&scorer, &store);

    let batch = df! {
        "lead_id" => [100i64, 101],
        "channel" => ["Email", "Ads"],
        "campaign" => ["Demo_Request", "Brand_Awareness"],
        "time_on_site" => [550.0f64, 12.0],
        "pages_visited" => [9i64, 1],
        "newsletter_sub" => [true, false],
        "downloads" => [4i64, 0],
        "converted" => [1i32, 0],
    }
    .unwrap();

    let exclude = vec!["lead_id".to_string(), "converted".to_string()];
    let result = orchestrator.process_batch(&batch, &exclude, "tenant-1").unwrap();

    assert_eq!(result.processed.len(), 2);
    assert_eq!(result.persistence_failures, 0);
    assert_eq!(result.actions_triggered, 1);
    assert!(store.get_unscored_leads().unwrap().is_empty());

    // Engaged row outscores the idle one.
    let engaged = &result.processed[0].record;
    let idle = &result.processed[1].record;
    assert!(engaged.score > idle.score);
}

#[test]
fn test_sync_picks_up_leads_inserted_out_of_band() {
    let df = create_leads_dataframe();
    let outcome = train_fixture(&df);
    let scorer = Scorer::new(outcome.artifact);

    let dir = tempfile::tempdir().unwrap();
    let store = JsonLeadStore::new(StoreConfig::new(dir.path().join("leads.json")));
    store.insert_lead(&engaged_lead(), "tenant-1").unwrap();

    let orchestrator = Orchestrator::new(&scorer, &store);
    let processed = orchestrator.sync_unscored().unwrap();

    assert_eq!(processed.len(), 1);
    assert!(processed[0].score_persisted);
    assert!(store.get_unscored_leads().unwrap().is_empty());
}

#[test]
fn test_retraining_with_same_seed_reproduces_artifact_parameters() {
    let df = create_leads_dataframe();
    let a = train_fixture(&df);
    let b = train_fixture(&df);

    assert_eq!(a.artifact.classifier, b.artifact.classifier);
    assert_eq!(a.artifact.preprocessor, b.artifact.preprocessor);
    assert_eq!(a.auc, b.auc);
}
