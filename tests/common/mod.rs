//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use leadscore::pipeline::train::{self, TrainConfig, TrainOutcome};

/// Create a marketing-lead DataFrame with a learnable engagement signal
///
/// Even rows are engaged leads (long sessions, downloads, Email/Referral
/// channels) that converted; odd rows are idle leads that did not.
pub fn create_leads_dataframe() -> DataFrame {
    let n = 60;
    let mut channel = Vec::with_capacity(n);
    let mut campaign = Vec::with_capacity(n);
    let mut time_on_site = Vec::with_capacity(n);
    let mut pages_visited = Vec::with_capacity(n);
    let mut newsletter_sub = Vec::with_capacity(n);
    let mut downloads = Vec::with_capacity(n);
    let mut converted = Vec::with_capacity(n);

    for i in 0..n {
        let engaged = i % 2 == 0;
        channel.push(if engaged {
            if i % 4 == 0 { "Email" } else { "Referral" }
        } else {
            "Ads"
        });
        campaign.push(if engaged { "Demo_Request" } else { "Brand_Awareness" });
        time_on_site.push(if engaged {
            300.0 + (i as f64) * 7.0
        } else {
            20.0 + (i as f64) * 1.5
        });
        pages_visited.push(if engaged { 6 + (i as i64 % 5) } else { 1 + (i as i64 % 2) });
        newsletter_sub.push(engaged);
        downloads.push(if engaged { 2 + (i as i64 % 3) } else { 0 });
        converted.push(i32::from(engaged));
    }

    df! {
        "lead_id" => (0..n as i64).collect::<Vec<i64>>(),
        "channel" => channel,
        "campaign" => campaign,
        "time_on_site" => time_on_site,
        "pages_visited" => pages_visited,
        "newsletter_sub" => newsletter_sub,
        "downloads" => downloads,
        "converted" => converted,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("leads.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Train on the fixture table with default settings
pub fn train_fixture(df: &DataFrame) -> TrainOutcome {
    train::run(df, &TrainConfig::new("converted")).unwrap()
}
