//! Tests for CLI argument parsing and binary smoke behavior

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;

use leadscore::cli::{Cli, Commands};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_train_default_values() {
    let cli = Cli::parse_from(["leadscore", "train", "-i", "leads.csv"]);

    match cli.command {
        Commands::Train {
            target,
            test_fraction,
            seed,
            epochs,
            learning_rate,
            l2,
            infer_schema_length,
            ..
        } => {
            assert_eq!(target, "converted", "Default target should be 'converted'");
            assert_eq!(test_fraction, 0.2, "Default held-out fraction should be 0.2");
            assert_eq!(seed, 42, "Default seed should be 42");
            assert_eq!(epochs, 500, "Default epochs should be 500");
            assert_eq!(learning_rate, 0.1, "Default learning rate should be 0.1");
            assert_eq!(l2, 0.0001, "Default L2 strength should be 1e-4");
            assert_eq!(
                infer_schema_length, 10000,
                "Default schema inference should be 10000"
            );
        }
        _ => panic!("expected train subcommand"),
    }
}

#[test]
fn test_cli_explicit_schema_columns() {
    let cli = Cli::parse_from([
        "leadscore",
        "train",
        "-i",
        "leads.csv",
        "--numeric-columns",
        "time_on_site,downloads",
        "--categorical-columns",
        "channel",
    ]);

    match cli.command {
        Commands::Train {
            numeric_columns,
            categorical_columns,
            ..
        } => {
            assert_eq!(
                numeric_columns,
                Some(vec!["time_on_site".to_string(), "downloads".to_string()])
            );
            assert_eq!(categorical_columns, Some(vec!["channel".to_string()]));
        }
        _ => panic!("expected train subcommand"),
    }
}

#[test]
fn test_train_and_score_binary_round_trip() {
    let mut df = create_leads_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let artifact_path = temp_dir.path().join("model.json");

    Command::cargo_bin("leadscore")
        .unwrap()
        .args([
            "train",
            "-i",
            csv_path.to_str().unwrap(),
            "-a",
            artifact_path.to_str().unwrap(),
            "--no-confirm",
        ])
        .assert()
        .success();
    assert!(artifact_path.exists());

    Command::cargo_bin("leadscore")
        .unwrap()
        .args([
            "score",
            "-a",
            artifact_path.to_str().unwrap(),
            "--lead",
            r#"{"channel": "Email", "campaign": "Demo_Request", "time_on_site": 600, "pages_visited": 10, "newsletter_sub": true, "downloads": 3}"#,
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"score\""))
        .stdout(predicate::str::contains("top_positive_factors"));
}

#[test]
fn test_score_without_artifact_fails() {
    Command::cargo_bin("leadscore")
        .unwrap()
        .args(["score", "-a", "/nonexistent/model.json", "--lead", "{}"])
        .assert()
        .failure();
}

#[test]
fn test_missing_subcommand_fails() {
    Command::cargo_bin("leadscore").unwrap().assert().failure();
}
