//! Leadscore: Lead Intent Scoring CLI Tool
//!
//! Train an intent model on historical leads, then score new leads
//! with an explanation of the driving factors.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dialoguer::Confirm;

use leadscore::cli::{Cli, Commands};
use leadscore::model::logistic::FitConfig;
use leadscore::orchestrator::Orchestrator;
use leadscore::pipeline::loader::load_table;
use leadscore::pipeline::train::{self, TrainConfig};
use leadscore::pipeline::RawLead;
use leadscore::report::{display_score_record, display_training_summary, export_training_run, ExportParams};
use leadscore::scoring::Scorer;
use leadscore::store::{JsonLeadStore, StoreConfig};
use leadscore::utils::progress::{create_spinner, finish_with_success};
use leadscore::utils::styling::{
    print_banner, print_completion, print_info, print_step_header, print_success,
    print_train_config,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            input,
            target,
            artifact,
            test_fraction,
            seed,
            epochs,
            learning_rate,
            l2,
            drop_columns,
            numeric_columns,
            categorical_columns,
            report,
            no_confirm,
            infer_schema_length,
        } => run_train(TrainArgs {
            input,
            target,
            artifact,
            test_fraction,
            seed,
            epochs,
            learning_rate,
            l2,
            drop_columns,
            numeric_columns,
            categorical_columns,
            report,
            no_confirm,
            infer_schema_length,
        }),
        Commands::Score {
            artifact,
            lead,
            lead_file,
            json,
        } => run_score(&artifact, lead.as_deref(), lead_file.as_deref(), json),
        Commands::Batch {
            artifact,
            input,
            store,
            tenant,
            threshold,
            drop_columns,
            infer_schema_length,
        } => run_batch(&artifact, &input, &store, &tenant, threshold, &drop_columns, infer_schema_length),
        Commands::Sync {
            artifact,
            store,
            threshold,
        } => run_sync(&artifact, &store, threshold),
    }
}

struct TrainArgs {
    input: PathBuf,
    target: String,
    artifact: PathBuf,
    test_fraction: f64,
    seed: u64,
    epochs: usize,
    learning_rate: f64,
    l2: f64,
    drop_columns: Vec<String>,
    numeric_columns: Option<Vec<String>>,
    categorical_columns: Option<Vec<String>>,
    report: Option<PathBuf>,
    no_confirm: bool,
    infer_schema_length: usize,
}

fn run_train(args: TrainArgs) -> Result<()> {
    if args.artifact.exists() && !args.no_confirm {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Artifact {} already exists. Overwrite?",
                args.artifact.display()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Cancelled by user.");
            return Ok(());
        }
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_train_config(
        &args.input,
        &args.target,
        &args.artifact,
        args.test_fraction,
        args.seed,
    );

    print_step_header(1, "Load Historical Leads");
    let spinner = create_spinner("Loading dataset...");
    let df = load_table(&args.input, args.infer_schema_length)?;
    finish_with_success(
        &spinner,
        &format!("Loaded {} rows, {} columns", df.height(), df.width()),
    );

    print_step_header(2, "Fit Transformer and Classifier");
    let config = TrainConfig {
        target: args.target.clone(),
        drop_columns: args.drop_columns,
        numeric_columns: args.numeric_columns,
        categorical_columns: args.categorical_columns,
        test_fraction: args.test_fraction,
        seed: args.seed,
        fit: FitConfig {
            epochs: args.epochs,
            learning_rate: args.learning_rate,
            l2: args.l2,
            ..FitConfig::default()
        },
    };
    let spinner = create_spinner("Training classifier...");
    let outcome = train::run(&df, &config)?;
    finish_with_success(&spinner, "Training complete");

    print_step_header(3, "Freeze Artifact");
    outcome
        .artifact
        .save(&args.artifact)
        .with_context(|| format!("Failed to write artifact to {}", args.artifact.display()))?;
    print_success(&format!("Artifact saved to {}", args.artifact.display()));

    if let Some(report_path) = &args.report {
        let input_display = args.input.display().to_string();
        let params = ExportParams {
            input_file: &input_display,
            target_column: &args.target,
            test_fraction: args.test_fraction,
            seed: args.seed,
        };
        export_training_run(&outcome, report_path, &params)?;
        print_success(&format!("Training report saved to {}", report_path.display()));
    }

    display_training_summary(&outcome);
    print_completion("Leadscore training complete!");
    Ok(())
}

fn run_score(
    artifact: &Path,
    inline: Option<&str>,
    lead_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let raw = match (inline, lead_file) {
        (Some(inline), None) => inline.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lead file: {}", path.display()))?,
        _ => anyhow::bail!("Provide the lead with either --lead or --lead-file."),
    };
    let lead: RawLead = serde_json::from_str(&raw).context("Lead is not a valid JSON object")?;

    let scorer = Scorer::from_path(artifact)?;
    let record = scorer.predict(&lead);

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        display_score_record(&record);
    }
    Ok(())
}

fn run_batch(
    artifact: &Path,
    input: &Path,
    store_path: &Path,
    tenant: &str,
    threshold: u8,
    drop_columns: &[String],
    infer_schema_length: usize,
) -> Result<()> {
    let scorer = Scorer::from_path(artifact)?;
    let store = JsonLeadStore::new(StoreConfig::new(store_path));

    let spinner = create_spinner("Loading leads...");
    let df = load_table(input, infer_schema_length)?;
    finish_with_success(&spinner, &format!("Loaded {} lead(s)", df.height()));

    let orchestrator = Orchestrator::new(&scorer, &store)
        .with_threshold(threshold)
        .with_action_hook(|lead_id, record| {
            println!(
                "    {} High-intent lead {} scored {} (driven by {})",
                style("🔥").red(),
                style(lead_id).bold(),
                style(record.score).green().bold(),
                record.explanation.top_positive_factors.join(", ")
            );
        });

    let spinner = create_spinner("Scoring batch...");
    let outcome = orchestrator.process_batch(&df, drop_columns, tenant)?;
    finish_with_success(
        &spinner,
        &format!("Scored {} lead(s)", outcome.processed.len()),
    );

    print_info(&format!(
        "{} lead(s) cleared the action threshold ({})",
        outcome.actions_triggered, threshold
    ));
    if outcome.persistence_failures > 0 {
        println!(
            "    {} {} lead(s) could not be fully persisted",
            style("⚠").yellow(),
            outcome.persistence_failures
        );
    }
    print_success(&format!("Leads and scores written to {}", store_path.display()));
    Ok(())
}

fn run_sync(artifact: &Path, store_path: &Path, threshold: u8) -> Result<()> {
    let scorer = Scorer::from_path(artifact)?;
    let store = JsonLeadStore::new(StoreConfig::new(store_path));
    let orchestrator = Orchestrator::new(&scorer, &store).with_threshold(threshold);

    let spinner = create_spinner("Scoring stored leads...");
    let processed = orchestrator.sync_unscored()?;
    finish_with_success(&spinner, &format!("Scored {} stored lead(s)", processed.len()));

    for item in &processed {
        let score_style = if item.action_triggered {
            style(item.record.score).green().bold()
        } else {
            style(item.record.score).dim()
        };
        println!("      {} {} {}", style("•").dim(), item.lead_id, score_style);
    }
    if processed.is_empty() {
        print_info("No unscored leads found");
    }
    Ok(())
}
