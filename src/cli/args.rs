//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Leadscore - Score marketing leads for purchase intent with explanations
#[derive(Parser, Debug)]
#[command(name = "leadscore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a scoring model from a labeled historical table
    Train {
        /// Input file path (CSV or Parquet) with one row per historical lead
        #[arg(short, long)]
        input: PathBuf,

        /// Binary label column (1 = converted)
        #[arg(short, long, default_value = "converted")]
        target: String,

        /// Where to write the frozen model artifact
        #[arg(short, long, default_value = "model.json")]
        artifact: PathBuf,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Seed for the stratified split shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Gradient descent epochs
        #[arg(long, default_value = "500")]
        epochs: usize,

        /// Gradient descent learning rate
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,

        /// L2 regularization strength
        #[arg(long, default_value = "0.0001")]
        l2: f64,

        /// Columns to exclude from the feature set (comma-separated).
        /// These must exist in the input table.
        #[arg(long, value_delimiter = ',')]
        drop_columns: Vec<String>,

        /// Explicit numeric feature columns (comma-separated).
        /// When neither this nor --categorical-columns is given, the
        /// schema is inferred from column dtypes.
        #[arg(long, value_delimiter = ',')]
        numeric_columns: Option<Vec<String>>,

        /// Explicit categorical feature columns (comma-separated)
        #[arg(long, value_delimiter = ',')]
        categorical_columns: Option<Vec<String>>,

        /// Also write a JSON training report with metrics and the named
        /// coefficient table
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip interactive confirmation prompts
        #[arg(long, default_value = "false")]
        no_confirm: bool,

        /// Number of rows to use for schema inference (CSV only).
        /// Use 0 for full table scan.
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Score a single lead against a trained artifact
    Score {
        /// Path to the trained model artifact
        #[arg(short, long, default_value = "model.json")]
        artifact: PathBuf,

        /// Lead attributes as inline JSON, e.g. '{"channel": "Email", "time_on_site": 600}'
        #[arg(short, long, conflicts_with = "lead_file")]
        lead: Option<String>,

        /// Path to a JSON file holding the lead attributes
        #[arg(short = 'f', long)]
        lead_file: Option<PathBuf>,

        /// Emit the score record as JSON instead of the styled summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Score every row of a table and persist leads and scores
    Batch {
        /// Path to the trained model artifact
        #[arg(short, long, default_value = "model.json")]
        artifact: PathBuf,

        /// Input file path (CSV or Parquet) with one row per lead
        #[arg(short, long)]
        input: PathBuf,

        /// Lead store file
        #[arg(short, long, default_value = "leads.json")]
        store: PathBuf,

        /// Tenant the leads belong to
        #[arg(long, default_value = "default")]
        tenant: String,

        /// Scores at or above this trigger the follow-up action
        #[arg(long, default_value = "70")]
        threshold: u8,

        /// Columns to ignore when building leads (comma-separated)
        #[arg(long, value_delimiter = ',')]
        drop_columns: Vec<String>,

        /// Number of rows to use for schema inference (CSV only).
        /// Use 0 for full table scan.
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Score stored leads that have no score row yet
    Sync {
        /// Path to the trained model artifact
        #[arg(short, long, default_value = "model.json")]
        artifact: PathBuf,

        /// Lead store file
        #[arg(short, long, default_value = "leads.json")]
        store: PathBuf,

        /// Scores at or above this trigger the follow-up action
        #[arg(long, default_value = "70")]
        threshold: u8,
    },
}
