//! Terminal summary output for training runs and individual scores

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::train::TrainOutcome;
use crate::scoring::ScoreRecord;

/// Print the post-training summary table.
pub fn display_training_summary(outcome: &TrainOutcome) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("TRAINING SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("📁 Training Rows"),
        Cell::new(outcome.train_rows),
    ]);
    table.add_row(vec![
        Cell::new("🧪 Held-out Rows"),
        Cell::new(outcome.test_rows),
    ]);
    table.add_row(vec![
        Cell::new("⚖️  Class Balance"),
        Cell::new(format!(
            "{} converted / {} not",
            outcome.positives, outcome.negatives
        )),
    ]);

    let auc_color = if outcome.auc >= 0.8 {
        Color::Green
    } else if outcome.auc >= 0.65 {
        Color::Yellow
    } else {
        Color::Red
    };
    table.add_row(vec![
        Cell::new("📈 ROC-AUC"),
        Cell::new(format!("{:.4}", outcome.auc))
            .fg(auc_color)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("🎯 Accuracy @0.5"),
        Cell::new(format!("{:.4}", outcome.confusion.accuracy())),
    ]);
    table.add_row(vec![
        Cell::new("🔍 Precision @0.5"),
        Cell::new(format!("{:.4}", outcome.confusion.precision())),
    ]);
    table.add_row(vec![
        Cell::new("📡 Recall @0.5"),
        Cell::new(format!("{:.4}", outcome.confusion.recall())),
    ]);
    table.add_row(vec![
        Cell::new("✅ Encoded Features"),
        Cell::new(outcome.artifact.preprocessor.output_width())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    // Indent the table
    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    display_top_coefficients(outcome);
}

/// Top fitted coefficients in each direction, by name.
fn display_top_coefficients(outcome: &TrainOutcome) {
    let names = outcome.artifact.preprocessor.output_names();
    let mut named: Vec<(&String, f64)> = names
        .iter()
        .zip(outcome.artifact.classifier.coefficients().iter().copied())
        .collect();
    named.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!();
    println!(
        "      {}:",
        style("Strongest positive coefficients").green()
    );
    for (name, coef) in named.iter().take(3).filter(|(_, c)| *c > 0.0) {
        println!("        {} {} ({:+.4})", style("•").dim(), name, coef);
    }
    println!(
        "      {}:",
        style("Strongest negative coefficients").yellow()
    );
    for (name, coef) in named.iter().rev().take(3).filter(|(_, c)| *c < 0.0) {
        println!("        {} {} ({:+.4})", style("•").dim(), name, coef);
    }
}

/// Print one scored lead with its driving factors.
pub fn display_score_record(record: &ScoreRecord) {
    let score_color = if record.score >= 70 {
        Color::Green
    } else if record.score >= 40 {
        Color::Yellow
    } else {
        Color::Red
    };

    println!();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("🔥 Intent Score"),
        Cell::new(record.score)
            .fg(score_color)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("📊 Probability"),
        Cell::new(format!("{:.4}", record.probability)),
    ]);

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    println!();
    if !record.explanation.top_positive_factors.is_empty() {
        println!(
            "      {}:",
            style("Pushing the score up").green()
        );
        for factor in &record.explanation.top_positive_factors {
            println!("        {} {}", style("•").dim(), factor);
        }
    }
    if !record.explanation.top_negative_factors.is_empty() {
        println!(
            "      {}:",
            style("Pulling the score down").yellow()
        );
        for factor in &record.explanation.top_negative_factors {
            println!("        {} {}", style("•").dim(), factor);
        }
    }
}
