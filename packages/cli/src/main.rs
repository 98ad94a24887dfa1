#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the NYC shooting incident analysis.
//!
//! ```text
//! nyc_shootings summarize --input NYPD_Shooting_Incident_Data__Historic_.csv [--output-dir out] [--format csv|json]
//! nyc_shootings validate --input shootings.json [--dataset nypd_shooting_historic_api]
//! nyc_shootings datasets
//! ```
//!
//! Uses `indicatif-log-bridge` (via [`nyc_shootings_cli_utils::init_logger`])
//! so log lines and the loading spinner never fight for the terminal.

mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nyc_shootings_analytics::export::ExportFormat;
use nyc_shootings_cli_utils::IndicatifProgress;
use nyc_shootings_source::dataset::DatasetDefinition;
use nyc_shootings_source::registry;

#[derive(Parser)]
#[command(
    name = "nyc_shootings",
    about = "Normalize and summarize NYPD shooting incident exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an export and write every aggregate table
    Summarize {
        /// Path to the CSV or Socrata JSON export
        #[arg(long)]
        input: PathBuf,
        /// Directory the tables are written to
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Table file format (`csv` or `json`)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Dataset id (see `datasets`); inferred from the file extension if omitted
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Check that an export loads and normalizes without writing anything
    Validate {
        /// Path to the CSV or Socrata JSON export
        #[arg(long)]
        input: PathBuf,
        /// Dataset id (see `datasets`); inferred from the file extension if omitted
        #[arg(long)]
        dataset: Option<String>,
    },
    /// List the embedded dataset definitions
    Datasets,
}

/// Listing lines for one dataset: the table row, then its license and
/// source links indented below it.
fn dataset_lines(dataset: &DatasetDefinition) -> Vec<String> {
    let license = &dataset.license;
    let attribution = if license.attribution_required {
        license.attribution_text.as_deref().unwrap_or("required")
    } else {
        "not required"
    };

    let mut lines = vec![
        format!("{:<30} {:<10} {}", dataset.id, dataset.city, dataset.name),
        format!("  license:     {}", license.license_type),
        format!("  attribution: {attribution}"),
    ];
    if let Some(url) = &license.tos_url {
        lines.push(format!("  terms:       {url}"));
    }
    if let Some(url) = &dataset.portal_url {
        lines.push(format!("  portal:      {url}"));
    }
    if let Some(url) = &dataset.download_url {
        lines.push(format!("  download:    {url}"));
    }
    lines
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = nyc_shootings_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            input,
            output_dir,
            format,
            dataset,
        } => {
            let progress = IndicatifProgress::records_bar(&multi, "Loading");
            let config = pipeline::SummarizeConfig {
                input,
                output_dir,
                format,
                dataset,
            };
            let outcome = pipeline::summarize(&config, &progress)?;

            for path in &outcome.written {
                println!("{}", path.display());
            }
        }
        Commands::Validate { input, dataset } => {
            let progress = IndicatifProgress::records_bar(&multi, "Validating");
            let summary = pipeline::validate(&input, dataset.as_deref(), &progress)?;

            println!(
                "OK: {} rows, {} incidents, {} murders, {} with unknown borough",
                summary.rows, summary.incidents, summary.murders, summary.unknown_borough
            );
            if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
                println!("Dates: {first} to {last}");
            }
        }
        Commands::Datasets => {
            let datasets = registry::all_datasets();
            println!("{:<30} {:<10} NAME", "ID", "CITY");
            println!("{}", "-".repeat(80));
            for dataset in &datasets {
                for line in dataset_lines(dataset) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
