//! Trexolists summary check
//!
//! Builds observation summaries for the configured programs and, when a
//! reference CSV is configured, reconciles each summary against it. The
//! report is written to stdout as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trexolists-check -- path/to/trexolists.toml
//! ```
//!
//! # Environment Variables
//!
//! - `TREXOLISTS_CONFIG`: Config file path when no argument is given
//! - `TREXOLISTS_WORK_DIR`: Overrides `paths.work_dir`
//! - `TREXOLISTS_REFERENCE_CSV`: Overrides `paths.reference_csv`
//! - `RUST_LOG`: Log filter directives, e.g. `trexolists=debug` (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trexolists::io::{DirectorySource, ReferenceTable};
use trexolists::services::{process_programs, reconcile_outcomes, SummaryCheck};
use trexolists::{SummaryRecord, TrexolistsConfig};

#[derive(Debug, Serialize)]
struct ProgramReport {
    program_id: u32,
    summaries: Vec<SummaryRecord>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    programs: Vec<ProgramReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<Vec<SummaryCheck>>,
}

const DEFAULT_LOG_FILTER: &str = "info";

/// Filter from `RUST_LOG`-style directives; unset or invalid falls back to info.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn load_config() -> Result<TrexolistsConfig> {
    let explicit = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var_os("TREXOLISTS_CONFIG").map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => TrexolistsConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TrexolistsConfig::from_default_location()
            .context("Failed to load trexolists.toml")?,
    };
    config.apply_env_overrides();
    Ok(config)
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let filter = config.target_filter();
    let source = DirectorySource::new(&config.paths.work_dir);

    info!(
        "Processing {} programs from {}",
        config.selection.program_ids.len(),
        config.paths.work_dir.display()
    );

    let outcomes = process_programs(&source, &config.selection.program_ids, filter.as_ref());

    let checks = match &config.paths.reference_csv {
        Some(csv) => {
            let table = ReferenceTable::from_csv(csv)?.with_keys(config.reference_keys());
            info!("Loaded {} reference rows from {}", table.len(), csv.display());
            Some(reconcile_outcomes(
                &outcomes,
                &table,
                &config.compare_options(),
            ))
        }
        None => None,
    };

    let programs = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(summaries) => ProgramReport {
                program_id: outcome.program_id,
                summaries,
                error: None,
            },
            Err(err) => ProgramReport {
                program_id: outcome.program_id,
                summaries: Vec::new(),
                error: Some(err.to_string()),
            },
        })
        .collect();

    let report = Report { programs, checks };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
