//! CLI definition and dispatch.

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_report_adapter::FileReportAdapter;
use crate::adapters::file_state_adapter::FileStateAdapter;
use crate::adapters::nse_adapter::NseAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::diff;
use crate::domain::error::SmartMoneyError;
use crate::domain::qualification::run_qualification;
use crate::domain::report::{build_table, format_summary, SummaryContext};
use crate::domain::settings::{PriceProvider, Settings};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{MarketDataPort, PricePort};
use crate::ports::report_port::ReportPort;
use crate::ports::state_port::RunStatePort;

#[derive(Parser, Debug)]
#[command(
    name = "smartmoney",
    about = "Screen an index for rising institutional ownership"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the screen and write the report artifacts
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the symbols of the configured index
    Universe {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compare a symbol list with the last run without updating it
    Diff {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Newline-separated symbol file
        #[arg(long)]
        current: PathBuf,
    },
}

/// Paths of the two artifacts a run produces, plus the summary text.
#[derive(Debug, Clone, PartialEq)]
pub struct RunArtifacts {
    pub table_path: String,
    pub summary_path: String,
    pub summary: String,
}

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging();
    let result = match cli.command {
        Command::Run { config } => run_screen(config.as_ref()),
        Command::Universe { config } => run_universe(config.as_ref()),
        Command::Diff { config, current } => run_diff(config.as_ref(), &current),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load, validate and convert configuration; no path means built-in defaults.
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings, SmartMoneyError> {
    let adapter = match path {
        Some(p) => {
            info!("loading config from {}", p.display());
            FileConfigAdapter::from_file(p).map_err(|e| SmartMoneyError::ConfigParse {
                file: p.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::empty(),
    };
    settings_from(&adapter)
}

pub fn settings_from(config: &dyn ConfigPort) -> Result<Settings, SmartMoneyError> {
    validate_config(config)?;
    Settings::from_config(config)
}

fn build_price_port(settings: &Settings) -> Result<Box<dyn PricePort>, SmartMoneyError> {
    let port: Box<dyn PricePort> = match settings.price.provider {
        PriceProvider::Yahoo => Box::new(YahooAdapter::new(&settings.source, &settings.price)?),
        PriceProvider::Csv => Box::new(CsvAdapter::new(settings.price.csv_dir.clone())),
    };
    Ok(port)
}

fn build_report_port(settings: &Settings) -> FileReportAdapter {
    FileReportAdapter::new(
        settings.report.output_dir.clone(),
        settings.report.file_prefix.clone(),
        settings.report.summary_file.clone(),
    )
}

/// The whole run: qualify, diff against the last run, write the artifacts,
/// then replace the stored snapshot.
///
/// A universe fetch failure aborts before anything is written. A report
/// write failure aborts with the old snapshot left in place, so the next run
/// still diffs against it. Run-state problems only degrade the diff.
pub fn run_pipeline(
    data: &dyn MarketDataPort,
    prices: &dyn PricePort,
    state: &dyn RunStatePort,
    report: &dyn ReportPort,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<RunArtifacts, SmartMoneyError> {
    let as_of = now.date();

    // Stage 1: per-symbol qualification + market flow
    let outcome = run_qualification(
        data,
        prices,
        &settings.source.index,
        &settings.pipeline,
        as_of,
    )?;

    // Stage 2: run-over-run diff
    let current = outcome.symbols();
    let diff = diff::compute_diff(&diff::load_previous(state), &current);
    info!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        "diffed against previous run"
    );

    // Stage 3: artifacts
    let policy = settings.report.policy;
    let table = build_table(&outcome.records, &policy);
    let skip_stats = outcome.skip_stats();
    let summary = format_summary(&SummaryContext {
        as_of,
        qualified: outcome.records.len(),
        diff: &diff,
        flow: outcome.flow,
        flow_window: settings.pipeline.flow_window,
        skip_stats: &skip_stats,
        policy,
    });

    let table_path = report.write_table(&table, now)?;
    let summary_path = report.write_summary(&summary)?;
    info!(table = %table_path, summary = %summary_path, "report written");

    // Stage 4: snapshot for the next run
    if let Err(e) = state.write_snapshot(&current) {
        warn!(error = %e, "failed to save run state");
    }

    Ok(RunArtifacts {
        table_path,
        summary_path,
        summary,
    })
}

fn run_screen(config: Option<&PathBuf>) -> Result<(), SmartMoneyError> {
    let settings = load_settings(config)?;
    let data = NseAdapter::new(&settings.source)?;
    let prices = build_price_port(&settings)?;
    let state = FileStateAdapter::new(settings.state.path.clone());
    let report = build_report_port(&settings);

    let artifacts = run_pipeline(
        &data,
        prices.as_ref(),
        &state,
        &report,
        &settings,
        Local::now().naive_local(),
    )?;

    print!("{}", artifacts.summary);
    println!("{}", artifacts.table_path);
    println!("{}", artifacts.summary_path);
    Ok(())
}

fn run_universe(config: Option<&PathBuf>) -> Result<(), SmartMoneyError> {
    let settings = load_settings(config)?;
    let data = NseAdapter::new(&settings.source)?;
    let symbols = data.fetch_universe(&settings.source.index)?;
    for symbol in &symbols {
        println!("{}", symbol);
    }
    info!("{} symbols in {}", symbols.len(), settings.source.index);
    Ok(())
}

fn run_diff(config: Option<&PathBuf>, current_path: &PathBuf) -> Result<(), SmartMoneyError> {
    let settings = load_settings(config)?;
    let content = fs::read_to_string(current_path)?;
    let current: BTreeSet<String> = FileStateAdapter::parse_symbols(&content);
    let state = FileStateAdapter::new(settings.state.path.clone());
    let result = diff::preview(&state, &current)?;

    for symbol in &result.added {
        println!("+ {}", symbol);
    }
    for symbol in &result.removed {
        println!("- {}", symbol);
    }
    if result.is_unchanged() {
        info!("no change since last run");
    }
    Ok(())
}
