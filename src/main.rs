//! # ULG Checks
//!
//! Validate a PX4 ULog flight log against flight-behaviour invariants.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Parse command line arguments
//!    - Set up logging with tracing subscriber
//!    - Load check configuration
//!
//! 2. **Session**
//!    - Validate the `.ulg` path once; abort the whole run if it is wrong
//!
//! 3. **Checks**
//!    - Each check loads its own topics and asserts its invariant
//!    - Checks whose topics the log cannot provide are skipped
//!
//! 4. **Report**
//!    - Log outcomes, optionally write a JSON Lines report
//!    - Exit 0 when nothing failed, 1 when a check failed, 2 when aborted
//!
//! # Examples
//!
//! ```bash
//! ulg-checks --filepath /logs/log_0_2019-3-21-11-34-20.ulg
//! ```
//!
//! Expected output:
//! ```text
//! INFO ulg_checks::harness: Session started for /logs/log_0_2019-3-21-11-34-20.ulg
//! INFO ulg_checks::checks: tilt_desired ... passed
//! WARN ulg_checks::checks: yaw_validity ... skipped: Could not create dataframe: Topic not found in log: position_setpoint_triplet
//! INFO ulg_checks::report: 1 passed, 0 failed, 1 skipped, 0 errored
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use ulg_checks::checks;
use ulg_checks::config::Config;
use ulg_checks::dataframe::UlogLoader;
use ulg_checks::harness::Session;
use ulg_checks::report;

/// Exit code when the run is aborted before or outside the checks
const EXIT_ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "ulg-checks", version, about = "Validate PX4 ULog flight logs")]
struct Args {
    /// Absolute path to the .ulg log file
    #[arg(long)]
    filepath: Option<PathBuf>,

    /// TOML file with check configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run only this check (repeatable)
    #[arg(long = "check", value_name = "NAME")]
    checks: Vec<String>,

    /// List available checks and exit
    #[arg(long)]
    list: bool,

    /// Write outcomes as JSON Lines to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match init_logging(args.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ulg-checks: {:#}", e);
            return ExitCode::from(EXIT_ABORTED);
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<WorkerGuard> {
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log file path {} has no file name", path.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .init();

    Ok(guard)
}

fn run(args: Args) -> Result<ExitCode> {
    info!("ULG Checks v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.list {
        for check in checks::registry() {
            println!("{:<16} {}", check.name, check.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::default(),
    };

    let selected = checks::select(&args.checks)?;
    let session = Session::start(args.filepath, config)?;

    let reports = checks::run_all(&selected, &UlogLoader, &session);
    let max_rows = session.config().report.max_violation_rows;
    let summary = report::log_reports(&reports, max_rows);

    if let Some(path) = &args.report {
        report::write_report_file(path, session.log_file(), &reports, max_rows)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    Ok(if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
