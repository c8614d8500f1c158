//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `tlsa_survey` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::convert::TryFrom;
use std::process;

use anyhow::{Context, Result};
use structopt::StructOpt;

use tlsa_survey::initialization::init_logger_with;
use tlsa_survey::{run_survey, run_validation, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::try_from(Opt::from_args()).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tlsa_survey error: {e}");
            process::exit(1);
        }
    };

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let result = if config.validate_only {
        run_validation(config).await
    } else {
        run_survey(config).await
    };

    match result {
        Ok(report) => {
            println!(
                "Probed {} endpoint{} ({} with TLSA, {} rows stored, {} duplicates) in {:.1}s",
                report.endpoints_probed,
                if report.endpoints_probed == 1 { "" } else { "s" },
                report.endpoints_with_tlsa,
                report.rows_inserted,
                report.duplicates,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("tlsa_survey error: {:#}", e);
            process::exit(1);
        }
    }
}
