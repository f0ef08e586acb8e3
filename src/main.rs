//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `poi_guide` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use poi_guide::initialization::init_logger_with;
use poi_guide::{run_session, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    let log_level = opt.config.log_level.clone();
    let log_format = opt.config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_session(opt).await {
        Ok(report) => {
            println!(
                "Placed {} POI{} and {} guide{} in {:.1}s ({} update{} dropped, {} failure{})",
                report.pois_placed,
                plural(report.pois_placed),
                report.guides_placed,
                plural(report.guides_placed),
                report.elapsed_seconds,
                report.updates_dropped,
                plural(report.updates_dropped),
                report.errors,
                plural(report.errors),
            );
            if report.feed_failed {
                println!("Map data could not be fetched; see the log for details");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("poi_guide error: {:#}", e);
            process::exit(1);
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
