mod config;
mod decoder;
mod encoder;
mod error;
mod filename;
mod processor;
mod splitter;
mod types;

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = config::Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level).env().init() {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Processing failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &config::Cli) -> Result<()> {
    let config = config::load_config(cli)?;
    info!(
        "Processing {:?} (max {} entries per file{})",
        cli.dir,
        config.max_entries,
        if cli.dry_run { ", dry run" } else { "" }
    );

    let reports = processor::process_dir(&cli.dir, &config, cli.dry_run)?;

    let split = reports
        .iter()
        .filter(|report| report.status != processor::FileStatus::Unchanged)
        .count();
    info!("Processed {} log files, {} split", reports.len(), split);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
