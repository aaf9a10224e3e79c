//! Bucketview CLI Binary
//!
//! Command-line interface for browsing S3-compatible object stores.

use anyhow::Context;
use bucketview::logging::{init_logging, LoggingConfig};
use bucketview::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// `Ok(false)` when a batch finished with failed items.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CliContext::load_config(&cli.workspace, cli.config.as_deref())
        .context("loading configuration")?;

    let logging = apply_log_overrides(config.logging.clone(), &cli);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let context = CliContext::from_config(config)
        .context("connecting to object store")?
        .with_format(cli.format);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let output = runtime.block_on(context.execute(&cli.command))?;

    println!("{}", output.rendered);
    Ok(!output.partial_failure)
}

fn apply_log_overrides(mut logging: LoggingConfig, cli: &Cli) -> LoggingConfig {
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        logging.file = Some(file.clone());
    }
    logging
}
