//! wt5 CLI Binary
//!
//! Command-line interface for printing wt5 file trees and converting units.

use anyhow::Context;
use clap::Parser;
use std::process;
use wt5::logging::init_logging;
use wt5::tooling::cli::{Cli, CliContext};

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.config.clone()).context("Error loading configuration")?;
    init_logging(Some(&context.logging_config(cli))).context("Error initializing logging")?;
    let output = context.execute(&cli.command)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
