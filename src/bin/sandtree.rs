//! Sandtree CLI Binary
//!
//! Command-line interface for editing versioned virtual file trees.

use anyhow::Context;
use clap::Parser;
use sandtree::config::ConfigLoader;
use sandtree::logging::init_logging;
use sandtree::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = ConfigLoader::load_with(cli.config.as_deref()).context("loading configuration")?;
    init_logging(Some(&config.logging), &cli.log_overrides())
        .context("initializing logging")?;

    let context = CliContext::new(config, cli.store.clone())
        .and_then(|ctx| ctx.select(cli))
        .context("opening workspace store")?;
    Ok(context.execute(&cli.command)?)
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
