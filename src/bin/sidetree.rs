//! Sidetree CLI Binary

use clap::Parser;
use sidetree::config::ConfigLoader;
use sidetree::logging::init_logging;
use sidetree::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let mut logging = config.logging.clone();
    cli.apply_log_overrides(&mut logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = match CliContext::new(config, cli.store.clone(), cli.ephemeral) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            process::exit(1);
        }
    };

    let result = context.execute(&cli.command);
    if let Err(e) = context.shutdown() {
        tracing::warn!(error = %e, "Failed to flush store on exit");
    }
    match result {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
