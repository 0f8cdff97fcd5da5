//! Estimator CLI - Extract validated project fields from source documents.

use clap::Parser;
use estimator_cli::commands;
use estimator_cli::{config, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> estimator_cli::Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref(), &cli.overrides)?;
    let formatter = Formatter::new(cli.format, cli.pretty, !cli.no_color);

    match cli.command {
        Command::Process(args) => commands::execute_process(args, config, &formatter).await?,
        Command::Chunks(args) => commands::execute_chunks(args, &config, &formatter)?,
        Command::Config => commands::execute_config(&config)?,
    }

    Ok(())
}
