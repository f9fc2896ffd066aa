use ajera_core::{AjeraClient, AjeraConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

/// Log filter variable; logs go to stderr so stdout stays valid JSON.
const LOG_ENV: &str = "AJERA_LOG";

fn main() {
    let cli = args::Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: args::Cli) -> Result<()> {
    let config = AjeraConfig::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let mut client = AjeraClient::from_config(&config);
    let mut stdout = std::io::stdout().lock();
    commands::run(&mut client, cli.command, cli.pretty, &mut stdout)
}
