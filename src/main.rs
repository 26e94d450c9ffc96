use anyhow::Context;
use clap::Parser;
use console::{style, Term};
use dirsync::config::Cli;
use dirsync::Config;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let show_progress = !cli.no_progress && Term::stderr().is_term();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("Error reading config")?;

    if let Err(e) = dirsync::commands::sync::run(&config, show_progress) {
        eprintln!("{} {}", style("Error syncing directories:").red().bold(), e);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
