//! Fontmirror command-line entry point.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use fontmirror::cli::{Cli, Commands, commands};
use fontmirror::config::Config;
use fontmirror::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Mirror { .. } => commands::mirror(&config),
        Commands::Css { family } => commands::css(&config, family),
        Commands::Status => commands::status(&config),
    }
}
