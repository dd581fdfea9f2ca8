//! Stylift - move inline `<style>` blocks out of HTML into linked stylesheets.

mod cli;
mod config;
mod dom;
mod extract;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::StyliftConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = StyliftConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    let report = cli::extract::run(&config, &cli.files, false)?;
    report.print();

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
