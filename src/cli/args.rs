//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Move inline <style> blocks out of HTML documents into linked stylesheets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// HTML documents to process (each one is handled independently)
    #[arg(required = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Directory extracted stylesheets are written to (default: css)
    #[arg(short = 'd', long, value_hint = clap::ValueHint::DirPath)]
    pub css_dir: Option<PathBuf>,

    /// Directory part of the inserted link href (default: css)
    #[arg(long, value_name = "PREFIX")]
    pub href_prefix: Option<String>,

    /// Cache-busting version appended as `?v=` (default: 1.0.0)
    #[arg(long, value_name = "VERSION")]
    pub asset_version: Option<String>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Config file path (default: stylift.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_files_and_flags() {
        let cli = Cli::try_parse_from([
            "stylift",
            "-n",
            "-d",
            "public/css",
            "--href-prefix",
            "assets/css",
            "index.html",
            "about.html",
        ])
        .unwrap();
        assert_eq!(
            cli.files,
            vec![PathBuf::from("index.html"), PathBuf::from("about.html")]
        );
        assert!(cli.dry_run);
        assert_eq!(cli.css_dir, Some(PathBuf::from("public/css")));
        assert_eq!(cli.href_prefix.as_deref(), Some("assets/css"));
        assert!(cli.asset_version.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["stylift", "--dry-run"]).is_err());
    }
}
