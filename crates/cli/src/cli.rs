//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Compare investor portfolios against market benchmarks and model funds
#[derive(Parser, Debug)]
#[command(
    name = "portfolio-benchmark",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compare investor portfolios against market benchmarks and model funds",
    long_about = "Resolves security names from a holdings export to exchange tickers, \
                  downloads monthly closes and compares each investor's portfolio with \
                  benchmark indices and model funds."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Map security names to tickers and write the success/failure lists
    Resolve(ResolveCmd),

    /// Run the full comparison and write reports plus the chart page
    Analyze(AnalyzeCmd),
}

/// Resolve tickers only
#[derive(Parser, Debug)]
pub struct ResolveCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/portfolio.toml")]
    pub config: PathBuf,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also probe heuristic symbol guesses against live prices
    #[arg(long)]
    pub probe: bool,
}

/// Full analysis
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/portfolio.toml")]
    pub config: PathBuf,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_global_flags() {
        let app = CliApp::parse_from([
            "portfolio-benchmark",
            "analyze",
            "--config",
            "my.toml",
            "-v",
        ]);
        assert!(app.verbose);
        match app.command {
            Command::Analyze(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("my.toml"));
                assert!(cmd.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn resolve_defaults() {
        let app = CliApp::parse_from(["portfolio-benchmark", "resolve"]);
        match app.command {
            Command::Resolve(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("config/portfolio.toml"));
                assert!(!cmd.probe);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
