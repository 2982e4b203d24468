//! Portfolio Benchmark - investor portfolios against indices and model funds.

mod cli;
mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use portfolio_benchmark_core::loaders::{
    fund_weights::load_fund_weights, holdings::load_holdings, listing::load_listing,
    overrides::load_overrides,
};
use portfolio_benchmark_core::models::analytics::AnalysisInputs;
use portfolio_benchmark_core::models::holding::unique_security_names;
use portfolio_benchmark_core::providers::registry::PriceProviderRegistry;
use portfolio_benchmark_core::resolver::overrides::OverrideTable;
use portfolio_benchmark_core::BenchmarkAnalysis;

use crate::cli::{AnalyzeCmd, CliApp, Command, ResolveCmd};
use crate::config::{load_config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (API keys go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Resolve(cmd) => resolve_command(cmd).await,
        Command::Analyze(cmd) => analyze_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}

async fn resolve_command(cmd: ResolveCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let output = cmd.output.unwrap_or_else(|| config.output.dir.clone());

    let holdings = load_holdings(&config.inputs.holdings, &config.analysis.holdings)
        .context("Failed to load holdings")?;
    let analysis = build_analysis(&config)?;

    let names = unique_security_names(&holdings);
    let report = analysis.resolve(&names, cmd.probe).await;
    let written = analysis
        .write_resolution(&report, &output)
        .context("Failed to write resolution reports")?;

    println!(
        "Resolved {}/{} securities ({:.1}%)",
        report.resolved.len(),
        report.total(),
        report.success_ratio() * 100.0
    );
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

async fn analyze_command(cmd: AnalyzeCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let output = cmd.output.unwrap_or_else(|| config.output.dir.clone());

    let holdings = load_holdings(&config.inputs.holdings, &config.analysis.holdings)
        .context("Failed to load holdings")?;
    if holdings.is_empty() {
        bail!(
            "No holdings found in {}",
            config.inputs.holdings.display()
        );
    }

    let funds = match &config.inputs.fund_weights {
        Some(path) => load_fund_weights(
            path,
            config.inputs.fund_weights_sheet.as_deref(),
            &config.analysis.fund_titles,
        )
        .context("Failed to load fund weights")?,
        None => Vec::new(),
    };

    let analysis = build_analysis(&config)?;
    let outcome = analysis
        .run(&AnalysisInputs { holdings, funds })
        .await
        .context("Analysis failed")?;

    let written = analysis
        .write_reports(&outcome, &output)
        .context("Failed to write reports")?;

    println!("Final returns:");
    for line in &outcome.final_returns {
        println!("  {:30} {:>8.2}%", line.name, line.return_pct);
    }
    if let Some(best) = &outcome.best_performer {
        println!("Best performer: {} ({:.2}%)", best.name, best.return_pct);
    }

    let summary = outcome.summary();
    if !summary.top_performers.is_empty() {
        println!("Top investors:");
        for (rank, investor) in summary.top_performers.iter().enumerate() {
            println!("  {}. {:30} {:>8.2}%", rank + 1, investor.investor, investor.return_pct);
        }
    }
    if !summary.bottom_performers.is_empty() {
        println!("Bottom investors:");
        for investor in &summary.bottom_performers {
            println!("     {:30} {:>8.2}%", investor.investor, investor.return_pct);
        }
    }
    if let Some(avg) = summary.average_investor_return_pct {
        println!("Average investor return: {avg:.2}%");
    }
    for beat in &summary.benchmark_beats {
        println!(
            "{}/{} investors beat {} ({:.2}%)",
            beat.investors_ahead, beat.investors, beat.benchmark, beat.benchmark_return_pct
        );
    }
    for sim in &summary.fund_simulations {
        println!(
            "{} with {:.0} invested: {:.0} ({:+.2}%)",
            sim.name, sim.initial_investment, sim.final_value, sim.return_pct
        );
    }
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn build_analysis(config: &Config) -> Result<BenchmarkAnalysis> {
    let listing = match &config.inputs.listing {
        Some(path) => load_listing(path, &config.analysis.listing)
            .with_context(|| format!("Failed to load listing {}", path.display()))?,
        None => {
            tracing::warn!("No exchange listing configured; only overrides and probes can resolve names");
            Vec::new()
        }
    };

    let mut overrides = OverrideTable::with_defaults();
    if let Some(path) = &config.inputs.overrides {
        let extra = load_overrides(path)
            .with_context(|| format!("Failed to load overrides {}", path.display()))?;
        overrides.extend(extra);
    }

    let registry = PriceProviderRegistry::new_with_defaults(
        config.inputs.price_dir.clone(),
        config.providers.get_alphavantage_key(),
    );

    BenchmarkAnalysis::new(config.analysis.clone(), registry, overrides, listing)
        .context("Invalid analysis settings")
}
