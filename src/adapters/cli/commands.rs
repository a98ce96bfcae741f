//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the crypto heatmap fetcher.

use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::adapters::coingecko::CoinGeckoClient;
use crate::adapters::persistence::load_meta;
use crate::application::{HeatmapPipeline, PipelineConfig};
use crate::config::{
    expand_dir, load_config, load_config_or_default, Config, DEFAULT_CONFIG_PATH,
};
use crate::domain::{format_timestamp, HeatmapMeta};

/// Crypto Heatmap - top-100 market snapshot without stablecoins
#[derive(Parser, Debug)]
#[command(
    name = "crypto-heatmap",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Top-100 crypto market snapshot for heatmap pages",
    long_about = "Fetches the top coins by market cap from CoinGecko, drops stablecoins, \
                  and writes a compact JSON array plus a metadata document. \
                  Meant to be run hourly by an external scheduler."
)]
pub struct CliApp {
    /// The command to execute (defaults to `fetch`)
    #[command(subcommand)]
    pub command: Option<Command>,

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
    /// Fetch market data and rewrite the heatmap artifacts
    Fetch(FetchCmd),

    /// Print a summary of the last written snapshot
    Summary(SummaryCmd),
}

/// Run the pipeline once
#[derive(Parser, Debug, Default)]
pub struct FetchCmd {
    /// Path to configuration file [default: config/heatmap.toml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override output directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Summarize the persisted snapshot
#[derive(Parser, Debug)]
pub struct SummaryCmd {
    /// Path to configuration file [default: config/heatmap.toml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of coins to list
    #[arg(short, long, value_name = "N", default_value = "5")]
    pub top: usize,
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Fetch(cmd) => cmd.config.as_deref(),
            Command::Summary(cmd) => cmd.config.as_deref(),
        }
    }
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let command = app.command.unwrap_or_else(|| Command::Fetch(FetchCmd::default()));

    let config = resolve_config(command.config_path())?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match command {
        Command::Fetch(cmd) => fetch_command(cmd, &config).await,
        Command::Summary(cmd) => summary_command(cmd, &config),
    }
}

/// Explicit paths must exist; the default path may be absent
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => load_config_or_default(DEFAULT_CONFIG_PATH)
            .context("Failed to load configuration"),
    }
}

/// Initialize logging system
///
/// `--debug` and `--verbose` win over `RUST_LOG`, which wins over the
/// configured level.
fn init_logging(verbose: bool, debug: bool, configured_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Handle fetch command
async fn fetch_command(cmd: FetchCmd, config: &Config) -> Result<()> {
    tracing::info!("Fetching crypto data at {}", format_timestamp(&chrono::Utc::now()));

    let pipeline_config = pipeline_config_for(&cmd, config);

    let client = CoinGeckoClient::with_config(config.coingecko_config())
        .context("Failed to create CoinGecko client")?;

    let report = HeatmapPipeline::new(client, pipeline_config)
        .run()
        .await
        .context("Heatmap run failed")?;

    println!("Saved to {}", report.heatmap_path.display());
    println!("Top 5: {}", report.top_symbols(5).join(", "));

    Ok(())
}

/// `--output-dir` wins over the configured directory and gets the same `~` expansion
fn pipeline_config_for(cmd: &FetchCmd, config: &Config) -> PipelineConfig {
    let mut pipeline_config = PipelineConfig::from(config);
    if let Some(dir) = &cmd.output_dir {
        pipeline_config.output.dir = expand_dir(&dir.to_string_lossy());
    }
    pipeline_config
}

/// Handle summary command
fn summary_command(cmd: SummaryCmd, config: &Config) -> Result<()> {
    let path = config.output_paths().meta_path();
    let meta = load_meta(&path)
        .with_context(|| format!("No readable snapshot at {}", path.display()))?;

    for line in summary_lines(&meta, cmd.top) {
        println!("{}", line);
    }

    Ok(())
}

/// Human-readable snapshot summary
pub fn summary_lines(meta: &HeatmapMeta, top: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Updated:     {}", meta.updated_at),
        format!("Total coins: {}", meta.total_coins),
    ];

    if !meta.is_consistent() {
        lines.push(format!(
            "Warning:     total_coins says {} but {} coins are listed",
            meta.total_coins,
            meta.coins.len()
        ));
    }

    for (i, coin) in meta.coins.iter().take(top).enumerate() {
        lines.push(format!(
            "{:>3}. {:<8} ${:<14.4} {:>+7.2}% (24h)",
            i + 1,
            coin.symbol.to_uppercase(),
            coin.current_price,
            coin.price_change_percentage_24h
        ));
    }

    lines
}
