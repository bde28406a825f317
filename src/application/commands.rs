//! CLI commands and handlers
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::application::services::PoolWatcher;
use crate::infrastructure::blockchain::SolanaRpcClient;
use crate::report::{ConsoleReporter, OutputFormat};
use crate::shared::config::ConfigLoader;
use crate::shared::errors::ValidationError;
use crate::shared::types::DateRange;
use crate::shared::utils::parse_date_range;

#[derive(Parser, Debug)]
#[command(name = "poolwatch")]
#[command(version, about = "Raydium AMM pool creation watcher")]
pub struct Cli {
    /// Monitor new pools in real time
    #[arg(long)]
    pub live: bool,

    /// Analyze pools created within a date range
    #[arg(long)]
    pub history: bool,

    /// Start date for historical analysis (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date for historical analysis (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RPC endpoint URL (overrides config and SOLANA_HTTP_ENDPOINT)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// WebSocket endpoint URL (overrides config and SOLANA_WSS_ENDPOINT)
    #[arg(long)]
    pub ws_url: Option<String>,

    /// Print reports as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Modes selected on the command line, in run order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub historical: Option<DateRange>,
    pub live: bool,
}

impl Cli {
    /// Validate flag combinations before touching the network
    pub fn plan(&self) -> Result<RunPlan, ValidationError> {
        if !self.live && !self.history {
            return Err(ValidationError::NoModeSelected);
        }
        let historical = if self.history {
            Some(parse_date_range(self.start.as_deref(), self.end.as_deref())?)
        } else {
            None
        };
        Ok(RunPlan {
            historical,
            live: self.live,
        })
    }

    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Run historical analysis first, then live monitoring, as requested
    pub async fn execute(cli: Cli) -> anyhow::Result<()> {
        let plan = cli.plan()?;

        let config = ConfigLoader::load_config(cli.config.as_deref())?;
        let config = ConfigLoader::with_endpoints(config, cli.rpc_url.clone(), cli.ws_url.clone());
        let rpc = Arc::new(SolanaRpcClient::from_config(&config.network));
        info!("Using RPC endpoint {}", rpc.url());
        let watcher = PoolWatcher::new(config, rpc)?;
        watcher
            .health_check()
            .await
            .context("Solana node health check failed")?;

        let reporter = Arc::new(ConsoleReporter::new(cli.output_format()));

        if let Some(range) = plan.historical {
            match watcher.run_historical(&range, reporter.as_ref()).await {
                Ok(summary) => reporter.report_summary(&summary),
                // live mode still runs after a failed scan
                Err(e) if plan.live => error!("❌ Historical analysis failed: {}", e),
                Err(e) => return Err(e).context("Historical analysis failed"),
            }
        }

        if plan.live {
            tokio::select! {
                result = watcher.run_live(reporter) => result?,
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
            }
        }

        Ok(())
    }
}
