// src/report.rs
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::observer::PoolObserver;
use crate::application::services::HistoricalSummary;
use crate::domain::chain::ProgramEvent;
use crate::domain::pool::{LiquiditySnapshot, PoolIdentity, PoolStatus};
use crate::shared::utils::explorer_url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub signature: String,
    pub explorer_url: String,
    pub token_a: String,
    pub token_b: String,
    pub pool_address: String,
    pub observed_at: DateTime<Utc>,
}

impl DiscoveryReport {
    pub fn new(event: &ProgramEvent, pool: &PoolIdentity) -> Self {
        Self {
            signature: event.signature.clone(),
            explorer_url: explorer_url(&event.signature),
            token_a: pool.token_a.to_string(),
            token_b: pool.token_b.to_string(),
            pool_address: pool.pool_address.to_string(),
            observed_at: event.observed_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "🏊 New Liquidity Pool Detected!");
        let _ = writeln!(out, "  Transaction: {}", self.explorer_url);
        let _ = writeln!(out, "  Token A:     {}", self.token_a);
        let _ = writeln!(out, "  Token B:     {}", self.token_b);
        let _ = write!(out, "  Pool:        {}", self.pool_address);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityReport {
    pub pool_address: String,
    pub token_a: String,
    pub token_b: String,
    /// Absent when the pool account could not be read
    pub liquidity: Option<LiquiditySnapshot>,
    pub status: Option<PoolStatus>,
    pub sampled_at: DateTime<Utc>,
}

impl LiquidityReport {
    pub fn new(pool: &PoolIdentity, snapshot: Option<&LiquiditySnapshot>) -> Self {
        Self {
            pool_address: pool.pool_address.to_string(),
            token_a: pool.token_a.to_string(),
            token_b: pool.token_b.to_string(),
            liquidity: snapshot.copied(),
            status: snapshot.map(LiquiditySnapshot::pool_status),
            sampled_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn render(&self) -> String {
        let Some(liquidity) = &self.liquidity else {
            return format!("⚠️  Liquidity unavailable for pool {}", self.pool_address);
        };

        let mut out = String::new();
        let _ = writeln!(out, "💧 Liquidity for pool {}", self.pool_address);
        let _ = writeln!(out, "  {:<14} {:>20}", "Base reserve", liquidity.base_reserve);
        let _ = writeln!(out, "  {:<14} {:>20}", "Quote reserve", liquidity.quote_reserve);
        let _ = writeln!(out, "  {:<14} {:>20}", "LP supply", liquidity.lp_supply);
        let _ = write!(out, "  {:<14} {:>20}", "Status", liquidity.pool_status().as_str());
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Prints every discovery and sample to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    format: OutputFormat,
}

impl ConsoleReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Final totals of a historical run
    pub fn report_summary(&self, summary: &HistoricalSummary) {
        if let Some(out) = self.summary_output(summary) {
            println!("{}", out);
        }
    }

    fn summary_output(&self, summary: &HistoricalSummary) -> Option<String> {
        self.format_with(
            || {
                let mut out = String::new();
                let _ = writeln!(out, "📊 Historical analysis summary");
                let _ = writeln!(out, "  Transactions in range: {}", summary.signatures_scanned);
                let _ = writeln!(out, "  Pool creations:        {}", summary.pools_found);
                let _ = writeln!(out, "  Distinct pools:        {}", summary.distinct_pools);
                let _ = writeln!(out, "  Samples with liquidity: {}", summary.samples_with_liquidity);
                out
            },
            || serde_json::to_string(summary),
        )
    }

    fn format_with(
        &self,
        text: impl FnOnce() -> String,
        json: impl FnOnce() -> Result<String, serde_json::Error>,
    ) -> Option<String> {
        match self.format {
            OutputFormat::Text => Some(text()),
            OutputFormat::Json => match json() {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::error!("Failed to serialize report: {}", e);
                    None
                }
            },
        }
    }

    fn emit(&self, text: impl FnOnce() -> String, json: impl FnOnce() -> Result<String, serde_json::Error>) {
        match (self.format, self.format_with(text, json)) {
            (OutputFormat::Text, Some(out)) => println!("{}\n", out),
            (OutputFormat::Json, Some(line)) => println!("{}", line),
            (_, None) => {}
        }
    }
}

impl PoolObserver for ConsoleReporter {
    fn on_pool_discovered(&self, event: &ProgramEvent, pool: &PoolIdentity) {
        let report = DiscoveryReport::new(event, pool);
        self.emit(|| report.render(), || report.to_json());
    }

    fn on_liquidity(&self, pool: &PoolIdentity, snapshot: Option<&LiquiditySnapshot>) {
        let report = LiquidityReport::new(pool, snapshot);
        self.emit(|| report.render(), || report.to_json());
    }
}
