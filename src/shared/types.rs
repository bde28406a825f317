//! Common types used across the application

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::errors::ValidationError;

/// Raydium liquidity pool v4 program
pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

/// Log line emitted by the pool initialization instruction
pub const INITIALIZE2_MARKER: &str = "initialize2";

/// Inclusive window of block times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Check a unix block time against both bounds
    pub fn contains_block_time(&self, block_time: i64) -> bool {
        match DateTime::<Utc>::from_timestamp(block_time, 0) {
            Some(at) => at >= self.start && at <= self.end,
            None => false,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub timeout_ms: u64,
    /// Pause before re-subscribing after the log stream drops
    pub reconnect_delay_ms: u64,
}

impl NetworkConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            ws_url: "wss://api.mainnet-beta.solana.com".to_string(),
            timeout_ms: 30000,
            reconnect_delay_ms: 5000,
        }
    }
}

/// Watched program configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub program_id: String,
    pub creation_marker: String,
    pub account_layout: String,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: RAYDIUM_AMM_V4_PROGRAM_ID.to_string(),
            creation_marker: INITIALIZE2_MARKER.to_string(),
            account_layout: "amm-v4-initialize2".to_string(),
        }
    }
}

/// Historical scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub retry_base_delay_ms: u64,
    pub max_retries: u32,
    pub signature_delay_ms: u64,
}

impl ScanConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn signature_delay(&self) -> Duration {
        Duration::from_millis(self.signature_delay_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            page_delay_ms: 2000,
            retry_base_delay_ms: 2000,
            max_retries: 3,
            signature_delay_ms: 500,
        }
    }
}

/// Live tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub resample_interval_ms: u64,
    pub max_tracked_pools: usize,
    /// Consecutive empty-reserve samples before a pool is dropped; 0 disables
    pub drained_sample_limit: u32,
    pub channel_capacity: usize,
    pub max_in_flight: usize,
    pub heartbeat_interval_ms: u64,
}

impl TrackerConfig {
    pub fn resample_interval(&self) -> Duration {
        Duration::from_millis(self.resample_interval_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            resample_interval_ms: 300_000, // 5 minutes
            max_tracked_pools: 1000,
            drained_sample_limit: 3,
            channel_capacity: 256,
            max_in_flight: 8,
            heartbeat_interval_ms: 60_000,
        }
    }
}

/// Watcher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub network: NetworkConfig,
    pub program: ProgramConfig,
    pub scan: ScanConfig,
    pub tracker: TrackerConfig,
}
