//! Application layer - use cases and services

pub mod commands;
pub mod observer;
pub mod pool_tracker;
pub mod services;

pub use commands::{Cli, CommandExecutor};
pub use observer::PoolObserver;
pub use pool_tracker::{PoolTracker, TrackOutcome};
pub use services::{HistoricalSummary, PoolWatcher};
