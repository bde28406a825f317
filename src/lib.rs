//! Poolwatch - Raydium AMM pool creation watcher
//! Built with Domain-Driven Design principles

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;
pub mod report;

// Re-export main types for convenience
pub use application::{PoolTracker, PoolWatcher};
pub use domain::pool::{LiquiditySnapshot, PoolIdentity, PoolKeyDeriver};
pub use infrastructure::blockchain::{LiquidityReader, SolanaRpcClient, TransactionResolver};
