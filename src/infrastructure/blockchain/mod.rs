//! Direct blockchain reading for the Raydium AMM program

pub mod historical_scanner;
pub mod liquidity_reader;
pub mod log_subscriber;
pub mod rpc_client;
pub mod traits;
pub mod transaction_resolver;

#[cfg(test)]
pub(crate) mod mock;

pub use historical_scanner::HistoricalScanner;
pub use liquidity_reader::LiquidityReader;
pub use log_subscriber::EventSubscriber;
pub use rpc_client::SolanaRpcClient;
pub use traits::ChainRpc;
pub use transaction_resolver::TransactionResolver;
