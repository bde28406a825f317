use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use crate::domain::chain::{ParsedTransaction, SignatureRecord};
use crate::shared::errors::AppError;

/// Remote request/response capabilities the watcher relies on.
/// Implementations are stateless and shared read-only across tasks.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Raw account data, `None` if the account does not exist
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, AppError>;

    /// Parsed transaction, `None` if the node does not know it
    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError>;

    /// Up to `limit` history entries strictly older than `before`, newest first
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<SignatureRecord>, AppError>;

    /// Current slot, used as a health check
    async fn get_slot(&self) -> Result<u64, AppError>;
}
