//! Pool creation transaction resolver

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use crate::domain::pool::{parse_identity, AccountLayout, AccountRole, TokenPair};
use super::traits::ChainRpc;

/// Extracts the two token mints of a pool creation transaction
#[derive(Clone)]
pub struct TransactionResolver {
    rpc: Arc<dyn ChainRpc>,
    program_id: String,
    layout: AccountLayout,
}

impl TransactionResolver {
    pub fn new(rpc: Arc<dyn ChainRpc>, program_id: &Pubkey, layout: AccountLayout) -> Self {
        Self {
            rpc,
            program_id: program_id.to_string(),
            layout,
        }
    }

    /// Token pair of the first watched-program instruction, in account order.
    /// Irrelevant or malformed transactions resolve to `None`.
    pub async fn resolve(&self, signature: &str) -> Option<TokenPair> {
        let transaction = match self.rpc.get_parsed_transaction(signature).await {
            Ok(Some(transaction)) => transaction,
            Ok(None) => {
                warn!("⚠️ Transaction not found: {}", signature);
                return None;
            }
            Err(e) => {
                warn!("Error fetching transaction {}: {}", signature, e);
                return None;
            }
        };

        let accounts = match transaction.find_program_instruction(&self.program_id) {
            Some(accounts) => accounts,
            None => {
                warn!("⚠️ No {} instruction found in: {}", self.layout.name, signature);
                return None;
            }
        };

        if accounts.len() < self.layout.min_accounts {
            warn!(
                "⚠️ Invalid accounts array length in: {} ({} < {})",
                signature,
                accounts.len(),
                self.layout.min_accounts
            );
            return None;
        }

        let token_a = self.account(accounts, AccountRole::TokenA, signature)?;
        let token_b = self.account(accounts, AccountRole::TokenB, signature)?;

        info!(
            "🏊 New Liquidity Pool Detected in {} (slot {}, {} v{})",
            signature, transaction.slot, self.layout.name, self.layout.version
        );
        Some(TokenPair::new(token_a, token_b))
    }

    fn account(&self, accounts: &[String], role: AccountRole, signature: &str) -> Option<Pubkey> {
        let value = self.layout.account(accounts, role)?;
        match parse_identity(value) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("⚠️ {:?} account in {} is malformed: {}", role, signature, e);
                None
            }
        }
    }
}
