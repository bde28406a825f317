//! Solana RPC client for direct blockchain reading

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiInstruction, UiMessage,
    UiParsedInstruction, UiTransactionEncoding,
};

use crate::domain::chain::{ParsedInstruction, ParsedTransaction, SignatureRecord};
use crate::shared::errors::AppError;
use crate::shared::types::NetworkConfig;
use super::traits::ChainRpc;

/// Solana RPC client wrapper
pub struct SolanaRpcClient {
    client: RpcClient,
}

impl SolanaRpcClient {
    pub fn from_config(network: &NetworkConfig) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(
                network.rpc_url.clone(),
                Duration::from_millis(network.timeout_ms),
                CommitmentConfig::confirmed(),
            ),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcClient {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, AppError> {
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to get account: {}", e)))?;

        Ok(response.value.map(|account| account.data))
    }

    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError> {
        let sig = Signature::from_str(signature)
            .map_err(|e| AppError::BlockchainError(format!("Invalid signature: {}", e)))?;

        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };

        let transaction = self
            .client
            .get_transaction_with_config(&sig, config)
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to get transaction: {}", e)))?;

        Ok(to_parsed_transaction(signature, transaction))
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<SignatureRecord>, AppError> {
        let before = before
            .map(Signature::from_str)
            .transpose()
            .map_err(|e| AppError::BlockchainError(format!("Invalid cursor signature: {}", e)))?;

        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::finalized()),
        };

        let statuses = self
            .client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to get signatures: {}", e)))?;

        Ok(statuses
            .into_iter()
            .map(|status| SignatureRecord {
                signature: status.signature,
                block_time: status.block_time,
            })
            .collect())
    }

    async fn get_slot(&self) -> Result<u64, AppError> {
        self.client
            .get_slot()
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to get slot: {}", e)))
    }
}

/// Flatten a JSON-parsed transaction into top-level instructions
fn to_parsed_transaction(
    signature: &str,
    transaction: EncodedConfirmedTransactionWithStatusMeta,
) -> Option<ParsedTransaction> {
    let ui_transaction = match transaction.transaction.transaction {
        EncodedTransaction::Json(ui_transaction) => ui_transaction,
        _ => return None,
    };

    let instructions = match ui_transaction.message {
        UiMessage::Parsed(message) => {
            let account_keys: Vec<String> = message
                .account_keys
                .into_iter()
                .map(|key| key.pubkey)
                .collect();
            message
                .instructions
                .into_iter()
                .filter_map(|ix| from_ui_instruction(ix, &account_keys))
                .collect()
        }
        UiMessage::Raw(message) => message
            .instructions
            .into_iter()
            .filter_map(|ix| from_ui_instruction(UiInstruction::Compiled(ix), &message.account_keys))
            .collect(),
    };

    Some(ParsedTransaction {
        signature: signature.to_string(),
        slot: transaction.slot,
        instructions,
    })
}

fn from_ui_instruction(instruction: UiInstruction, account_keys: &[String]) -> Option<ParsedInstruction> {
    match instruction {
        UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(ix)) => {
            Some(ParsedInstruction::partially_decoded(ix.program_id, ix.accounts))
        }
        UiInstruction::Parsed(UiParsedInstruction::Parsed(ix)) => {
            Some(ParsedInstruction::decoded(ix.program_id))
        }
        UiInstruction::Compiled(ix) => {
            let program_id = account_keys.get(ix.program_id_index as usize)?.clone();
            let accounts = ix
                .accounts
                .iter()
                .map(|index| account_keys.get(*index as usize).cloned())
                .collect::<Option<Vec<_>>>()?;
            Some(ParsedInstruction::partially_decoded(program_id, accounts))
        }
    }
}
