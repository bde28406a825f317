//! Scripted `ChainRpc` for tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::domain::chain::{ParsedInstruction, ParsedTransaction, SignatureRecord};
use crate::shared::errors::AppError;
use super::traits::ChainRpc;

#[derive(Default)]
pub struct MockRpc {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    failing_accounts: Mutex<HashSet<Pubkey>>,
    account_calls: Mutex<HashMap<Pubkey, usize>>,
    transactions: Mutex<HashMap<String, ParsedTransaction>>,
    failing_transactions: Mutex<HashSet<String>>,
    pages: Mutex<VecDeque<Result<Vec<SignatureRecord>, String>>>,
    cursors: Mutex<Vec<Option<String>>>,
    slot: Option<u64>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self { slot: Some(1), ..Default::default() }
    }

    pub fn unhealthy() -> Self {
        Self::default()
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.failing_accounts.lock().unwrap().remove(&address);
        self.accounts.lock().unwrap().insert(address, data);
    }

    pub fn fail_account(&self, address: Pubkey) {
        self.failing_accounts.lock().unwrap().insert(address);
    }

    pub fn fail_transaction(&self, signature: &str) {
        self.failing_transactions.lock().unwrap().insert(signature.to_string());
    }

    pub fn account_calls(&self, address: &Pubkey) -> usize {
        self.account_calls.lock().unwrap().get(address).copied().unwrap_or(0)
    }

    pub fn add_transaction(&self, transaction: ParsedTransaction) {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.signature.clone(), transaction);
    }

    pub fn push_page(&self, page: Vec<SignatureRecord>) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_page_error(&self, message: &str) {
        self.pages.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, AppError> {
        *self.account_calls.lock().unwrap().entry(*address).or_default() += 1;
        if self.failing_accounts.lock().unwrap().contains(address) {
            return Err(AppError::BlockchainError("account fetch failed".to_string()));
        }
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError> {
        if self.failing_transactions.lock().unwrap().contains(signature) {
            return Err(AppError::BlockchainError("transaction fetch failed".to_string()));
        }
        Ok(self.transactions.lock().unwrap().get(signature).cloned())
    }

    async fn get_signatures_for_address(
        &self,
        _address: &Pubkey,
        _limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<SignatureRecord>, AppError> {
        self.cursors.lock().unwrap().push(before.map(str::to_string));
        match self.pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(AppError::BlockchainError(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn get_slot(&self) -> Result<u64, AppError> {
        self.slot
            .ok_or_else(|| AppError::BlockchainError("node unavailable".to_string()))
    }
}

/// Transaction with one pool creation instruction of `accounts` entries.
/// Positions 8 and 9 hold `token_a` and `token_b` when long enough.
pub fn creation_transaction(
    signature: &str,
    program_id: &Pubkey,
    accounts: usize,
    token_a: Pubkey,
    token_b: Pubkey,
) -> ParsedTransaction {
    let keys = (0..accounts)
        .map(|i| match i {
            8 => token_a.to_string(),
            9 => token_b.to_string(),
            _ => Pubkey::new_unique().to_string(),
        })
        .collect();

    ParsedTransaction {
        signature: signature.to_string(),
        slot: 1,
        instructions: vec![
            ParsedInstruction::decoded("ComputeBudget111111111111111111111111111111"),
            ParsedInstruction::partially_decoded(program_id.to_string(), keys),
        ],
    }
}

pub fn record(signature: &str, block_time: i64) -> SignatureRecord {
    SignatureRecord {
        signature: signature.to_string(),
        block_time: Some(block_time),
    }
}

pub fn untimed(signature: &str) -> SignatureRecord {
    SignatureRecord {
        signature: signature.to_string(),
        block_time: None,
    }
}
