//! Pool domain - identities, layouts and liquidity snapshots

mod instruction_layout;
mod liquidity_layout;
mod pool_key;

pub use instruction_layout::{AccountLayout, AccountRole};
pub use liquidity_layout::{LiquidityStateLayout, LIQUIDITY_STATE_LEN};
pub use pool_key::{parse_identity, PoolKeyDeriver, POOL_SEED};

#[cfg(test)]
pub(crate) use liquidity_layout::encode_state;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Token mints extracted from a pool creation, in instruction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
}

impl TokenPair {
    pub fn new(token_a: Pubkey, token_b: Pubkey) -> Self {
        Self { token_a, token_b }
    }
}

/// A pool as tracked: both mints plus the derived state address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolIdentity {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub pool_address: Pubkey,
}

/// Pool status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    Active,
    Inactive,
}

impl PoolStatus {
    pub fn from_raw(status: u64) -> Self {
        if status == 1 {
            PoolStatus::Active
        } else {
            PoolStatus::Inactive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::Active => "Active",
            PoolStatus::Inactive => "Inactive",
        }
    }
}

/// Reserve state of a pool at sampling time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySnapshot {
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub lp_supply: u64,
    pub status: u64,
}

impl LiquiditySnapshot {
    /// Decode the fixed layout at offset 0; `None` for short buffers
    pub fn decode(data: &[u8]) -> Option<Self> {
        LiquidityStateLayout::decode(data).map(Into::into)
    }

    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus::from_raw(self.status)
    }

    /// Both reserves empty
    pub fn is_drained(&self) -> bool {
        self.base_reserve == 0 && self.quote_reserve == 0
    }
}
