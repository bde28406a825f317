//! Raydium liquidity state prefix

use borsh::{BorshDeserialize, BorshSerialize};

use super::LiquiditySnapshot;

/// Bytes consumed by [`LiquidityStateLayout`]
pub const LIQUIDITY_STATE_LEN: usize = 32;

/// First four little-endian u64 fields of the pool state account
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityStateLayout {
    pub status: u64,
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub lp_reserve: u64,
}

impl LiquidityStateLayout {
    /// Decode from offset 0; trailing bytes are ignored
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < LIQUIDITY_STATE_LEN {
            return None;
        }
        let mut prefix = &data[..LIQUIDITY_STATE_LEN];
        Self::deserialize(&mut prefix).ok()
    }
}

impl From<LiquidityStateLayout> for LiquiditySnapshot {
    fn from(layout: LiquidityStateLayout) -> Self {
        Self {
            base_reserve: layout.base_reserve,
            quote_reserve: layout.quote_reserve,
            lp_supply: layout.lp_reserve,
            status: layout.status,
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_state(status: u64, base: u64, quote: u64, lp: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(LIQUIDITY_STATE_LEN);
    for value in [status, base, quote, lp] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data
}
