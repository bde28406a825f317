//! Pool state address derivation

use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::PoolError;
use super::{PoolIdentity, TokenPair};

/// Seed prefix for the pool state PDA
pub const POOL_SEED: &[u8] = b"Pool";

/// Derives pool state addresses for one program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKeyDeriver {
    program_id: Pubkey,
}

impl PoolKeyDeriver {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// PDA of `["Pool", token_a, token_b]`. The pair is used in call order.
    pub fn derive(
        token_a: &Pubkey,
        token_b: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Pubkey, PoolError> {
        Pubkey::try_find_program_address(
            &[POOL_SEED, token_a.as_ref(), token_b.as_ref()],
            program_id,
        )
        .map(|(address, _bump)| address)
        .ok_or_else(|| PoolError::NoViableBump {
            token_a: token_a.to_string(),
            token_b: token_b.to_string(),
        })
    }

    pub fn identify(&self, pair: TokenPair) -> Result<PoolIdentity, PoolError> {
        let pool_address = Self::derive(&pair.token_a, &pair.token_b, &self.program_id)?;
        Ok(PoolIdentity {
            token_a: pair.token_a,
            token_b: pair.token_b,
            pool_address,
        })
    }
}

/// Parse a base58 32-byte identity
pub fn parse_identity(value: &str) -> Result<Pubkey, PoolError> {
    value
        .parse::<Pubkey>()
        .map_err(|_| PoolError::InvalidIdentity(value.to_string()))
}
