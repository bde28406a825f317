//! Pool reserve reader

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::domain::pool::{LiquiditySnapshot, LIQUIDITY_STATE_LEN};
use super::traits::ChainRpc;

/// Reads and decodes pool state accounts. One remote call per fetch, no retries.
#[derive(Clone)]
pub struct LiquidityReader {
    rpc: Arc<dyn ChainRpc>,
}

impl LiquidityReader {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self { rpc }
    }

    /// Current snapshot, or `None` when the account is missing, unreadable or too short
    pub async fn fetch(&self, pool_address: &Pubkey) -> Option<LiquiditySnapshot> {
        let data = match self.rpc.get_account_data(pool_address).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                info!("No data found for pool address: {}", pool_address);
                return None;
            }
            Err(e) => {
                warn!("Error fetching liquidity for pool {}: {}", pool_address, e);
                return None;
            }
        };

        let snapshot = LiquiditySnapshot::decode(&data);
        if snapshot.is_none() {
            info!(
                "Pool account {} holds {} bytes, need {}",
                pool_address,
                data.len(),
                LIQUIDITY_STATE_LEN
            );
        } else {
            debug!("Decoded liquidity for {}: {:?}", pool_address, snapshot);
        }
        snapshot
    }
}
