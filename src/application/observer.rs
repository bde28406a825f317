//! Callbacks for pipeline output

use crate::domain::chain::ProgramEvent;
use crate::domain::pool::{LiquiditySnapshot, PoolIdentity};

/// Receives discovered pools and their liquidity samples.
/// Called from many tasks at once; implementations must not block.
pub trait PoolObserver: Send + Sync {
    fn on_pool_discovered(&self, event: &ProgramEvent, pool: &PoolIdentity);

    /// `None` when the sample could not be read
    fn on_liquidity(&self, pool: &PoolIdentity, snapshot: Option<&LiquiditySnapshot>);
}
