//! Registry of pools under periodic liquidity sampling

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::domain::pool::{LiquiditySnapshot, PoolIdentity};
use crate::infrastructure::blockchain::LiquidityReader;
use crate::shared::types::TrackerConfig;
use super::observer::PoolObserver;

/// Result of asking the tracker to follow a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Newly tracked, with the immediate sample
    Started(Option<LiquiditySnapshot>),
    AlreadyTracked,
}

struct TrackedPool {
    id: u64,
    handle: JoinHandle<()>,
    started_at: DateTime<Utc>,
}

#[derive(Default)]
struct Registry {
    pools: HashMap<PoolIdentity, TrackedPool>,
    /// Insertion order, oldest first
    order: VecDeque<PoolIdentity>,
    next_id: u64,
}

impl Registry {
    fn remove(&mut self, pool: &PoolIdentity) -> Option<TrackedPool> {
        self.order.retain(|tracked| tracked != pool);
        self.pools.remove(pool)
    }
}

/// Take one sample and hand it to the observer
pub(crate) async fn sample(
    reader: &LiquidityReader,
    observer: &dyn PoolObserver,
    pool: &PoolIdentity,
) -> Option<LiquiditySnapshot> {
    let snapshot = reader.fetch(&pool.pool_address).await;
    observer.on_liquidity(pool, snapshot.as_ref());
    snapshot
}

/// Samples every tracked pool once on arrival and then on a fixed interval.
/// Each pool runs on its own task; a failed sample never affects the others.
pub struct PoolTracker {
    reader: LiquidityReader,
    config: TrackerConfig,
    observer: Arc<dyn PoolObserver>,
    registry: Arc<Mutex<Registry>>,
}

impl PoolTracker {
    pub fn new(reader: LiquidityReader, config: TrackerConfig, observer: Arc<dyn PoolObserver>) -> Self {
        Self {
            reader,
            config,
            observer,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Start sampling `pool`. Resolves once the immediate sample is taken.
    ///
    /// When the registry is at `max_tracked_pools` the oldest entry is
    /// cancelled first. A cap of 0 means unbounded.
    pub async fn track(&self, pool: PoolIdentity) -> TrackOutcome {
        let (first_tx, first_rx) = oneshot::channel();

        {
            let mut registry = self.registry.lock().await;
            if registry.pools.contains_key(&pool) {
                debug!("Pool {} already tracked", pool.pool_address);
                return TrackOutcome::AlreadyTracked;
            }

            let cap = self.config.max_tracked_pools;
            while cap > 0 && registry.pools.len() >= cap {
                let Some(oldest) = registry.order.front().copied() else {
                    break;
                };
                if let Some(evicted) = registry.remove(&oldest) {
                    evicted.handle.abort();
                    info!(
                        "Evicted pool {} (tracked since {}) to stay within {} pools",
                        oldest.pool_address, evicted.started_at, cap
                    );
                }
            }

            let id = registry.next_id;
            registry.next_id += 1;
            let handle = self.spawn_sampling(id, pool, first_tx);
            registry.pools.insert(
                pool,
                TrackedPool {
                    id,
                    handle,
                    started_at: Utc::now(),
                },
            );
            registry.order.push_back(pool);
            info!("📊 Tracking pool {} ({} total)", pool.pool_address, registry.pools.len());
        }

        TrackOutcome::Started(first_rx.await.ok().flatten())
    }

    fn spawn_sampling(
        &self,
        id: u64,
        pool: PoolIdentity,
        first_tx: oneshot::Sender<Option<LiquiditySnapshot>>,
    ) -> JoinHandle<()> {
        let reader = self.reader.clone();
        let observer = Arc::clone(&self.observer);
        let registry = Arc::clone(&self.registry);
        let interval = self.config.resample_interval();
        let drained_limit = self.config.drained_sample_limit;

        tokio::spawn(async move {
            let mut first_tx = Some(first_tx);
            let mut drained = 0u32;

            loop {
                let snapshot = sample(&reader, observer.as_ref(), &pool).await;
                // failed samples leave the streak untouched
                match snapshot {
                    Some(s) if s.is_drained() => drained += 1,
                    Some(_) => drained = 0,
                    None => {}
                }
                if let Some(tx) = first_tx.take() {
                    let _ = tx.send(snapshot);
                }

                if drained_limit > 0 && drained >= drained_limit {
                    let mut registry = registry.lock().await;
                    if registry.pools.get(&pool).is_some_and(|entry| entry.id == id) {
                        registry.remove(&pool);
                    }
                    info!(
                        "Pool {} reported empty reserves {} times in a row, no longer tracked",
                        pool.pool_address, drained
                    );
                    return;
                }

                sleep(interval).await;
            }
        })
    }

    /// Cancel sampling for `pool`; false if it was not tracked
    pub async fn untrack(&self, pool: &PoolIdentity) -> bool {
        let removed = self.registry.lock().await.remove(pool);
        match removed {
            Some(entry) => {
                entry.handle.abort();
                debug!("Stopped tracking pool {}", pool.pool_address);
                true
            }
            None => false,
        }
    }

    pub async fn shutdown(&self) {
        let mut registry = self.registry.lock().await;
        let count = registry.pools.len();
        for (_, entry) in registry.pools.drain() {
            entry.handle.abort();
        }
        registry.order.clear();
        info!("Pool tracker stopped ({} pools cancelled)", count);
    }

    /// Tracked pools, oldest first
    pub async fn tracked(&self) -> Vec<PoolIdentity> {
        self.registry.lock().await.order.iter().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.registry.lock().await.pools.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use solana_sdk::pubkey::Pubkey;

    use super::*;
    use crate::application::observer::recording::RecordingObserver;
    use crate::domain::pool::encode_state;
    use crate::infrastructure::blockchain::mock::MockRpc;

    fn identity() -> PoolIdentity {
        PoolIdentity {
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            pool_address: Pubkey::new_unique(),
        }
    }

    fn config(max_tracked_pools: usize, drained_sample_limit: u32) -> TrackerConfig {
        TrackerConfig {
            resample_interval_ms: 1000,
            max_tracked_pools,
            drained_sample_limit,
            ..TrackerConfig::default()
        }
    }

    fn tracker(rpc: Arc<MockRpc>, observer: Arc<RecordingObserver>, config: TrackerConfig) -> PoolTracker {
        PoolTracker::new(LiquidityReader::new(rpc), config, observer)
    }

    fn active(base: u64, quote: u64, lp: u64) -> LiquiditySnapshot {
        LiquiditySnapshot {
            base_reserve: base,
            quote_reserve: quote,
            lp_supply: lp,
            status: 1,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_samples_immediately_and_periodically() {
        let rpc = Arc::new(MockRpc::new());
        let observer = Arc::new(RecordingObserver::default());
        let pool = identity();
        rpc.set_account(pool.pool_address, encode_state(1, 5000, 7000, 3000));
        let tracker = tracker(rpc, observer.clone(), config(10, 0));

        let outcome = tracker.track(pool).await;
        assert_eq!(outcome, TrackOutcome::Started(Some(active(5000, 7000, 3000))));
        assert_eq!(observer.samples_for(&pool).len(), 1);

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(observer.samples_for(&pool).len(), 3);

        assert_eq!(tracker.track(pool).await, TrackOutcome::AlreadyTracked);
        assert_eq!(observer.samples_for(&pool).len(), 3);
        assert_eq!(tracker.len().await, 1);

        tracker.shutdown().await;
        assert!(tracker.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_sample_does_not_affect_other_pools() {
        let rpc = Arc::new(MockRpc::new());
        let observer = Arc::new(RecordingObserver::default());
        let healthy = identity();
        let broken = identity();
        rpc.set_account(healthy.pool_address, encode_state(1, 10, 20, 5));
        rpc.fail_account(broken.pool_address);
        let tracker = tracker(rpc.clone(), observer.clone(), config(10, 0));

        tracker.track(healthy).await;
        assert_eq!(tracker.track(broken).await, TrackOutcome::Started(None));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(observer.samples_for(&healthy), vec![Some(active(10, 20, 5)); 2]);
        assert_eq!(observer.samples_for(&broken), vec![None, None]);

        // the broken pool keeps being sampled and recovers
        rpc.set_account(broken.pool_address, encode_state(1, 1, 2, 3));
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(observer.samples_for(&broken).last(), Some(&Some(active(1, 2, 3))));

        tracker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_evicts_oldest_pool() {
        let rpc = Arc::new(MockRpc::new());
        let observer = Arc::new(RecordingObserver::default());
        let pools = [identity(), identity(), identity()];
        for pool in &pools {
            rpc.set_account(pool.pool_address, encode_state(1, 1, 1, 1));
        }
        let tracker = tracker(rpc, observer.clone(), config(2, 0));

        for pool in pools {
            tracker.track(pool).await;
        }
        assert_eq!(tracker.tracked().await, vec![pools[1], pools[2]]);

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(observer.samples_for(&pools[0]).len(), 1);
        assert_eq!(observer.samples_for(&pools[1]).len(), 2);
        assert_eq!(observer.samples_for(&pools[2]).len(), 2);

        tracker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_untrack_cancels_sampling() {
        let rpc = Arc::new(MockRpc::new());
        let observer = Arc::new(RecordingObserver::default());
        let pool = identity();
        let tracker = tracker(rpc, observer.clone(), config(10, 0));

        tracker.track(pool).await;
        assert!(tracker.untrack(&pool).await);
        assert!(!tracker.untrack(&pool).await);

        sleep(Duration::from_millis(3500)).await;
        assert_eq!(observer.samples_for(&pool).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drained_pool_removes_itself() {
        let rpc = Arc::new(MockRpc::new());
        let observer = Arc::new(RecordingObserver::default());
        let pool = identity();
        rpc.set_account(pool.pool_address, encode_state(1, 0, 0, 10));
        let tracker = tracker(rpc, observer.clone(), config(10, 2));

        tracker.track(pool).await;
        assert_eq!(tracker.len().await, 1);

        sleep(Duration::from_millis(1500)).await;
        assert!(tracker.is_empty().await);
        assert_eq!(observer.samples_for(&pool).len(), 2);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(observer.samples_for(&pool).len(), 2);
    }
}
