//! Pool watcher use cases: live subscription and historical analysis

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::domain::chain::ProgramEvent;
use crate::domain::pool::{parse_identity, AccountLayout, PoolIdentity, PoolKeyDeriver};
use crate::infrastructure::blockchain::{
    ChainRpc, EventSubscriber, HistoricalScanner, LiquidityReader, TransactionResolver,
};
use crate::shared::errors::AppError;
use crate::shared::types::{DateRange, WatcherConfig};
use crate::shared::utils::explorer_url;
use super::observer::PoolObserver;
use super::pool_tracker::{sample, PoolTracker, TrackOutcome};

/// Totals of one historical run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoricalSummary {
    pub signatures_scanned: usize,
    /// Signatures that resolved to a pool, one sample each
    pub pools_found: usize,
    pub distinct_pools: usize,
    pub samples_with_liquidity: usize,
}

/// Wires resolver, deriver, reader and scanner around one program
pub struct PoolWatcher {
    config: WatcherConfig,
    program_id: Pubkey,
    rpc: Arc<dyn ChainRpc>,
    resolver: TransactionResolver,
    deriver: PoolKeyDeriver,
    reader: LiquidityReader,
    scanner: HistoricalScanner,
}

impl PoolWatcher {
    pub fn new(config: WatcherConfig, rpc: Arc<dyn ChainRpc>) -> Result<Self, AppError> {
        let program_id = parse_identity(&config.program.program_id)?;
        let layout = AccountLayout::by_name(&config.program.account_layout)?;

        Ok(Self {
            resolver: TransactionResolver::new(Arc::clone(&rpc), &program_id, layout),
            deriver: PoolKeyDeriver::new(program_id),
            reader: LiquidityReader::new(Arc::clone(&rpc)),
            scanner: HistoricalScanner::new(Arc::clone(&rpc), config.scan.clone()),
            program_id,
            rpc,
            config,
        })
    }

    /// Confirm the node answers before any mode starts
    pub async fn health_check(&self) -> Result<u64, AppError> {
        let slot = self.rpc.get_slot().await?;
        info!("✅ Connected to Solana node, current slot {}", slot);
        Ok(slot)
    }

    /// Resolve a creation signature into a pool and announce it.
    /// Anything that does not resolve is skipped.
    pub async fn process_signature(
        &self,
        event: &ProgramEvent,
        observer: &dyn PoolObserver,
    ) -> Option<PoolIdentity> {
        let pair = self.resolver.resolve(&event.signature).await?;
        let pool = match self.deriver.identify(pair) {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Cannot derive pool for {}: {}", event.signature, e);
                return None;
            }
        };

        info!(
            "Pool {} created in {}",
            pool.pool_address,
            explorer_url(&event.signature)
        );
        observer.on_pool_discovered(event, &pool);
        Some(pool)
    }

    /// Subscribe to creation events and track every new pool until the
    /// subscription task stops.
    pub async fn run_live(&self, observer: Arc<dyn PoolObserver>) -> Result<(), AppError> {
        let tracker_config = self.config.tracker.clone();
        let (tx, rx) = mpsc::channel(tracker_config.channel_capacity.max(1));

        let subscription = EventSubscriber::new(
            self.config.network.ws_url.clone(),
            self.program_id,
            self.config.program.creation_marker.clone(),
        )
        .with_reconnect_delay(self.config.network.reconnect_delay())
        .spawn(tx);

        let tracker = Arc::new(PoolTracker::new(
            self.reader.clone(),
            tracker_config.clone(),
            Arc::clone(&observer),
        ));

        let heartbeat_tracker = Arc::clone(&tracker);
        let heartbeat_every = tracker_config.heartbeat_interval().max(Duration::from_secs(1));
        let heartbeat = tokio::spawn(async move {
            let mut ticker = interval(heartbeat_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                info!(
                    "💓 Still listening for new pools ({} tracked)",
                    heartbeat_tracker.len().await
                );
            }
        });

        info!("🚀 Monitoring new pools for program {}", self.program_id);
        self.run_pipeline(rx, &tracker, observer.as_ref()).await;

        heartbeat.abort();
        subscription.abort();
        tracker.shutdown().await;
        Ok(())
    }

    /// Drain `rx`, handling at most `max_in_flight` events at once
    pub async fn run_pipeline(
        &self,
        rx: mpsc::Receiver<ProgramEvent>,
        tracker: &PoolTracker,
        observer: &dyn PoolObserver,
    ) {
        let limit = self.config.tracker.max_in_flight.max(1);
        ReceiverStream::new(rx)
            .for_each_concurrent(limit, move |event| async move {
                if let Some(pool) = self.process_signature(&event, observer).await {
                    if tracker.track(pool).await == TrackOutcome::AlreadyTracked {
                        info!("Pool {} seen again in {}", pool.pool_address, event.signature);
                    }
                }
            })
            .await;
    }

    /// Resolve every creation in `range`, sampling once per resolved
    /// signature and pausing after each sample
    pub async fn run_historical(
        &self,
        range: &DateRange,
        observer: &dyn PoolObserver,
    ) -> Result<HistoricalSummary, AppError> {
        info!("🔍 Starting historical analysis...");
        let signatures = self.scanner.scan(&self.program_id, range).await?;

        let mut summary = HistoricalSummary {
            signatures_scanned: signatures.len(),
            ..HistoricalSummary::default()
        };
        let mut pools = HashSet::new();

        for signature in signatures {
            let event = ProgramEvent::new(signature);
            let Some(pool) = self.process_signature(&event, observer).await else {
                continue;
            };
            summary.pools_found += 1;
            pools.insert(pool);

            if sample(&self.reader, observer, &pool).await.is_some() {
                summary.samples_with_liquidity += 1;
            }
            sleep(self.config.scan.signature_delay()).await;
        }
        summary.distinct_pools = pools.len();

        info!(
            "Historical analysis complete: {} pools from {} transactions",
            summary.distinct_pools, summary.signatures_scanned
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::application::observer::recording::RecordingObserver;
    use crate::domain::pool::{encode_state, LiquiditySnapshot, PoolStatus};
    use crate::infrastructure::blockchain::mock::{creation_transaction, record, MockRpc};
    use crate::shared::errors::{PoolError, ScanError};

    fn config_for(program: &Pubkey) -> WatcherConfig {
        let mut config = WatcherConfig::default();
        config.program.program_id = program.to_string();
        config.scan.page_delay_ms = 0;
        config.scan.retry_base_delay_ms = 0;
        config.scan.signature_delay_ms = 0;
        config.scan.page_size = 10;
        config
    }

    fn january() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn mid_january() -> i64 {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap().timestamp()
    }

    #[test]
    fn test_new_rejects_bad_program_and_layout() {
        let rpc: Arc<dyn ChainRpc> = Arc::new(MockRpc::new());

        let mut config = WatcherConfig::default();
        config.program.program_id = "not-a-program".to_string();
        assert!(matches!(
            PoolWatcher::new(config, Arc::clone(&rpc)),
            Err(AppError::Pool(PoolError::InvalidIdentity(_)))
        ));

        let mut config = WatcherConfig::default();
        config.program.account_layout = "amm-v9".to_string();
        assert!(matches!(
            PoolWatcher::new(config, rpc),
            Err(AppError::Pool(PoolError::UnknownLayout(_)))
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let program = Pubkey::new_unique();
        let healthy = PoolWatcher::new(config_for(&program), Arc::new(MockRpc::new())).unwrap();
        assert_eq!(healthy.health_check().await.unwrap(), 1);

        let unhealthy = PoolWatcher::new(config_for(&program), Arc::new(MockRpc::unhealthy())).unwrap();
        assert!(unhealthy.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_live_pipeline_end_to_end() {
        let rpc = Arc::new(MockRpc::new());
        let program = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        rpc.add_transaction(creation_transaction("create", &program, 12, a, b));
        let expected = PoolKeyDeriver::derive(&a, &b, &program).unwrap();
        rpc.set_account(expected, encode_state(1, 5000, 7000, 3000));

        let watcher = PoolWatcher::new(config_for(&program), rpc.clone()).unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let tracker = PoolTracker::new(
            LiquidityReader::new(rpc.clone()),
            watcher.config.tracker.clone(),
            observer.clone(),
        );

        let (tx, rx) = mpsc::channel(4);
        tx.send(ProgramEvent::new("create")).await.unwrap();
        tx.send(ProgramEvent::new("unrelated")).await.unwrap();
        tx.send(ProgramEvent::new("create")).await.unwrap();
        drop(tx);
        watcher.run_pipeline(rx, &tracker, observer.as_ref()).await;

        let pool = PoolIdentity { token_a: a, token_b: b, pool_address: expected };
        assert_eq!(tracker.tracked().await, vec![pool]);
        assert_eq!(observer.discovered().len(), 2);

        let samples = observer.samples_for(&pool);
        assert_eq!(samples.len(), 1);
        let snapshot: LiquiditySnapshot = samples[0].unwrap();
        assert_eq!(snapshot.pool_status(), PoolStatus::Active);
        assert_eq!(
            (snapshot.base_reserve, snapshot.quote_reserve, snapshot.lp_supply),
            (5000, 7000, 3000)
        );

        tracker.shutdown().await;
    }

    fn historical_fixture(program: &Pubkey) -> (Arc<MockRpc>, PoolIdentity) {
        let rpc = Arc::new(MockRpc::new());
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (c, d) = (Pubkey::new_unique(), Pubkey::new_unique());
        rpc.add_transaction(creation_transaction("first", program, 10, a, b));
        rpc.add_transaction(creation_transaction("repeat", program, 10, a, b));
        rpc.add_transaction(creation_transaction("second", program, 10, c, d));
        let pool_address = PoolKeyDeriver::derive(&a, &b, program).unwrap();
        rpc.set_account(pool_address, encode_state(1, 10, 20, 30));
        rpc.push_page(vec![
            record("first", mid_january()),
            record("swap", mid_january()),
            record("repeat", mid_january()),
            record("second", mid_january()),
        ]);
        (rpc, PoolIdentity { token_a: a, token_b: b, pool_address })
    }

    #[tokio::test]
    async fn test_historical_samples_every_resolved_signature() {
        let program = Pubkey::new_unique();
        let (rpc, repeated) = historical_fixture(&program);

        let watcher = PoolWatcher::new(config_for(&program), rpc).unwrap();
        let observer = RecordingObserver::default();
        let summary = watcher.run_historical(&january(), &observer).await.unwrap();

        assert_eq!(
            summary,
            HistoricalSummary {
                signatures_scanned: 4,
                pools_found: 3,
                distinct_pools: 2,
                samples_with_liquidity: 2,
            }
        );
        assert_eq!(observer.discovered().len(), 3);
        assert_eq!(observer.samples.lock().unwrap().len(), 3);
        assert_eq!(
            observer.samples_for(&repeated),
            vec![Some(LiquiditySnapshot { base_reserve: 10, quote_reserve: 20, lp_supply: 30, status: 1 }); 2]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_historical_pauses_after_each_sample() {
        let program = Pubkey::new_unique();
        let (rpc, _) = historical_fixture(&program);
        let mut config = config_for(&program);
        config.scan.signature_delay_ms = 500;

        let watcher = PoolWatcher::new(config, rpc).unwrap();
        let start = tokio::time::Instant::now();
        let summary = watcher
            .run_historical(&january(), &RecordingObserver::default())
            .await
            .unwrap();

        assert_eq!(summary.pools_found, 3);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_historical_scan_failure_is_fatal() {
        let rpc = Arc::new(MockRpc::new());
        for _ in 0..4 {
            rpc.push_page_error("503 Service Unavailable");
        }
        let program = Pubkey::new_unique();
        let watcher = PoolWatcher::new(config_for(&program), rpc).unwrap();

        let result = watcher
            .run_historical(&january(), &RecordingObserver::default())
            .await;
        assert!(matches!(result, Err(AppError::Scan(ScanError::RetriesExhausted { .. }))));
    }
}
