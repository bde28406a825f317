//! Backward walk over a program's signature history

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::shared::errors::ScanError;
use crate::shared::types::{DateRange, ScanConfig};
use super::traits::ChainRpc;

/// Backoff bookkeeping, reset after every successful page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RetryState {
    attempt: u32,
    next_delay: Duration,
}

impl RetryState {
    /// Record a failure; `None` once `max_retries` retries were already spent
    fn fail(&mut self, base_delay: Duration, max_retries: u32) -> Option<Duration> {
        if self.attempt >= max_retries {
            return None;
        }
        self.attempt += 1;
        self.next_delay = base_delay.saturating_mul(2u32.saturating_pow(self.attempt));
        Some(self.next_delay)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Pages through signature history and keeps entries inside a date window
pub struct HistoricalScanner {
    rpc: Arc<dyn ChainRpc>,
    config: ScanConfig,
}

impl HistoricalScanner {
    pub fn new(rpc: Arc<dyn ChainRpc>, config: ScanConfig) -> Self {
        Self { rpc, config }
    }

    /// Signatures whose block time lies in `range`, newest first.
    ///
    /// The walk continues until history is exhausted or a page comes back
    /// short; it does not stop early at entries older than `range.start`.
    /// Exhausted retries abort the whole scan without partial results.
    pub async fn scan(&self, program_id: &Pubkey, range: &DateRange) -> Result<Vec<String>, ScanError> {
        info!("Fetching transactions between {} and {}", range.start, range.end);

        let mut signatures = Vec::new();
        let mut before: Option<String> = None;
        let mut retry = RetryState::default();

        loop {
            let page = match self
                .rpc
                .get_signatures_for_address(program_id, self.config.page_size, before.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => match retry.fail(self.config.retry_base_delay(), self.config.max_retries) {
                    Some(delay) => {
                        warn!(
                            "Retry {}/{} in {}ms: {}",
                            retry.attempt,
                            self.config.max_retries,
                            delay.as_millis(),
                            e
                        );
                        sleep(delay).await;
                        continue;
                    }
                    None => {
                        return Err(ScanError::RetriesExhausted {
                            attempts: self.config.max_retries,
                            last_error: e.to_string(),
                        });
                    }
                },
            };
            retry.reset();

            let Some(last) = page.last() else {
                break;
            };
            before = Some(last.signature.clone());

            let page_len = page.len();
            let relevant: Vec<String> = page
                .into_iter()
                .filter(|record| {
                    record
                        .block_time
                        .is_some_and(|block_time| range.contains_block_time(block_time))
                })
                .map(|record| record.signature)
                .collect();

            info!("Processed batch: {}/{} relevant", relevant.len(), page_len);
            signatures.extend(relevant);

            if page_len < self.config.page_size {
                break;
            }

            sleep(self.config.page_delay()).await;
        }

        info!("Found {} total transactions in date range", signatures.len());
        Ok(signatures)
    }
}
