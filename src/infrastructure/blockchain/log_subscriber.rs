//! Program log subscription feeding a bounded event channel

use std::future::Future;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::rpc_config::{RpcTransactionLogsConfig, RpcTransactionLogsFilter};
use solana_client::rpc_response::RpcLogsResponse;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::domain::chain::{LogNotification, ProgramEvent};
use crate::shared::errors::AppError;

impl From<RpcLogsResponse> for LogNotification {
    fn from(response: RpcLogsResponse) -> Self {
        Self {
            signature: response.signature,
            err: response.err.map(|e| e.to_string()),
            logs: response.logs,
        }
    }
}

/// Why a forwarding pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    StreamEnded,
    ReceiverClosed,
}

/// Signature of a successful notification whose logs contain `marker`
pub fn matching_signature<'a>(notification: &'a LogNotification, marker: &str) -> Option<&'a str> {
    if notification.err.is_some() || notification.logs.is_empty() {
        return None;
    }
    notification
        .logs
        .iter()
        .any(|line| line.contains(marker))
        .then_some(notification.signature.as_str())
}

/// Push matching notifications into `tx`, waiting for capacity when the
/// channel is full. One event per matching notification, no deduplication.
pub async fn forward<S>(mut stream: S, marker: &str, tx: &mpsc::Sender<ProgramEvent>) -> ForwardOutcome
where
    S: Stream<Item = LogNotification> + Unpin,
{
    while let Some(notification) = stream.next().await {
        let Some(signature) = matching_signature(&notification, marker) else {
            continue;
        };
        debug!("Marker '{}' seen in {}", marker, signature);
        if tx.send(ProgramEvent::new(signature)).await.is_err() {
            return ForwardOutcome::ReceiverClosed;
        }
    }
    ForwardOutcome::StreamEnded
}

/// Call `subscribe` until the receiver closes, pausing `delay` between attempts
pub async fn resubscribe_loop<F, Fut>(
    tx: mpsc::Sender<ProgramEvent>,
    program_id: Pubkey,
    delay: Duration,
    mut subscribe: F,
) where
    F: FnMut(mpsc::Sender<ProgramEvent>) -> Fut,
    Fut: Future<Output = Result<ForwardOutcome, AppError>>,
{
    loop {
        match subscribe(tx.clone()).await {
            Ok(ForwardOutcome::ReceiverClosed) => {
                info!("Event receiver dropped, closing log subscription");
                return;
            }
            Ok(ForwardOutcome::StreamEnded) => {
                warn!("Log stream for {} ended. Re-subscribing...", program_id);
            }
            Err(e) => {
                error!("Log subscription for {} failed: {}", program_id, e);
            }
        }
        if tx.is_closed() {
            return;
        }
        sleep(delay).await;
    }
}

/// Subscribes to a program's logs at `finalized` commitment
#[derive(Debug, Clone)]
pub struct EventSubscriber {
    ws_url: String,
    program_id: Pubkey,
    marker: String,
    reconnect_delay: Duration,
}

impl EventSubscriber {
    pub fn new(ws_url: String, program_id: Pubkey, marker: String) -> Self {
        Self {
            ws_url,
            program_id,
            marker,
            reconnect_delay: Duration::from_secs(5),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Run the subscription on its own task, resubscribing whenever the
    /// stream drops. Stops once the receiving side is gone.
    pub fn spawn(self, tx: mpsc::Sender<ProgramEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let this = &self;
            resubscribe_loop(tx, this.program_id, this.reconnect_delay, move |tx| async move {
                this.subscribe_once(&tx).await
            })
            .await;
        })
    }

    async fn subscribe_once(&self, tx: &mpsc::Sender<ProgramEvent>) -> Result<ForwardOutcome, AppError> {
        let client = PubsubClient::new(&self.ws_url)
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to connect pubsub: {}", e)))?;

        let (stream, unsubscribe) = client
            .logs_subscribe(
                RpcTransactionLogsFilter::Mentions(vec![self.program_id.to_string()]),
                RpcTransactionLogsConfig {
                    commitment: Some(CommitmentConfig::finalized()),
                },
            )
            .await
            .map_err(|e| AppError::BlockchainError(format!("Failed to subscribe to logs: {}", e)))?;

        info!("📡 Subscribed to {} logs (marker '{}')", self.program_id, self.marker);

        let notifications = stream.map(|response| LogNotification::from(response.value));
        let outcome = forward(notifications, &self.marker, tx).await;

        unsubscribe().await;
        Ok(outcome)
    }
}
