//! Transport-neutral stream of published moves.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use battle_core::ParticipantId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::trace;

use super::exchange::MoveExchange;
use super::record::{PublishedMoveRecord, RoundId, sort_by_publish_time};

/// Source of records not yet processed by the local observer.
///
/// The battle loop only depends on this trait, so a push transport can
/// replace polling without touching it.
#[async_trait]
pub trait MoveFeed: Send {
    /// Waits for a non-empty batch, sorted by publish time.
    ///
    /// Records stay in later batches until they are marked processed.
    async fn next_batch(&mut self) -> Vec<PublishedMoveRecord>;
}

/// Batches buffered between the poller and the battle loop.
const BATCH_BUFFER: usize = 4;

/// Default feed: a background task polls the exchange on a fixed interval
/// and forwards every non-empty batch.
///
/// The poller runs whether or not the battle loop is waiting on a peer; it
/// stops when the feed is dropped. Must be created inside a tokio runtime.
pub struct PollingMoveFeed {
    batches: mpsc::Receiver<Vec<PublishedMoveRecord>>,
    poller: JoinHandle<()>,
}

impl PollingMoveFeed {
    pub fn new(
        exchange: Arc<dyn MoveExchange>,
        round: RoundId,
        observer: ParticipantId,
        interval: Duration,
    ) -> Self {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let (tx, batches) = mpsc::channel(BATCH_BUFFER);
        let poller = tokio::spawn(poll_loop(exchange, round, observer, ticker, tx));
        Self { batches, poller }
    }
}

async fn poll_loop(
    exchange: Arc<dyn MoveExchange>,
    round: RoundId,
    observer: ParticipantId,
    mut ticker: Interval,
    tx: mpsc::Sender<Vec<PublishedMoveRecord>>,
) {
    loop {
        ticker.tick().await;
        match exchange.poll_unprocessed_moves(&round, observer).await {
            Ok(mut records) if !records.is_empty() => {
                sort_by_publish_time(&mut records);
                if tx.send(records).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                trace!(target: "runtime::sync", %error, %round, "poll failed; retrying next interval");
            }
        }
    }
    trace!(target: "runtime::sync", %round, "move feed closed; poller stopping");
}

impl Drop for PollingMoveFeed {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

#[async_trait]
impl MoveFeed for PollingMoveFeed {
    async fn next_batch(&mut self) -> Vec<PublishedMoveRecord> {
        match self.batches.recv().await {
            Some(records) => records,
            // The poller only exits once the receiver is gone.
            None => std::future::pending().await,
        }
    }
}
