//! Exactly-once application of peer moves.

use std::collections::HashSet;
use std::sync::Arc;

use battle_core::{MoveSelection, ParticipantId, ResolvedMove};
use tracing::{debug, trace};

use super::error::ExchangeError;
use super::exchange::MoveExchange;
use super::feed::MoveFeed;
use super::record::{PublishedMoveRecord, RecordId, RoundId};

/// Publishes local moves and hands out peer records one at a time.
///
/// Every record id is remembered once it has been handed out, so a record
/// that shows up again (an unmarked record re-polled, a duplicate delivery)
/// is dropped without reaching the battle state.
pub struct MoveSynchronizer {
    exchange: Arc<dyn MoveExchange>,
    feed: Box<dyn MoveFeed>,
    round: RoundId,
    observer: ParticipantId,
    applied: HashSet<RecordId>,
    pending: Vec<PublishedMoveRecord>,
}

impl MoveSynchronizer {
    pub fn new(
        exchange: Arc<dyn MoveExchange>,
        feed: Box<dyn MoveFeed>,
        round: RoundId,
        observer: ParticipantId,
    ) -> Self {
        Self {
            exchange,
            feed,
            round,
            observer,
            applied: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn round(&self) -> &RoundId {
        &self.round
    }

    pub async fn publish_resolved(
        &self,
        resolved: &ResolvedMove,
    ) -> Result<RecordId, ExchangeError> {
        let record = PublishedMoveRecord::resolved(self.round.clone(), resolved.clone());
        self.publish(record).await
    }

    pub async fn publish_selection(
        &self,
        turn: u32,
        selection: &MoveSelection,
    ) -> Result<RecordId, ExchangeError> {
        let record = PublishedMoveRecord::selection(self.round.clone(), turn, selection.clone());
        self.publish(record).await
    }

    async fn publish(&self, record: PublishedMoveRecord) -> Result<RecordId, ExchangeError> {
        let id = record.id.clone();
        self.exchange.publish_move(&self.round, record).await?;
        debug!(target: "runtime::sync", record = %id, "published move");
        Ok(id)
    }

    /// Queues a polled record. Returns false when it is a duplicate, was
    /// already applied, or is one of our own.
    pub async fn admit(&mut self, record: PublishedMoveRecord) -> bool {
        if self.applied.contains(&record.id) || self.pending.iter().any(|p| p.id == record.id) {
            return false;
        }
        if record.actor == self.observer {
            self.applied.insert(record.id.clone());
            self.mark(&record.id).await;
            return false;
        }
        self.pending.push(record);
        true
    }

    /// Waits until a record matching `wanted` is available and claims it.
    ///
    /// Records that do not match stay queued for later calls. There is no
    /// timeout; callers race this against escape.
    pub async fn next_matching<F>(&mut self, wanted: F) -> PublishedMoveRecord
    where
        F: Fn(&PublishedMoveRecord) -> bool + Send,
    {
        loop {
            if let Some(record) = self.claim(&wanted).await {
                return record;
            }
            let batch = self.feed.next_batch().await;
            for record in batch {
                self.admit(record).await;
            }
        }
    }

    /// Claims the earliest queued record matching `wanted`, if any.
    pub async fn claim<F>(&mut self, wanted: &F) -> Option<PublishedMoveRecord>
    where
        F: Fn(&PublishedMoveRecord) -> bool,
    {
        let index = self.pending.iter().position(|record| wanted(record))?;
        let record = self.pending.remove(index);
        self.applied.insert(record.id.clone());
        self.mark(&record.id).await;
        Some(record)
    }

    pub fn is_applied(&self, id: &RecordId) -> bool {
        self.applied.contains(id)
    }

    async fn mark(&self, id: &RecordId) {
        // An unmarked record is re-polled and then dropped by `admit`.
        if let Err(error) = self.exchange.mark_processed(id, self.observer).await {
            trace!(target: "runtime::sync", %error, record = %id, "mark processed failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{InMemoryMoveExchange, PollingMoveFeed};
    use std::time::Duration;

    const ME: ParticipantId = ParticipantId(0);
    const PEER: ParticipantId = ParticipantId(1);

    fn synchronizer(exchange: &InMemoryMoveExchange) -> MoveSynchronizer {
        let shared: Arc<dyn MoveExchange> = Arc::new(exchange.clone());
        let round = RoundId::new("duel");
        let feed = PollingMoveFeed::new(shared.clone(), round.clone(), ME, Duration::from_millis(5));
        MoveSynchronizer::new(shared, Box::new(feed), round, ME)
    }

    fn peer_selection(turn: u32) -> PublishedMoveRecord {
        PublishedMoveRecord::selection(
            RoundId::new("duel"),
            turn,
            MoveSelection::new(PEER, "strike", ME),
        )
    }

    #[tokio::test]
    async fn reprocessing_a_record_is_a_no_op() {
        let exchange = InMemoryMoveExchange::new();
        let mut sync = synchronizer(&exchange);
        let record = peer_selection(1);

        assert!(sync.admit(record.clone()).await);
        let claimed = sync.claim(&|_: &PublishedMoveRecord| true).await.unwrap();
        assert_eq!(claimed.id, record.id);

        assert!(!sync.admit(record.clone()).await);
        assert!(sync.claim(&|_: &PublishedMoveRecord| true).await.is_none());
        assert!(sync.is_applied(&record.id));
    }

    #[tokio::test]
    async fn waits_through_failures_and_skips_own_records() {
        let exchange = InMemoryMoveExchange::new();
        let mut sync = synchronizer(&exchange);
        let round = RoundId::new("duel");

        sync.publish_selection(1, &MoveSelection::new(ME, "jab", PEER))
            .await
            .unwrap();
        exchange.fail_next_polls(3);
        exchange.publish_move(&round, peer_selection(1)).await.unwrap();

        let record = sync
            .next_matching(|record: &PublishedMoveRecord| record.actor == PEER)
            .await;
        assert_eq!(record.actor, PEER);

        let records = exchange.records();
        assert!(records.iter().all(|r| r.is_processed_by(ME)));
    }

    #[tokio::test]
    async fn non_matching_records_stay_queued() {
        let exchange = InMemoryMoveExchange::new();
        let mut sync = synchronizer(&exchange);
        sync.admit(peer_selection(2)).await;
        sync.admit(peer_selection(1)).await;

        let first = sync
            .next_matching(|record: &PublishedMoveRecord| record.payload.turn() == 1)
            .await;
        assert_eq!(first.payload.turn(), 1);
        let second = sync
            .claim(&|record: &PublishedMoveRecord| record.payload.turn() == 2)
            .await;
        assert!(second.is_some());
    }
}
