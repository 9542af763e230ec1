//! Move-exchange channel contract and the in-memory implementation.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use battle_core::ParticipantId;

use super::error::ExchangeError;
use super::record::{PublishedMoveRecord, RecordId, RoundId};

/// Shared, independently readable store of published moves.
#[async_trait]
pub trait MoveExchange: Send + Sync {
    async fn publish_move(
        &self,
        round: &RoundId,
        record: PublishedMoveRecord,
    ) -> Result<(), ExchangeError>;

    /// Records in `round` that `observer` has not marked processed, in
    /// whatever order the channel returns them.
    async fn poll_unprocessed_moves(
        &self,
        round: &RoundId,
        observer: ParticipantId,
    ) -> Result<Vec<PublishedMoveRecord>, ExchangeError>;

    /// Idempotent: marking twice leaves one marker.
    async fn mark_processed(
        &self,
        record: &RecordId,
        observer: ParticipantId,
    ) -> Result<(), ExchangeError>;
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<PublishedMoveRecord>,
    failing_polls: usize,
}

/// Process-local exchange. Clones share the same records, so two runtimes
/// in one process can talk through it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMoveExchange {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryMoveExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` polls fail.
    pub fn fail_next_polls(&self, count: usize) {
        self.lock().failing_polls = count;
    }

    /// Every record ever published, with its markers.
    pub fn records(&self) -> Vec<PublishedMoveRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MoveExchange for InMemoryMoveExchange {
    async fn publish_move(
        &self,
        round: &RoundId,
        mut record: PublishedMoveRecord,
    ) -> Result<(), ExchangeError> {
        record.round = round.clone();
        self.lock().records.push(record);
        Ok(())
    }

    async fn poll_unprocessed_moves(
        &self,
        round: &RoundId,
        observer: ParticipantId,
    ) -> Result<Vec<PublishedMoveRecord>, ExchangeError> {
        let mut inner = self.lock();
        if inner.failing_polls > 0 {
            inner.failing_polls -= 1;
            return Err(ExchangeError::Unavailable("injected poll failure".into()));
        }
        Ok(inner
            .records
            .iter()
            .filter(|record| &record.round == round && !record.is_processed_by(observer))
            .cloned()
            .collect())
    }

    async fn mark_processed(
        &self,
        record: &RecordId,
        observer: ParticipantId,
    ) -> Result<(), ExchangeError> {
        let mut inner = self.lock();
        let stored = inner
            .records
            .iter_mut()
            .find(|stored| &stored.id == record)
            .ok_or_else(|| ExchangeError::UnknownRecord(record.to_string()))?;
        stored.mark_processed(observer);
        Ok(())
    }
}
