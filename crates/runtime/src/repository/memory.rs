//! In-memory ResourceRepository implementation for tests and local runs.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use battle_core::{ParticipantId, ResourceDelta};

use super::error::{RepositoryError, Result};
use super::traits::{ResourceRepository, StoredResources};

/// In-memory implementation of [`ResourceRepository`].
///
/// Failures can be injected per participant or after a number of
/// successful writes.
#[derive(Debug, Default)]
pub struct InMemoryResourceRepository {
    records: RwLock<HashMap<ParticipantId, StoredResources>>,
    writes: RwLock<Vec<(ParticipantId, StoredResources)>>,
    failing: RwLock<HashSet<ParticipantId>>,
    fail_after: RwLock<Option<usize>>,
}

impl InMemoryResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every write for `participant`.
    pub fn fail_for(&self, participant: ParticipantId) {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(participant);
    }

    /// Fails every write once `successes` writes have gone through.
    pub fn fail_after(&self, successes: usize) {
        *self.fail_after.write().unwrap_or_else(PoisonError::into_inner) = Some(successes);
    }

    /// Successful writes in order.
    pub fn writes(&self) -> Vec<(ParticipantId, StoredResources)> {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn should_fail(&self, participant: ParticipantId) -> bool {
        if self
            .failing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&participant)
        {
            return true;
        }
        let limit = *self.fail_after.read().unwrap_or_else(PoisonError::into_inner);
        limit.is_some_and(|limit| {
            self.writes
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
                >= limit
        })
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn update_participant_resources(
        &self,
        participant: ParticipantId,
        delta: &ResourceDelta,
    ) -> Result<()> {
        if self.should_fail(participant) {
            return Err(RepositoryError::Unavailable(format!(
                "write for {participant} rejected"
            )));
        }
        let stored = StoredResources {
            health: delta.health_after,
            shield: delta.shield_after,
        };
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(participant, stored);
        self.writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((participant, stored));
        Ok(())
    }

    async fn load_resources(&self, participant: ParticipantId) -> Result<Option<StoredResources>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&participant)
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(id: u32, health_after: u32) -> ResourceDelta {
        ResourceDelta {
            participant: ParticipantId(id),
            shield: 0,
            health: -5,
            shield_after: 0,
            health_after,
        }
    }

    #[tokio::test]
    async fn stores_post_step_values() {
        let repo = InMemoryResourceRepository::new();
        repo.update_participant_resources(ParticipantId(1), &delta(1, 45))
            .await
            .unwrap();
        assert_eq!(
            repo.load_resources(ParticipantId(1)).await.unwrap(),
            Some(StoredResources {
                health: 45,
                shield: 0
            })
        );
        assert!(repo.load_resources(ParticipantId(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failures_reject_writes() {
        let repo = InMemoryResourceRepository::new();
        repo.fail_after(1);
        repo.update_participant_resources(ParticipantId(1), &delta(1, 45))
            .await
            .unwrap();
        assert!(
            repo.update_participant_resources(ParticipantId(1), &delta(1, 40))
                .await
                .is_err()
        );
        assert_eq!(repo.writes().len(), 1);
    }
}
