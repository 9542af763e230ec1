//! Repository contracts for externally owned participant resources.

use async_trait::async_trait;
use battle_core::{ParticipantId, ResourceDelta};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Persisted resource values for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredResources {
    pub health: u32,
    pub shield: u32,
}

/// Store that owns participant resources outside the battle.
///
/// Calls may be latency-bound. The runtime awaits each update before
/// moving on, and stops the remaining updates of a step after the first
/// failure.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Writes the post-step values carried by `delta`.
    async fn update_participant_resources(
        &self,
        participant: ParticipantId,
        delta: &ResourceDelta,
    ) -> Result<()>;

    /// Reads the stored values, if any.
    async fn load_resources(&self, participant: ParticipantId) -> Result<Option<StoredResources>>;
}
