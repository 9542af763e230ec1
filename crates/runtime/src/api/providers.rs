//! Asynchronous abstraction for sourcing participant intent.
//!
//! Runtime users plug in [`MoveProvider`] implementations so a battle can run
//! with human input, scripted fixtures, or the CPU heuristic.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use battle_core::{BattleState, MoveSelection, ParticipantId};

use super::errors::{ProviderKind, Result, RuntimeError};

/// Trait for choosing a move for one participant.
///
/// Different implementations can handle:
/// - Local player input (from UI/CLI)
/// - CPU heuristic decisions
/// - Scripted selections for tests and replays
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Choose a move for `actor` from a read-only snapshot of the battle.
    async fn provide_move(&self, actor: ParticipantId, state: &BattleState)
    -> Result<MoveSelection>;
}

/// Replays a fixed list of selections in order.
///
/// The actor of each queued selection is replaced with the requested actor,
/// so one script can drive whichever participant asks.
pub struct ScriptedMoveProvider {
    kind: ProviderKind,
    queue: Mutex<VecDeque<MoveSelection>>,
}

impl ScriptedMoveProvider {
    pub fn new(kind: ProviderKind, selections: impl IntoIterator<Item = MoveSelection>) -> Self {
        Self {
            kind,
            queue: Mutex::new(selections.into_iter().collect()),
        }
    }

    /// Selections not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl MoveProvider for ScriptedMoveProvider {
    async fn provide_move(
        &self,
        actor: ParticipantId,
        _state: &BattleState,
    ) -> Result<MoveSelection> {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        let mut selection = next.ok_or(RuntimeError::ProviderExhausted {
            kind: self.kind,
            participant: actor,
        })?;
        selection.actor = actor;
        Ok(selection)
    }
}
