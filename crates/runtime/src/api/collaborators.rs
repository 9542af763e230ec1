//! Outbound collaborators notified by the runtime.
use std::sync::Mutex;

use async_trait::async_trait;
use battle_core::{BattleOutcome, ParticipantId};

/// Receives terminal outcomes so rewards can be persisted.
#[async_trait]
pub trait ProgressionSink: Send + Sync {
    async fn on_battle_end(&self, outcome: &BattleOutcome);
}

/// Keeps every outcome it is handed; useful for tests and local runs.
#[derive(Default)]
pub struct RecordingProgression {
    outcomes: Mutex<Vec<BattleOutcome>>,
}

impl RecordingProgression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<BattleOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProgressionSink for RecordingProgression {
    async fn on_battle_end(&self, outcome: &BattleOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(*outcome);
    }
}

/// Plays the scripted-defeat cutscene and reports how it ended.
#[async_trait]
pub trait CutsceneDirector: Send + Sync {
    /// Returns true when the cutscene ends in victory for the local side.
    async fn play(&self, target: ParticipantId) -> bool;
}

/// Skips the cutscene with a fixed ending.
#[derive(Debug, Clone, Copy)]
pub struct SkipCutscene {
    pub victory: bool,
}

impl Default for SkipCutscene {
    fn default() -> Self {
        Self { victory: true }
    }
}

#[async_trait]
impl CutsceneDirector for SkipCutscene {
    async fn play(&self, _target: ParticipantId) -> bool {
        self.victory
    }
}
