//! Event types for different topics.

use battle_core::{BattleOutcome, ParticipantId, Phase};
use serde::{Deserialize, Serialize};

/// One battle log line, in the order it was appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub turn: u32,
    pub line: String,
}

/// Phase change of the local battle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub from: Phase,
    pub to: Phase,
    pub turn: u32,
    /// Participant the next action belongs to, when known.
    pub acting: Option<ParticipantId>,
}

/// Terminal settlement of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub outcome: BattleOutcome,
}
