//! Errors raised when the reducer rejects an event.

use crate::state::{ParticipantId, Phase};

/// Errors surfaced while feeding an event to the battle engine.
///
/// A rejected event leaves the state untouched. Unknown moves and targets
/// inside an accepted selection are not errors; they resolve as no-ops.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("battle already ended in {phase}")]
    BattleOver { phase: Phase },

    #[error("{event} is not accepted during {phase}")]
    UnexpectedEvent { phase: Phase, event: &'static str },

    #[error("participant {id} is not in this battle")]
    UnknownParticipant { id: ParticipantId },

    #[error("participant {id} is defeated and cannot act")]
    DefeatedParticipant { id: ParticipantId },

    #[error("expected a move from {expected}, got one from {actual}")]
    WrongActor {
        expected: ParticipantId,
        actual: ParticipantId,
    },

    #[error("participant {id} already selected a move this round")]
    DuplicateSelection { id: ParticipantId },

    #[error("no move has been selected for execution")]
    MissingSelection,
}
