//! Shared error classification for battle-core.
//!
//! Domain errors live next to the code that raises them ([`EngineError`] in
//! the engine, [`SetupError`] in the state module). This module gives them a
//! common severity scale so the runtime can decide whether to log and carry
//! on or tear the battle down.

use crate::engine::EngineError;
use crate::state::SetupError;

/// Severity level of an error, used for recovery decisions and log levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The event arrived at the wrong time; a later event may succeed.
    Recoverable,
    /// The event or setup data is invalid and must not be retried unchanged.
    Validation,
    /// The battle cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, suitable for metrics and tests.
    fn error_code(&self) -> &'static str;
}

impl BattleError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        use EngineError::*;
        match self {
            BattleOver { .. } => ErrorSeverity::Fatal,
            UnexpectedEvent { .. } | DuplicateSelection { .. } | MissingSelection => {
                ErrorSeverity::Recoverable
            }
            UnknownParticipant { .. } | DefeatedParticipant { .. } | WrongActor { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            BattleOver { .. } => "ENGINE_BATTLE_OVER",
            UnexpectedEvent { .. } => "ENGINE_UNEXPECTED_EVENT",
            UnknownParticipant { .. } => "ENGINE_UNKNOWN_PARTICIPANT",
            DefeatedParticipant { .. } => "ENGINE_DEFEATED_PARTICIPANT",
            WrongActor { .. } => "ENGINE_WRONG_ACTOR",
            DuplicateSelection { .. } => "ENGINE_DUPLICATE_SELECTION",
            MissingSelection => "ENGINE_MISSING_SELECTION",
        }
    }
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use SetupError::*;
        match self {
            TooFewParticipants { .. } => "SETUP_TOO_FEW_PARTICIPANTS",
            DuplicateParticipant { .. } => "SETUP_DUPLICATE_PARTICIPANT",
            MissingLocalPlayer { .. } => "SETUP_MISSING_LOCAL_PLAYER",
            NoOpponent => "SETUP_NO_OPPONENT",
            UnknownScriptTarget { .. } => "SETUP_UNKNOWN_SCRIPT_TARGET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ParticipantId, Phase};

    #[test]
    fn timing_errors_are_recoverable() {
        let err = EngineError::UnexpectedEvent {
            phase: Phase::OpponentTurn,
            event: "select",
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "ENGINE_UNEXPECTED_EVENT");

        let over = EngineError::BattleOver {
            phase: Phase::Victory,
        };
        assert_eq!(over.severity(), ErrorSeverity::Fatal);

        let setup = SetupError::DuplicateParticipant {
            id: ParticipantId(2),
        };
        assert_eq!(setup.severity().as_str(), "validation");
    }
}
