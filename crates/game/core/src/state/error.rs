//! Battle setup errors.

use crate::state::ParticipantId;

/// Errors raised while building a [`crate::state::BattleState`] from setup data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("a battle needs at least two participants (got {count})")]
    TooFewParticipants { count: usize },

    #[error("participant id {id} appears more than once")]
    DuplicateParticipant { id: ParticipantId },

    #[error("local participant {id} is missing or does not have the player role")]
    MissingLocalPlayer { id: ParticipantId },

    #[error("battle has no opponent")]
    NoOpponent,

    #[error("scripted defeat target {id} is not a participant")]
    UnknownScriptTarget { id: ParticipantId },
}
