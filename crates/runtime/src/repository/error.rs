//! Error types raised by repository implementations.

use battle_core::ParticipantId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("resource store unavailable: {0}")]
    Unavailable(String),

    #[error("participant {0} has no stored resources")]
    UnknownParticipant(ParticipantId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
