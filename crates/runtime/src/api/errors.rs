//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, the move exchange,
//! and move providers so clients can bubble them up with consistent context.
use std::fmt;

use battle_core::{EngineError, ParticipantId, SetupError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::oracle::OverrideError;
pub use crate::repository::RepositoryError;
pub use crate::sync::ExchangeError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} move provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("{kind} move provider has no move left for {participant}")]
    ProviderExhausted {
        kind: ProviderKind,
        participant: ParticipantId,
    },

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a battle setup before building")]
    MissingSetup,

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("participant {participant} is peer-controlled but no move exchange is configured")]
    MissingExchange { participant: ParticipantId },

    #[error("participant {id} is not part of this battle")]
    UnknownParticipant { id: ParticipantId },

    #[error("invalid battle setup")]
    Setup(#[from] SetupError),

    #[error("battle engine rejected event")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Override(#[from] OverrideError),
}

/// Which provider slot a participant's moves come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Local,
    Cpu,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Local => "local",
            ProviderKind::Cpu => "cpu",
        };
        write!(f, "{}", label)
    }
}
