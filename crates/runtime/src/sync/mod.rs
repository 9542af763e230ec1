//! Move synchronization between clients.
//!
//! A human participant's committed move is published to a shared
//! [`MoveExchange`]. Every other client reads it through a [`MoveFeed`]
//! (polling by default), applies it once, and marks it processed for its
//! own identity. There is no central authority: each client trusts the
//! records its peers publish.

mod error;
mod exchange;
mod feed;
mod file;
mod record;
mod synchronizer;

pub use error::ExchangeError;
pub use exchange::{InMemoryMoveExchange, MoveExchange};
pub use feed::{MoveFeed, PollingMoveFeed};
pub use file::FileMoveExchange;
pub use record::{MovePayload, PublishedMoveRecord, RecordId, RoundId, sort_by_publish_time};
pub use synchronizer::MoveSynchronizer;
