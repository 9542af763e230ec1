use thiserror::Error;

/// Failures talking to the move-exchange channel.
///
/// Read failures are transient: the polling feed swallows them and tries
/// again on the next interval.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("move exchange unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed move record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown move record {0}")]
    UnknownRecord(String),
}
