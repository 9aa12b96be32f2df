use collector_core::{FailureKind, JobFailure, Rejection, SourceError};
use thiserror::Error;

use crate::PersistError;

/// Transport-level failure of a single request attempt. Both kinds are retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timeout error")]
    Timeout,
    #[error("failed to open TCP connection")]
    Connection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("body exceeded {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("write failed: {0}")]
    Write(String),
}

impl From<PersistError> for FetchError {
    fn from(err: PersistError) -> Self {
        FetchError::Write(err.to_string())
    }
}

/// Failures that end a whole run rather than one job.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("parallel dispatch needs at least one worker and a non-zero queue capacity")]
    InvalidDispatch,
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<TransportError> for FailureKind {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => FailureKind::Timeout,
            TransportError::Connection => FailureKind::Connection,
        }
    }
}

impl From<ProbeError> for JobFailure {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Transport(transport) => JobFailure::Failed(transport.into()),
            ProbeError::TooManyRedirects { .. } => {
                JobFailure::Rejected(Rejection::TooManyRedirects)
            }
        }
    }
}

impl From<FetchError> for JobFailure {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport(transport) => JobFailure::Failed(transport.into()),
            FetchError::HttpStatus(status) => JobFailure::Failed(FailureKind::HttpStatus(status)),
            FetchError::TooLarge { max_bytes } => {
                JobFailure::Rejected(Rejection::TooLarge { max_bytes })
            }
            FetchError::Write(detail) => JobFailure::Failed(FailureKind::Write(detail)),
        }
    }
}
