use std::fmt;

use serde::Deserialize;
use thiserror::Error;

pub type JobId = u64;
pub type BatchId = u64;

/// A job posting as returned by the item endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    pub by: String,
    pub time: i64,
}

pub type JobResult = Result<JobRecord, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub batch: BatchId,
    pub fetched: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobIdsFetched(Result<Vec<JobId>, FetchError>),
    Progress(BatchProgress),
    /// Results are in the order the identifiers were requested.
    BatchCompleted {
        batch: BatchId,
        results: Vec<(JobId, JobResult)>,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("http client setup failed: {0}")]
    Client(#[from] FetchError),
    #[error("engine thread stopped")]
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the expected JSON shape.
    Decode,
    /// The item endpoint answered `null`.
    Missing,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Missing => write!(f, "item not found"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
