//! Job board engine: Hacker News API client and effect execution.
mod batch;
mod engine;
mod fetch;
mod types;

pub use batch::{fetch_batch, BatchMode};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ProgressSink, ReqwestFetcher, DEFAULT_BASE_URL};
pub use types::{
    BatchId, BatchProgress, EngineError, EngineEvent, FailureKind, FetchError, JobId, JobRecord,
    JobResult,
};
