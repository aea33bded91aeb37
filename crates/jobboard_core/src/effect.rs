use crate::{BatchId, JobId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request the ordered list of job identifiers.
    FetchJobIds,
    /// Resolve exactly these identifiers, in order, as one batch.
    FetchBatch { batch: BatchId, ids: Vec<JobId> },
}
