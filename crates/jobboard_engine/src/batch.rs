use std::sync::atomic::{AtomicUsize, Ordering};

use board_logging::{board_debug, board_warn};
use futures_util::future::join_all;

use crate::fetch::{Fetcher, ProgressSink};
use crate::{BatchId, BatchProgress, EngineEvent, JobId, JobResult};

/// How the identifiers of one batch are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// One request at a time, in pop order.
    #[default]
    Sequential,
    /// All requests of the batch in flight at once, joined before returning.
    Concurrent,
}

/// Resolves every identifier of a batch. A failed fetch does not stop the
/// rest of the batch; results come back in the order of `ids` regardless of
/// mode.
pub async fn fetch_batch(
    fetcher: &dyn Fetcher,
    batch: BatchId,
    ids: &[JobId],
    mode: BatchMode,
    sink: &dyn ProgressSink,
) -> Vec<(JobId, JobResult)> {
    board_debug!("Batch {} fetching {} jobs ({:?})", batch, ids.len(), mode);
    let total = ids.len();
    let fetched = AtomicUsize::new(0);
    let report = |job_id: JobId, result: &JobResult| {
        if let Err(err) = result {
            board_warn!("Batch {} job {} failed: {}", batch, job_id, err);
        }
        let done = fetched.fetch_add(1, Ordering::Relaxed) + 1;
        sink.emit(EngineEvent::Progress(BatchProgress {
            batch,
            fetched: done,
            total,
        }));
    };

    match mode {
        BatchMode::Sequential => {
            let mut results = Vec::with_capacity(total);
            for &job_id in ids {
                let result = fetcher.fetch_job(job_id).await;
                report(job_id, &result);
                results.push((job_id, result));
            }
            results
        }
        BatchMode::Concurrent => {
            let report = &report;
            join_all(ids.iter().map(|&job_id| async move {
                let result = fetcher.fetch_job(job_id).await;
                report(job_id, &result);
                (job_id, result)
            }))
            .await
        }
    }
}
