use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_error, board_info};
use jobboard_core::{Effect, JobEntry, JobRecord, Msg};
use jobboard_engine::{
    BatchMode, EngineError, EngineEvent, EngineHandle, FetchSettings, JobId, JobResult,
};

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: FetchSettings,
        mode: BatchMode,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, mode)?;
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchJobIds => {
                    board_info!("Fetching job ids");
                    if let Err(err) = self.engine.fetch_job_ids() {
                        board_error!("Could not request job ids: {}", err);
                    }
                }
                Effect::FetchBatch { batch, ids } => {
                    board_info!("Batch {} requested for ids {:?}", batch, ids);
                    if let Err(err) = self.engine.fetch_batch(batch, ids) {
                        board_error!("Could not request batch {}: {}", batch, err);
                    }
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    if msg_tx.send(map_event(event)).is_err() {
                        board_debug!("Message channel closed; stopping engine event loop");
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    board_error!("Engine stopped; no further results will arrive");
                    break;
                }
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobIdsFetched(Ok(ids)) => {
            board_info!("Received {} job ids", ids.len());
            Msg::JobIdsLoaded(ids)
        }
        EngineEvent::JobIdsFetched(Err(err)) => {
            board_error!("Error fetching job ids: {}", err);
            Msg::JobIdsFailed(err.kind.to_string())
        }
        EngineEvent::Progress(progress) => Msg::BatchProgress {
            batch: progress.batch,
            fetched: progress.fetched,
        },
        EngineEvent::BatchCompleted { batch, results } => {
            let entries: Vec<JobEntry> = results.into_iter().map(map_result).collect();
            let failed = entries
                .iter()
                .filter(|entry| matches!(entry, JobEntry::Failed { .. }))
                .count();
            board_info!(
                "Batch {} done: {} loaded, {} failed",
                batch,
                entries.len() - failed,
                failed
            );
            Msg::BatchLoaded { batch, entries }
        }
    }
}

fn map_result((job_id, result): (JobId, JobResult)) -> JobEntry {
    match result {
        Ok(record) => JobEntry::Loaded(JobRecord {
            id: record.id,
            title: record.title,
            url: record.url,
            by: record.by,
            time: record.time,
        }),
        Err(err) => JobEntry::Failed {
            id: job_id,
            reason: err.kind.to_string(),
        },
    }
}
