use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_info};

use crate::batch::{fetch_batch, BatchMode};
use crate::fetch::{FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use crate::{BatchId, EngineError, EngineEvent, JobId};

enum EngineCommand {
    FetchJobIds,
    FetchBatch { batch: BatchId, ids: Vec<JobId> },
}

/// Handle to the background fetch thread. Clones share the same thread and
/// the same event stream.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings, mode: BatchMode) -> Result<Self, EngineError> {
        board_info!(
            "Engine using {} (timeout {:?}, {:?} batches)",
            settings.base_url,
            settings.request_timeout,
            mode
        );
        let fetcher = ReqwestFetcher::new(settings)?;
        Self::with_fetcher(Arc::new(fetcher), mode)
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, mode: BatchMode) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(fetcher.as_ref(), mode, command, event_tx).await;
                });
            }
            board_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_job_ids(&self) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::FetchJobIds)
            .map_err(|_| EngineError::Stopped)
    }

    pub fn fetch_batch(&self, batch: BatchId, ids: Vec<JobId>) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::FetchBatch { batch, ids })
            .map_err(|_| EngineError::Stopped)
    }

    /// Waits up to `timeout` for the next event. `Disconnected` means the
    /// engine thread is gone.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        match self.event_rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(mpsc::RecvTimeoutError::Disconnected),
        }
    }
}

struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    mode: BatchMode,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchJobIds => {
            let result = fetcher.fetch_job_ids().await;
            let _ = event_tx.send(EngineEvent::JobIdsFetched(result));
        }
        EngineCommand::FetchBatch { batch, ids } => {
            let sink = ChannelProgressSink {
                tx: event_tx.clone(),
            };
            let results = fetch_batch(fetcher, batch, &ids, mode, &sink).await;
            let _ = event_tx.send(EngineEvent::BatchCompleted { batch, results });
        }
    }
}
