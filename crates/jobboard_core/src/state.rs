use std::collections::VecDeque;

use crate::view_model::{AppViewModel, BatchProgressView, IdsView, JobRowView};

pub type JobId = u64;
pub type BatchId = u64;

/// Number of identifiers resolved per batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub url: Option<String>,
    pub by: String,
    /// Unix seconds.
    pub time: i64,
}

/// One slot of the displayed list. A failed fetch keeps its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEntry {
    Loaded(JobRecord),
    Failed { id: JobId, reason: String },
}

impl JobEntry {
    pub fn id(&self) -> JobId {
        match self {
            JobEntry::Loaded(record) => record.id,
            JobEntry::Failed { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdsStatus {
    #[default]
    NotStarted,
    Loading,
    Loaded {
        total: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardPhase {
    #[default]
    Idle,
    Loading {
        batch: BatchId,
        size: usize,
        fetched: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    batch_size: usize,
    ids: IdsStatus,
    queue: VecDeque<JobId>,
    jobs: Vec<JobEntry>,
    phase: BoardPhase,
    next_batch: BatchId,
    halted: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero batch size is clamped to one so every batch makes progress.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            ids: IdsStatus::NotStarted,
            queue: VecDeque::new(),
            jobs: Vec::new(),
            phase: BoardPhase::Idle,
            next_batch: 1,
            halted: None,
            dirty: false,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn ids_status(&self) -> &IdsStatus {
        &self.ids
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, BoardPhase::Loading { .. })
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_ids(&self) -> impl Iterator<Item = JobId> + '_ {
        self.queue.iter().copied()
    }

    pub fn jobs(&self) -> &[JobEntry] {
        &self.jobs
    }

    /// Why the engine stopped, once it has.
    pub fn halted(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub fn can_load_more(&self) -> bool {
        self.halted.is_none() && !self.is_loading() && !self.queue.is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        let ids = match &self.ids {
            IdsStatus::NotStarted | IdsStatus::Loading => IdsView::Loading,
            IdsStatus::Loaded { total } => IdsView::Loaded { total: *total },
            IdsStatus::Failed(reason) => IdsView::Failed {
                reason: reason.clone(),
            },
        };
        let batch = match self.phase {
            BoardPhase::Idle => None,
            BoardPhase::Loading { size, fetched, .. } => Some(BatchProgressView { fetched, size }),
        };
        AppViewModel {
            ids,
            jobs: self.jobs.iter().map(JobRowView::from_entry).collect(),
            loading: self.is_loading(),
            batch,
            remaining: self.queue.len(),
            can_load_more: self.can_load_more(),
            halted: self.halted.clone(),
            failed_jobs: self
                .jobs
                .iter()
                .filter(|entry| matches!(entry, JobEntry::Failed { .. }))
                .count(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_ids_fetch(&mut self) -> bool {
        if self.ids != IdsStatus::NotStarted {
            return false;
        }
        self.ids = IdsStatus::Loading;
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_ids(&mut self, ids: Vec<JobId>) -> bool {
        if self.ids != IdsStatus::Loading {
            return false;
        }
        self.ids = IdsStatus::Loaded { total: ids.len() };
        self.queue.extend(ids);
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_ids_failure(&mut self, reason: String) -> bool {
        if self.ids != IdsStatus::Loading {
            return false;
        }
        self.ids = IdsStatus::Failed(reason);
        self.mark_dirty();
        true
    }

    /// Pops the next batch off the front of the queue and enters `Loading`.
    /// Returns `None` while a batch is in flight or when nothing is left.
    pub(crate) fn start_batch(&mut self) -> Option<(BatchId, Vec<JobId>)> {
        if !self.can_load_more() {
            return None;
        }
        let take = self.batch_size.min(self.queue.len());
        let ids: Vec<JobId> = self.queue.drain(..take).collect();
        let batch = self.next_batch;
        self.next_batch += 1;
        self.phase = BoardPhase::Loading {
            batch,
            size: ids.len(),
            fetched: 0,
        };
        self.mark_dirty();
        Some((batch, ids))
    }

    pub(crate) fn apply_batch_progress(&mut self, batch: BatchId, fetched: usize) {
        if let BoardPhase::Loading {
            batch: current,
            size,
            fetched: done,
        } = &mut self.phase
        {
            let fetched = fetched.min(*size);
            if *current == batch && fetched != *done {
                *done = fetched;
                self.dirty = true;
            }
        }
    }

    /// Abandons whatever was in flight. An unfinished identifier fetch
    /// becomes a failure and an unfinished batch is dropped.
    pub(crate) fn halt(&mut self, reason: String) {
        if self.halted.is_some() {
            return;
        }
        if matches!(self.ids, IdsStatus::NotStarted | IdsStatus::Loading) {
            self.ids = IdsStatus::Failed(reason.clone());
        }
        self.phase = BoardPhase::Idle;
        self.halted = Some(reason);
        self.mark_dirty();
    }

    /// Appends a finished batch and returns to `Idle`. Results for any batch
    /// other than the one in flight are dropped.
    pub(crate) fn finish_batch(&mut self, batch: BatchId, entries: Vec<JobEntry>) -> bool {
        match self.phase {
            BoardPhase::Loading { batch: current, .. } if current == batch => {
                self.jobs.extend(entries);
                self.phase = BoardPhase::Idle;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }
}
