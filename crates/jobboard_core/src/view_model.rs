use crate::{JobEntry, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdsView {
    #[default]
    Loading,
    Loaded {
        total: usize,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgressView {
    pub fetched: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub ids: IdsView,
    pub jobs: Vec<JobRowView>,
    /// True exactly while a batch is in flight.
    pub loading: bool,
    pub batch: Option<BatchProgressView>,
    pub remaining: usize,
    pub can_load_more: bool,
    /// Set once the engine has stopped; carries the reason.
    pub halted: Option<String>,
    pub failed_jobs: usize,
    pub dirty: bool,
}

impl AppViewModel {
    /// The listing loaded and nothing is left to show or fetch.
    pub fn is_empty_board(&self) -> bool {
        matches!(self.ids, IdsView::Loaded { total: 0 })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRowView {
    Job {
        id: JobId,
        title: String,
        url: Option<String>,
        by: String,
        time: i64,
    },
    Unavailable {
        id: JobId,
        reason: String,
    },
}

impl JobRowView {
    pub(crate) fn from_entry(entry: &JobEntry) -> Self {
        match entry {
            JobEntry::Loaded(record) => JobRowView::Job {
                id: record.id,
                title: record.title.clone(),
                url: record.url.clone(),
                by: record.by.clone(),
                time: record.time,
            },
            JobEntry::Failed { id, reason } => JobRowView::Unavailable {
                id: *id,
                reason: reason.clone(),
            },
        }
    }

    pub fn id(&self) -> JobId {
        match self {
            JobRowView::Job { id, .. } | JobRowView::Unavailable { id, .. } => *id,
        }
    }
}
