//! Job board core: pure pagination state machine and view-model helpers.
mod effect;
mod format;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use format::{format_date, format_time};
pub use msg::Msg;
pub use state::{
    AppState, BatchId, BoardPhase, IdsStatus, JobEntry, JobId, JobRecord, DEFAULT_BATCH_SIZE,
};
pub use update::update;
pub use view_model::{AppViewModel, BatchProgressView, IdsView, JobRowView};
