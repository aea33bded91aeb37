#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The board was mounted; fetch the identifier list.
    Started,
    /// Identifier list arrived.
    JobIdsLoaded(Vec<crate::JobId>),
    /// Identifier list could not be fetched.
    JobIdsFailed(String),
    /// User asked for the next batch.
    LoadMoreClicked,
    /// Engine resolved `fetched` identifiers of an in-flight batch.
    BatchProgress { batch: crate::BatchId, fetched: usize },
    /// Engine finished a batch; entries are in pop order.
    BatchLoaded {
        batch: crate::BatchId,
        entries: Vec<crate::JobEntry>,
    },
    /// The engine is gone; nothing in flight will ever complete.
    EngineStopped(String),
}
