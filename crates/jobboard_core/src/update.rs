use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only place the identifier queue is popped, so overlapping
/// load requests cannot pop the same identifiers twice.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.begin_ids_fetch() {
                vec![Effect::FetchJobIds]
            } else {
                Vec::new()
            }
        }
        Msg::JobIdsLoaded(ids) => {
            if state.apply_ids(ids) {
                // The first batch starts as soon as the queue is populated.
                start_batch(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::JobIdsFailed(reason) => {
            state.apply_ids_failure(reason);
            Vec::new()
        }
        Msg::LoadMoreClicked => start_batch(&mut state),
        Msg::BatchProgress { batch, fetched } => {
            state.apply_batch_progress(batch, fetched);
            Vec::new()
        }
        Msg::BatchLoaded { batch, entries } => {
            state.finish_batch(batch, entries);
            Vec::new()
        }
        Msg::EngineStopped(reason) => {
            state.halt(reason);
            Vec::new()
        }
    };

    (state, effects)
}

fn start_batch(state: &mut AppState) -> Vec<Effect> {
    match state.start_batch() {
        Some((batch, ids)) => vec![Effect::FetchBatch { batch, ids }],
        None => Vec::new(),
    }
}
