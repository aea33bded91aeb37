use jobboard_core::{update, AppState, JobEntry, Msg};

#[test]
fn load_more_before_ids_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::LoadMoreClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn batch_messages_while_idle_are_noop() {
    let state = AppState::new();
    let (next, _) = update(state.clone(), Msg::BatchProgress { batch: 1, fetched: 1 });
    let (next, effects) = update(
        next,
        Msg::BatchLoaded {
            batch: 1,
            entries: vec![JobEntry::Failed {
                id: 1,
                reason: "late".to_string(),
            }],
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
