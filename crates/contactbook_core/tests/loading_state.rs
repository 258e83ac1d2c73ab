use contactbook_core::{AppState, MemoryKeyValueStore, StateChange, StoreConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(1000);

fn open_state() -> AppState {
    AppState::init_with_store(
        StoreConfig::in_memory().with_loading_delay(DELAY),
        MemoryKeyValueStore::new(),
    )
    .unwrap()
}

#[test]
fn init_starts_loading_until_the_timer_fires() {
    let mut state = open_state();
    assert!(state.is_loading());

    let deadline = state.loading_deadline().unwrap();
    assert!(!state.tick_at(deadline - Duration::from_millis(1)));
    assert!(state.is_loading());

    assert!(state.tick_at(deadline));
    assert!(!state.is_loading());
    assert_eq!(state.loading_deadline(), None);
    assert!(!state.tick_at(deadline + DELAY));
}

#[test]
fn reinitialize_cancels_the_stale_timer() {
    let mut state = open_state();
    let t0 = Instant::now();
    state.initialize_at(t0);

    state.initialize_at(t0 + Duration::from_millis(600));
    assert!(!state.tick_at(t0 + DELAY));
    assert!(state.is_loading());

    assert!(state.tick_at(t0 + Duration::from_millis(1600)));
    assert!(!state.is_loading());
}

#[test]
fn refresh_reopens_the_loading_window_without_touching_data() {
    let mut state = open_state();
    let t0 = Instant::now();
    state.initialize_at(t0);
    state.tick_at(t0 + DELAY);
    let contacts = state.contacts();

    state.refresh_at(t0 + DELAY * 2);
    assert!(state.is_loading());
    assert!(std::sync::Arc::ptr_eq(&contacts, &state.contacts()));

    state.refresh_at(t0 + DELAY * 2 + Duration::from_millis(500));
    assert!(!state.tick_at(t0 + DELAY * 3));
    assert!(state.tick_at(t0 + DELAY * 3 + Duration::from_millis(500)));
    assert!(!state.is_loading());
}

#[test]
fn loading_transitions_are_published_once_each() {
    let mut state = open_state();
    let t0 = Instant::now();
    state.initialize_at(t0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    state.subscribe(move |change, view| {
        if let StateChange::Loading { is_loading } = change {
            assert_eq!(*is_loading, view.is_loading);
            sink.borrow_mut().push(*is_loading);
        }
    });

    state.refresh_at(t0 + Duration::from_millis(10));
    state.tick_at(t0 + DELAY * 2);
    state.tick_at(t0 + DELAY * 3);
    state.refresh_at(t0 + DELAY * 4);

    assert_eq!(*seen.borrow(), vec![false, true]);
}
