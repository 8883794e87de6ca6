use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use waypost::driver::{Action, Dispatch, Driver, NULL_ACTION_TYPE};
use waypost::error::ConfigurationError;
use waypost::middleware::{Enhancer, Flow, MetricsEnhancer};
use waypost::store::{MemoryStore, RootReducer, Store};

fn counter(action_type: &str, step: u32) -> Driver<u32> {
    Driver::new(action_type).with_reducer(move |state: Arc<u32>, _action| Arc::new(*state + step))
}

#[test]
fn test_routes_action_to_matching_reducer() {
    let drivers = [counter("ADD_ONE", 1), counter("ADD_TEN", 10)];
    let reducer = RootReducer::build(drivers.iter()).unwrap();

    let state = reducer.reduce(Arc::new(0), &Action::new("ADD_TEN"));
    assert_eq!(*state, 10);
    let state = reducer.reduce(state, &Action::new("ADD_ONE"));
    assert_eq!(*state, 11);
    assert_eq!(reducer.action_types(), vec!["ADD_ONE", "ADD_TEN"]);
}

#[test]
fn test_unknown_action_returns_same_state() {
    let drivers = [counter("ADD_ONE", 1)];
    let reducer = RootReducer::build(drivers.iter()).unwrap();

    let before = Arc::new(5);
    let after = reducer.reduce(Arc::clone(&before), &Action::new("SOMETHING_ELSE"));
    assert!(Arc::ptr_eq(&before, &after));
    assert!(!reducer.handles("SOMETHING_ELSE"));
}

#[test]
fn test_drivers_without_reducer_never_participate() {
    let drivers = [
        Driver::null(),
        Driver::new("ADD_ONE"),
        Driver::null(),
        counter("ADD_TWO", 2),
    ];
    let reducer = RootReducer::build(drivers.iter()).unwrap();
    assert!(!reducer.handles(NULL_ACTION_TYPE));
    assert!(!reducer.handles("ADD_ONE"));

    let before = Arc::new(1);
    let after = reducer.reduce(Arc::clone(&before), &Action::new("ADD_ONE"));
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_duplicate_reducer_types_rejected() {
    let drivers = [counter("ADD", 1), counter("ADD", 2)];
    assert_eq!(
        RootReducer::build(drivers.iter()).unwrap_err(),
        ConfigurationError::DuplicateActionType {
            action_type: "ADD".to_string()
        }
    );
}

#[test]
fn test_identity_reducer_ignores_everything() {
    let reducer = RootReducer::<u32>::identity();
    let before = Arc::new(3);
    assert!(Arc::ptr_eq(
        &before,
        &reducer.reduce(Arc::clone(&before), &Action::new("ANY"))
    ));
}

#[test]
fn test_store_notifies_only_on_change() {
    let drivers = [counter("ADD_ONE", 1)];
    let store = MemoryStore::new(RootReducer::build(drivers.iter()).unwrap(), 0u32, Vec::new());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(Arc::new(move |state: &Arc<u32>| sink.lock().push(**state)));

    store.dispatch(Action::new("ADD_ONE"));
    store.dispatch(Action::new("IGNORED"));
    store.dispatch(Action::new("ADD_ONE"));
    assert_eq!(*seen.lock(), vec![1, 2]);
    assert_eq!(*store.state(), 2);

    drop(subscription);
    store.dispatch(Action::new("ADD_ONE"));
    assert_eq!(seen.lock().len(), 2);
}

struct BlockList;

impl Enhancer<u32> for BlockList {
    fn before(&self, action: &Action, _state: &u32) -> Flow {
        if action.kind() == "BLOCKED" {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }
}

/// Follows every `LOAD` with a `LOADED`, the way a data-loading enhancer does
struct Loader {
    loads: AtomicUsize,
}

impl Enhancer<u32> for Loader {
    fn after(&self, action: &Action, _state: &u32, dispatch: &Dispatch) {
        if action.kind() == "LOAD" {
            self.loads.fetch_add(1, Ordering::SeqCst);
            dispatch.send(Action::new("LOADED"));
        }
    }
}

#[test]
fn test_enhancers_halt_and_follow_up() {
    let drivers = [counter("BLOCKED", 100), counter("LOADED", 1)];
    let metrics = Arc::new(MetricsEnhancer::new());
    let loader = Arc::new(Loader {
        loads: AtomicUsize::new(0),
    });
    let store = MemoryStore::new(
        RootReducer::build(drivers.iter()).unwrap(),
        0u32,
        vec![
            Arc::clone(&metrics) as Arc<dyn Enhancer<u32>>,
            Arc::new(BlockList) as Arc<dyn Enhancer<u32>>,
            Arc::clone(&loader) as Arc<dyn Enhancer<u32>>,
        ],
    );

    store.dispatch(Action::new("BLOCKED"));
    assert_eq!(*store.state(), 0);

    store.dispatch(Action::new("LOAD"));
    assert_eq!(*store.state(), 1);
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);

    // BLOCKED, LOAD and the follow-up LOADED all entered the store.
    assert_eq!(metrics.dispatched(), 3);
    assert_eq!(metrics.halted(), 1);
}
