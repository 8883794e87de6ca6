use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

use super::{RootReducer, StateListener, Store};
use crate::driver::{Action, Dispatch};
use crate::history::Subscription;
use crate::middleware::{Enhancer, Flow};

/// In-process store built from `(reducer, initial_state, enhancers)`
///
/// Reducers run under the state lock and must not dispatch; enhancers' `after`
/// hooks and state listeners run with no lock held and may dispatch freely.
pub struct MemoryStore<S> {
    state: Mutex<Arc<S>>,
    reducer: RootReducer<S>,
    enhancers: Vec<Arc<dyn Enhancer<S>>>,
    listeners: Mutex<Vec<(u64, StateListener<S>)>>,
    next_listener: AtomicU64,
    this: Weak<Self>,
}

impl<S> MemoryStore<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(
        reducer: RootReducer<S>,
        initial_state: S,
        enhancers: Vec<Arc<dyn Enhancer<S>>>,
    ) -> Arc<Self> {
        debug!(enhancer_count = enhancers.len(), "Creating memory store");
        Arc::new_cyclic(|this| Self {
            state: Mutex::new(Arc::new(initial_state)),
            reducer,
            enhancers,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            this: Weak::clone(this),
        })
    }

    /// A store whose reducer ignores every action
    pub fn with_identity_reducer(initial_state: S) -> Arc<Self> {
        Self::new(RootReducer::identity(), initial_state, Vec::new())
    }

    fn dispatch_handle(&self) -> Dispatch {
        let this = Weak::clone(&self.this);
        Dispatch::new(move |action| {
            if let Some(store) = this.upgrade() {
                store.dispatch(action);
            }
        })
    }

    fn notify(&self, state: &Arc<S>) {
        let listeners: Vec<StateListener<S>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}

impl<S> Store<S> for MemoryStore<S>
where
    S: Send + Sync + 'static,
{
    fn dispatch(&self, action: Action) {
        let current = self.state();
        for enhancer in &self.enhancers {
            if enhancer.before(&action, &current) == Flow::Halt {
                debug!(action_type = %action.kind(), "Action halted by enhancer");
                return;
            }
        }
        drop(current);

        let (next, changed) = {
            let mut guard = self.state.lock();
            let previous = Arc::clone(&guard);
            let next = self.reducer.reduce(Arc::clone(&previous), &action);
            let changed = !Arc::ptr_eq(&previous, &next);
            *guard = Arc::clone(&next);
            (next, changed)
        };

        if changed {
            self.notify(&next);
        }

        if !self.enhancers.is_empty() {
            let dispatch = self.dispatch_handle();
            for enhancer in &self.enhancers {
                enhancer.after(&action, &next, &dispatch);
            }
        }
    }

    fn state(&self) -> Arc<S> {
        Arc::clone(&self.state.lock())
    }

    fn subscribe(&self, listener: StateListener<S>) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, listener));
        let this = Weak::clone(&self.this);
        Subscription::new(move || {
            if let Some(store) = this.upgrade() {
                store.listeners.lock().retain(|(lid, _)| *lid != id);
            }
        })
    }
}
