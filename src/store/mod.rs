//! # Store Module
//!
//! The application state lives in a single store. All mutation goes through
//! [`Store::dispatch`]: an action passes the store's enhancers, the
//! [`RootReducer`] turns the old state into the new one, and subscribers are told
//! when the state actually changed.
//!
//! The router only ever talks to a store through the [`Store`] trait, so any
//! container honouring that contract can be plugged in with
//! [`mount_with_store`](crate::app::mount_with_store). [`MemoryStore`] is the
//! in-process implementation used by [`mount`](crate::app::mount).

mod memory;
mod reducer;

pub use memory::MemoryStore;
pub use reducer::RootReducer;

use std::sync::Arc;

use crate::driver::{Action, Dispatch};
use crate::history::Subscription;

/// Callback invoked with the new state after a state-changing dispatch
pub type StateListener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// A reducer-driven state container
pub trait Store<S>: Send + Sync {
    /// Apply an action
    fn dispatch(&self, action: Action);
    /// Snapshot of the current state
    fn state(&self) -> Arc<S>;
    /// Observe state changes
    fn subscribe(&self, listener: StateListener<S>) -> Subscription;
}

/// A [`Dispatch`] handle that forwards into `store`
pub fn dispatcher<S: 'static>(store: &Arc<dyn Store<S>>) -> Dispatch {
    let store = Arc::clone(store);
    Dispatch::new(move |action| store.dispatch(action))
}
