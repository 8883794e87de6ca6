use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Enhancer, Flow};
use crate::driver::{Action, Dispatch};

/// Counts actions flowing through the store
///
/// All counters are atomics, so one instance can be shared across stores and read
/// from any thread. Register it ahead of any enhancer that may halt actions so
/// `dispatched` sees every action.
#[derive(Default)]
pub struct MetricsEnhancer {
    dispatched: AtomicUsize,
    reduced: AtomicUsize,
}

impl MetricsEnhancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions that entered the store
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Actions that reached the reducer (not halted by an earlier enhancer)
    pub fn reduced(&self) -> usize {
        self.reduced.load(Ordering::Relaxed)
    }

    /// Actions stopped before the reducer
    pub fn halted(&self) -> usize {
        self.dispatched().saturating_sub(self.reduced())
    }
}

impl<S> Enhancer<S> for MetricsEnhancer {
    fn before(&self, _action: &Action, _state: &S) -> Flow {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        Flow::Continue
    }

    fn after(&self, _action: &Action, _state: &S, _dispatch: &Dispatch) {
        self.reduced.fetch_add(1, Ordering::Relaxed);
    }
}
