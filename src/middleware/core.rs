use crate::driver::{Action, Dispatch};

/// Whether a dispatched action continues on to the reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Drop the action; the reducer and later `before` hooks never see it
    Halt,
}

/// A store enhancer: hooks run around every dispatched action
///
/// `before` sees the action and the state it is about to be applied to. `after`
/// runs once the reducer has produced the new state and may dispatch follow-up
/// actions (e.g. kick off a fetch when a `LOAD` action goes through).
pub trait Enhancer<S>: Send + Sync {
    fn before(&self, _action: &Action, _state: &S) -> Flow {
        Flow::Continue
    }
    fn after(&self, _action: &Action, _state: &S, _dispatch: &Dispatch) {}
}
