use tracing::{debug, info_span};

use super::{Enhancer, Flow};
use crate::driver::{Action, Dispatch};

/// Logs every action passing through the store
pub struct TracingEnhancer;

impl<S> Enhancer<S> for TracingEnhancer {
    fn before(&self, action: &Action, _state: &S) -> Flow {
        let span = info_span!("action", action_type = %action.kind());
        let _guard = span.enter();
        debug!(payload = %action.payload(), "Action dispatched");
        Flow::Continue
    }

    fn after(&self, action: &Action, _state: &S, _dispatch: &Dispatch) {
        debug!(action_type = %action.kind(), "Action reduced");
    }
}
