use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::driver::{Action, Driver, ReducerFn};
use crate::error::ConfigurationError;

/// The application's single state-transition function
///
/// Built from every driver that declares a reducer, keyed by the driver's action
/// type. Actions with any other type leave the state untouched: the very same `Arc`
/// comes back, so callers can detect "no change" with [`Arc::ptr_eq`].
pub struct RootReducer<S> {
    reducers: HashMap<Arc<str>, ReducerFn<S>>,
}

impl<S> RootReducer<S> {
    /// A reducer that ignores every action
    #[must_use]
    pub fn identity() -> Self {
        Self {
            reducers: HashMap::new(),
        }
    }

    /// Compose the reducers of `drivers`
    ///
    /// Two reducer-bearing drivers with the same action type are rejected; drivers
    /// without a reducer are skipped whatever their type.
    pub fn build<'a, I>(drivers: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = &'a Driver<S>>,
        S: 'a,
    {
        let mut reducers: HashMap<Arc<str>, ReducerFn<S>> = HashMap::new();
        for driver in drivers {
            let Some(reducer) = driver.reducer() else {
                continue;
            };
            let action_type: Arc<str> = Arc::from(driver.action_type());
            if reducers.contains_key(&action_type) {
                return Err(ConfigurationError::DuplicateActionType {
                    action_type: action_type.to_string(),
                });
            }
            reducers.insert(action_type, Arc::clone(reducer));
        }

        info!(
            reducer_count = reducers.len(),
            action_types = ?reducers.keys().collect::<Vec<_>>(),
            "Root reducer composed"
        );
        Ok(Self { reducers })
    }

    /// Apply the reducer registered for `action`'s type, if any
    pub fn reduce(&self, state: Arc<S>, action: &Action) -> Arc<S> {
        match self.reducers.get(action.kind()) {
            Some(reducer) => reducer(state, action),
            None => {
                debug!(action_type = %action.kind(), "No reducer for action type");
                state
            }
        }
    }

    /// Whether some driver reduces this action type
    #[must_use]
    pub fn handles(&self, action_type: &str) -> bool {
        self.reducers.contains_key(action_type)
    }

    /// Registered action types, sorted
    #[must_use]
    pub fn action_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.reducers.keys().map(|k| k.as_ref()).collect();
        types.sort_unstable();
        types
    }
}

impl<S> Clone for RootReducer<S> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S> fmt::Debug for RootReducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootReducer")
            .field("action_types", &self.action_types())
            .finish()
    }
}
