use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::history::History;
use crate::middleware::Enhancer;
use crate::router::Params;

/// Action type carried by [`Driver::null`]; never reduced.
pub const NULL_ACTION_TYPE: &str = "@@waypost/NULL";

/// A state transition request
///
/// Serialized as `{"type": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl Action {
    /// An action with a `null` payload
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// The action type tag
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Cloneable handle that forwards actions into a store
#[derive(Clone)]
pub struct Dispatch {
    inner: Arc<dyn Fn(Action) + Send + Sync>,
}

impl Dispatch {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Action) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Send an action to the store
    pub fn send(&self, action: Action) {
        (self.inner)(action);
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch")
    }
}

/// Outcome of activating a driver
///
/// A pending task completes independently of the navigation that started it; the
/// router hands it to its [`Spawner`](crate::render::Spawner) and moves on.
pub enum DriverTask {
    /// Activation finished synchronously
    Done,
    /// Activation continues in the background (e.g. a fetch that dispatches on completion)
    Pending(BoxFuture<'static, ()>),
}

impl DriverTask {
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        DriverTask::Pending(Box::pin(fut))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, DriverTask::Pending(_))
    }
}

impl fmt::Debug for DriverTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverTask::Done => f.write_str("Done"),
            DriverTask::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// State transition for one action type. Returning the input `Arc` means "unchanged".
pub type ReducerFn<S> = Arc<dyn Fn(Arc<S>, &Action) -> Arc<S> + Send + Sync>;

/// Called once a driver's route becomes active.
pub type ActivateFn = Arc<dyn Fn(&Dispatch, &Params) -> DriverTask + Send + Sync>;

/// Produces the store enhancer a driver contributes.
pub type EnhancerFactory<S> =
    Arc<dyn Fn(&EnhancerContext<'_>) -> Arc<dyn Enhancer<S>> + Send + Sync>;

/// Produces a fresh driver; invoked exactly once per configuration entry.
pub type DriverFactory<S> = Arc<dyn Fn() -> Driver<S> + Send + Sync>;

/// What an enhancer factory is told about the entry it belongs to
pub struct EnhancerContext<'a> {
    /// Mounted path of the entry, `None` for in-page drivers
    pub full_path: Option<&'a str>,
    /// Navigation history shared with the router
    pub history: &'a Arc<dyn History>,
}

/// The capabilities a route (or in-page action) contributes
///
/// Every capability is an explicit optional field: a driver without a reducer never
/// participates in reduction, one without an enhancer adds nothing to the store, and
/// one without an activation does nothing when its route becomes active.
///
/// ```
/// use std::sync::Arc;
/// use waypost::driver::{Action, Driver, DriverTask};
///
/// let driver: Driver<u32> = Driver::new("INCREMENT")
///     .with_reducer(|state, _action| Arc::new(*state + 1))
///     .on_activate(|dispatch, _params| {
///         dispatch.send(Action::new("INCREMENT"));
///         DriverTask::Done
///     });
/// assert!(driver.has_reducer());
/// ```
pub struct Driver<S> {
    action_type: Arc<str>,
    reducer: Option<ReducerFn<S>>,
    enhancer: Option<EnhancerFactory<S>>,
    activate: Option<ActivateFn>,
}

impl<S> Driver<S> {
    /// A driver for `action_type` with no capabilities yet
    pub fn new(action_type: impl AsRef<str>) -> Self {
        Self {
            action_type: Arc::from(action_type.as_ref()),
            reducer: None,
            enhancer: None,
            activate: None,
        }
    }

    /// The identity driver: no reducer, no enhancer, activation is a no-op
    #[must_use]
    pub fn null() -> Self {
        Self::new(NULL_ACTION_TYPE)
    }

    #[must_use]
    pub fn with_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(Arc<S>, &Action) -> Arc<S> + Send + Sync + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    #[must_use]
    pub fn with_enhancer<F>(mut self, factory: F) -> Self
    where
        F: Fn(&EnhancerContext<'_>) -> Arc<dyn Enhancer<S>> + Send + Sync + 'static,
    {
        self.enhancer = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn on_activate<F>(mut self, activate: F) -> Self
    where
        F: Fn(&Dispatch, &Params) -> DriverTask + Send + Sync + 'static,
    {
        self.activate = Some(Arc::new(activate));
        self
    }

    /// Activation that runs as a background task
    ///
    /// The closure runs synchronously during activation and returns the future that
    /// will be spawned.
    #[must_use]
    pub fn on_activate_async<F, Fut>(self, activate: F) -> Self
    where
        F: Fn(Dispatch, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_activate(move |dispatch, params| {
            DriverTask::pending(activate(dispatch.clone(), params.clone()))
        })
    }

    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    #[must_use]
    pub fn has_reducer(&self) -> bool {
        self.reducer.is_some()
    }

    #[must_use]
    pub fn reducer(&self) -> Option<&ReducerFn<S>> {
        self.reducer.as_ref()
    }

    #[must_use]
    pub fn enhancer_factory(&self) -> Option<&EnhancerFactory<S>> {
        self.enhancer.as_ref()
    }

    /// Apply this driver's reducer, or hand the state back untouched
    pub fn reduce(&self, state: Arc<S>, action: &Action) -> Arc<S> {
        match &self.reducer {
            Some(reducer) => reducer(state, action),
            None => state,
        }
    }

    /// Trigger the driver's data loading for a freshly activated route
    pub fn dispatch_action(&self, dispatch: &Dispatch, params: &Params) -> DriverTask {
        match &self.activate {
            Some(activate) => activate(dispatch, params),
            None => DriverTask::Done,
        }
    }
}

impl<S> Default for Driver<S> {
    fn default() -> Self {
        Self::null()
    }
}

impl<S> fmt::Debug for Driver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("action_type", &self.action_type)
            .field("reducer", &self.reducer.is_some())
            .field("enhancer", &self.enhancer.is_some())
            .field("activate", &self.activate.is_some())
            .finish()
    }
}

/// Factory for [`Driver::null`]
#[must_use]
pub fn null_driver_factory<S: 'static>() -> DriverFactory<S> {
    Arc::new(Driver::null)
}
