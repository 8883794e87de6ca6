use futures::future::{AbortHandle, Abortable, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

use super::state::{Navigation, NavigationState};
use crate::driver::{Dispatch, DriverTask};
use crate::error::{FatalResolutionError, NavigationError};
use crate::history::{History, Location, Subscription};
use crate::ids::NavigationId;
use crate::render::{Renderer, Spawner};
use crate::router::{PageContext, Params, ResolveContext, Route, RouteTable};
use crate::store::{dispatcher, Store};

/// Orchestrates navigation: resolve the location, render the page, then activate
/// the route's driver
///
/// A failed navigation (no matching route, or a page that errors) is retried
/// against the error route; if that fails as well the navigation is fatal.
///
/// Navigations run one at a time. A location that arrives while another
/// navigation is in progress (a page redirecting through history while it
/// renders, for instance) is queued and processed once that navigation completes.
pub struct Router<S, V> {
    table: RouteTable<S, V>,
    store: Arc<dyn Store<S>>,
    history: Arc<dyn History>,
    renderer: Arc<dyn Renderer<V>>,
    spawner: Arc<dyn Spawner>,
    dispatch: Dispatch,
    state: Mutex<NavigationState>,
    queue: Mutex<NavigationQueue>,
    in_flight: Mutex<Option<AbortHandle>>,
    cancel_superseded: bool,
    started: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
}

impl<S, V> Router<S, V>
where
    S: Send + Sync + 'static,
    V: 'static,
{
    pub fn new(
        table: RouteTable<S, V>,
        store: Arc<dyn Store<S>>,
        history: Arc<dyn History>,
        renderer: Arc<dyn Renderer<V>>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        let dispatch = dispatcher(&store);
        Self {
            table,
            store,
            history,
            renderer,
            spawner,
            dispatch,
            state: Mutex::new(NavigationState::Idle),
            queue: Mutex::new(NavigationQueue::default()),
            in_flight: Mutex::new(None),
            cancel_superseded: true,
            started: AtomicBool::new(false),
            subscription: Mutex::new(None),
        }
    }

    /// Abort (`true`, the default) or keep an earlier navigation's pending driver
    /// task when a newer navigation begins
    #[must_use]
    pub fn cancel_superseded(mut self, cancel: bool) -> Self {
        self.cancel_superseded = cancel;
        self
    }

    /// Activate the initial driver, render the current location and follow history
    ///
    /// The initial driver is activated at most once, however often this is called.
    pub fn start(self: &Arc<Self>) -> Result<Option<Navigation>, FatalResolutionError> {
        if !self.started.swap(true, Ordering::SeqCst) {
            if let Some(driver) = self.table.initial_driver() {
                info!(action_type = %driver.action_type(), "Activating initial driver");
                if let DriverTask::Pending(task) =
                    driver.dispatch_action(&self.dispatch, &Params::new())
                {
                    self.spawner.spawn(task);
                }
            }
        } else {
            warn!("Router already started");
        }

        let location = self.history.location();
        let outcome = self.navigate(&location);

        let weak = Arc::downgrade(self);
        let subscription = self.history.listen(Arc::new(move |location: &Location| {
            let Some(router) = weak.upgrade() else {
                return;
            };
            if let Err(err) = router.navigate(location) {
                error!(path = %location.pathname, error = %err, "Navigation failed");
            }
        }));
        // Replacing an earlier subscription drops, and so unsubscribes, it.
        *self.subscription.lock() = Some(subscription);

        outcome
    }

    /// Stop following history changes
    pub fn stop(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.unsubscribe();
            debug!("Router stopped following history");
        }
    }

    /// Navigate to `location`
    ///
    /// Returns `Ok(None)` when another navigation is in progress: the location is
    /// queued and navigated to once the current navigation completes.
    pub fn navigate(
        &self,
        location: &Location,
    ) -> Result<Option<Navigation>, FatalResolutionError> {
        {
            let mut queue = self.queue.lock();
            if queue.busy {
                debug!(path = %location.pathname, "Navigation in progress, queueing");
                queue.pending.push_back(location.clone());
                return Ok(None);
            }
            queue.busy = true;
        }

        let outcome = self.run(location);
        self.drain();
        outcome.map(Some)
    }

    /// Run queued navigations until none are left, then accept new ones
    fn drain(&self) {
        loop {
            let next = {
                let mut queue = self.queue.lock();
                match queue.pending.pop_front() {
                    Some(location) => location,
                    None => {
                        queue.busy = false;
                        return;
                    }
                }
            };
            if let Err(err) = self.run(&next) {
                error!(path = %next.pathname, error = %err, "Queued navigation failed");
            }
        }
    }

    fn run(&self, location: &Location) -> Result<Navigation, FatalResolutionError> {
        let id = NavigationId::new();
        let span = info_span!("navigation", navigation_id = %id, path = %location.pathname);
        let _enter = span.enter();

        self.supersede();
        self.set_state(NavigationState::Resolving {
            id,
            path: location.pathname.clone(),
        });

        match self.try_route(id, location) {
            Ok(navigation) => Ok(navigation),
            Err(cause) => {
                warn!(
                    status = cause.status(),
                    error = %cause,
                    "Navigation failed, resolving error route"
                );
                self.fallback(id, location, cause).inspect_err(|err| {
                    error!(error = %err, "Error route failed");
                    self.set_state(NavigationState::Fatal {
                        id,
                        path: location.pathname.clone(),
                    });
                })
            }
        }
    }

    fn try_route(
        &self,
        id: NavigationId,
        location: &Location,
    ) -> Result<Navigation, NavigationError> {
        let ctx = ResolveContext::new(location.clone());
        let matched = self.table.resolve(&ctx)?;
        let view = self
            .page(matched.route, location, &matched.params, None)
            .map_err(|source| NavigationError::PageRender {
                path: location.pathname.clone(),
                route: matched.route.full_path().to_string(),
                source,
            })?;
        self.renderer.render(view);

        let pending = self.activate(matched.route, &matched.params);
        Ok(self.rendered(id, location, matched.route, matched.params, None, pending))
    }

    fn fallback(
        &self,
        id: NavigationId,
        location: &Location,
        cause: NavigationError,
    ) -> Result<Navigation, FatalResolutionError> {
        let status = cause.status();
        self.set_state(NavigationState::ErrorResolving {
            id,
            path: location.pathname.clone(),
            status,
        });

        let ctx = ResolveContext::failure(location.clone(), cause);
        let matched = match self.table.resolve(&ctx) {
            Ok(matched) => matched,
            Err(_) => {
                return Err(FatalResolutionError::ErrorRouteUnmatched {
                    cause: into_cause(ctx),
                })
            }
        };

        let view = match self.page(matched.route, location, &matched.params, ctx.error.as_ref()) {
            Ok(view) => view,
            Err(source) => {
                return Err(FatalResolutionError::ErrorPageFailed {
                    cause: into_cause(ctx),
                    source,
                })
            }
        };
        self.renderer.render(view);

        let pending = self.activate(matched.route, &matched.params);
        Ok(self.rendered(
            id,
            location,
            matched.route,
            matched.params,
            Some(status),
            pending,
        ))
    }

    fn page(
        &self,
        route: &Route<S, V>,
        location: &Location,
        params: &Params,
        error: Option<&NavigationError>,
    ) -> anyhow::Result<V> {
        route.page(&PageContext {
            store: &self.store,
            history: &self.history,
            location,
            params,
            error,
        })
    }

    /// Run the route's driver activation; returns whether a task was spawned
    fn activate(&self, route: &Route<S, V>, params: &Params) -> bool {
        let driver = route.driver();
        match driver.dispatch_action(&self.dispatch, params) {
            DriverTask::Done => false,
            DriverTask::Pending(task) => {
                debug!(action_type = %driver.action_type(), "Driver task spawned");
                self.spawner.spawn(self.track(task));
                true
            }
        }
    }

    fn track(&self, task: BoxFuture<'static, ()>) -> BoxFuture<'static, ()> {
        if !self.cancel_superseded {
            return task;
        }
        let (handle, registration) = AbortHandle::new_pair();
        *self.in_flight.lock() = Some(handle);
        Abortable::new(task, registration).map(|_| ()).boxed()
    }

    fn supersede(&self) {
        if let Some(handle) = self.in_flight.lock().take() {
            handle.abort();
            debug!("Superseded driver task aborted");
        }
    }

    fn rendered(
        &self,
        id: NavigationId,
        location: &Location,
        route: &Route<S, V>,
        params: Params,
        fallback: Option<u16>,
        pending: bool,
    ) -> Navigation {
        info!(
            route = %route.full_path(),
            fallback = ?fallback,
            pending,
            "Page rendered"
        );
        self.set_state(NavigationState::Rendered {
            id,
            path: location.pathname.clone(),
            route: route.full_path().to_string(),
            fallback: fallback.is_some(),
        });
        Navigation {
            id,
            path: location.pathname.clone(),
            route: route.full_path().to_string(),
            params,
            fallback,
            pending,
        }
    }

    fn set_state(&self, next: NavigationState) {
        debug!(state = %next, "Navigation state");
        *self.state.lock() = next;
    }

    /// Current navigation state
    #[must_use]
    pub fn state(&self) -> NavigationState {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable<S, V> {
        &self.table
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store<S>> {
        &self.store
    }

    #[must_use]
    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }
}

/// Locations waiting for the navigation in progress
#[derive(Default)]
struct NavigationQueue {
    busy: bool,
    pending: VecDeque<Location>,
}

fn into_cause(ctx: ResolveContext) -> NavigationError {
    ctx.error.unwrap_or_else(|| NavigationError::NotFound {
        path: ctx.location.pathname,
    })
}

impl<S, V> fmt::Debug for Router<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("table", &self.table)
            .field("state", &*self.state.lock())
            .field("cancel_superseded", &self.cancel_superseded)
            .finish()
    }
}
