use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::mountpath::{normalize, normalize_mountpath};
use super::pattern::{Params, PathPattern, PatternOptions};
use crate::config::AppConfig;
use crate::driver::{Driver, EnhancerContext};
use crate::error::{ConfigurationError, NavigationError, PatternError};
use crate::history::{History, Location};
use crate::middleware::Enhancer;
use crate::store::{RootReducer, Store};

/// Route path of the synthesized error route, relative to the mount path
pub const ERROR_ROUTE_PATH: &str = "/error";

/// What a page renderer is handed
pub struct PageContext<'a, S> {
    /// The application store
    pub store: &'a Arc<dyn Store<S>>,
    /// Navigation history, for pages that link onwards
    pub history: &'a Arc<dyn History>,
    /// The location being rendered
    pub location: &'a Location,
    /// Parameters extracted for this route
    pub params: &'a Params,
    /// Why the error route is being rendered; `None` for ordinary routes
    pub error: Option<&'a NavigationError>,
}

impl<S> PageContext<'_, S> {
    /// Snapshot of the current application state
    #[must_use]
    pub fn state(&self) -> Arc<S> {
        self.store.state()
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Produces the view for a route. Failing here sends the navigation to the error route.
pub type Page<S, V> = Arc<dyn Fn(&PageContext<'_, S>) -> anyhow::Result<V> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// A configured route
    Page,
    /// The synthesized `<mountpath>/error` route
    Error,
}

/// A compiled path pattern bound to a page and a driver
pub struct Route<S, V> {
    name: Option<String>,
    full_path: String,
    pattern: PathPattern,
    page: Page<S, V>,
    driver: Arc<Driver<S>>,
    kind: RouteKind,
}

impl<S, V> Route<S, V> {
    /// Mount `route_path` under `mountpath` and compile it
    pub fn new(
        mountpath: Option<&str>,
        route_path: Option<&str>,
        page: Page<S, V>,
        driver: Driver<S>,
        options: PatternOptions,
    ) -> Result<Self, PatternError> {
        Self::build(mountpath, route_path, page, Arc::new(driver), options, RouteKind::Page)
    }

    fn build(
        mountpath: Option<&str>,
        route_path: Option<&str>,
        page: Page<S, V>,
        driver: Arc<Driver<S>>,
        options: PatternOptions,
        kind: RouteKind,
    ) -> Result<Self, PatternError> {
        let full_path = normalize(mountpath, route_path);
        let pattern = PathPattern::compile(&full_path, options)?;
        Ok(Self {
            name: None,
            full_path,
            pattern,
            page,
            driver,
            kind,
        })
    }

    #[must_use]
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Mount path + route path, fixed for the route's lifetime
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn driver(&self) -> &Arc<Driver<S>> {
        &self.driver
    }

    #[must_use]
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == RouteKind::Error
    }

    /// Match a path against this route, extracting its parameters
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        self.pattern.captures(path)
    }

    /// Invoke the page renderer
    pub fn page(&self, ctx: &PageContext<'_, S>) -> anyhow::Result<V> {
        (self.page)(ctx)
    }
}

impl<S, V> fmt::Debug for Route<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("full_path", &self.full_path)
            .field("kind", &self.kind)
            .field("driver", &self.driver)
            .finish()
    }
}

/// Result of resolving a location: the route and this location's parameters
///
/// Built fresh for every resolution; parameters belong to one location only.
pub struct RouteMatch<'a, S, V> {
    pub route: &'a Route<S, V>,
    pub params: Params,
}

impl<S, V> fmt::Debug for RouteMatch<'_, S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route.full_path)
            .field("params", &self.params)
            .finish()
    }
}

/// The input of one resolution attempt
#[derive(Debug)]
pub struct ResolveContext {
    pub location: Location,
    /// Set when re-resolving after a failed navigation
    pub error: Option<NavigationError>,
}

impl ResolveContext {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            error: None,
        }
    }

    /// Context for re-resolving `location` against the error route
    pub fn failure(location: Location, error: NavigationError) -> Self {
        Self {
            location,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

struct DriverEntry<S> {
    full_path: Option<String>,
    driver: Arc<Driver<S>>,
}

/// The ordered set of routes an application can navigate to
///
/// Routes are tried in registration order and the first match wins; the
/// synthesized error route always comes last.
pub struct RouteTable<S, V> {
    mountpath: String,
    routes: Vec<Route<S, V>>,
    error_route: Route<S, V>,
    drivers: Vec<DriverEntry<S>>,
    initial: Option<Arc<Driver<S>>>,
}

impl<S, V> RouteTable<S, V> {
    /// Build the table from an application configuration
    ///
    /// Every driver factory is invoked exactly once, in configuration order. Fails
    /// on the first malformed entry, before any navigation can happen.
    pub fn build(config: &AppConfig<S, V>) -> Result<Self, ConfigurationError> {
        let mountpath = normalize_mountpath(config.mountpath.as_deref());
        let mut routes = Vec::new();
        let mut drivers = Vec::with_capacity(config.actions.len() + 1);
        let mut initial: Option<(usize, Arc<Driver<S>>)> = None;

        for (index, entry) in config.actions.iter().enumerate() {
            let entry = entry
                .as_ref()
                .ok_or(ConfigurationError::MissingEntry { index })?;

            let driver = Arc::new(
                entry
                    .driver
                    .as_ref()
                    .map_or_else(Driver::null, |factory| factory()),
            );

            if entry.initial {
                if let Some((first, _)) = &initial {
                    return Err(ConfigurationError::MultipleInitial {
                        first: *first,
                        second: index,
                    });
                }
                initial = Some((index, Arc::clone(&driver)));
            }

            let Some(route_path) = entry.route.as_deref() else {
                debug!(
                    index,
                    action_type = %driver.action_type(),
                    "In-page driver registered"
                );
                drivers.push(DriverEntry {
                    full_path: None,
                    driver,
                });
                continue;
            };

            let page = entry.page.clone().ok_or_else(|| ConfigurationError::MissingPage {
                index,
                route: normalize(Some(&mountpath), Some(route_path)),
            })?;
            let route = Route::build(
                Some(&mountpath),
                Some(route_path),
                page,
                Arc::clone(&driver),
                config.pattern,
                RouteKind::Page,
            )?
            .named(entry.name.clone());

            drivers.push(DriverEntry {
                full_path: Some(route.full_path.clone()),
                driver,
            });
            routes.push(route);
        }

        let error_page = config
            .error_page
            .clone()
            .ok_or(ConfigurationError::MissingErrorPage)?;
        let error_driver = Arc::new(
            config
                .error_driver
                .as_ref()
                .map_or_else(Driver::null, |factory| factory()),
        );
        let error_route = Route::build(
            Some(&mountpath),
            Some(ERROR_ROUTE_PATH),
            error_page,
            Arc::clone(&error_driver),
            config.pattern,
            RouteKind::Error,
        )?
        .named(Some("error".to_string()));
        drivers.push(DriverEntry {
            full_path: Some(error_route.full_path.clone()),
            driver: error_driver,
        });

        let routes_summary: Vec<&str> = routes.iter().take(10).map(|r| r.full_path()).collect();
        info!(
            routes_count = routes.len(),
            drivers_count = drivers.len(),
            mountpath = %mountpath,
            error_route = %error_route.full_path,
            routes_summary = ?routes_summary,
            initial_driver = initial.as_ref().map(|(i, _)| *i),
            "Route table loaded"
        );

        Ok(Self {
            mountpath,
            routes,
            error_route,
            drivers,
            initial: initial.map(|(_, driver)| driver),
        })
    }

    /// Normalized mount path (`""` for the site root)
    #[must_use]
    pub fn mountpath(&self) -> &str {
        &self.mountpath
    }

    /// Every matchable route in resolution order, the error route last
    pub fn routes(&self) -> impl Iterator<Item = &Route<S, V>> {
        self.routes.iter().chain(std::iter::once(&self.error_route))
    }

    /// Number of matchable routes, the error route included
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len() + 1
    }

    /// Always `false`: the error route is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn error_route(&self) -> &Route<S, V> {
        &self.error_route
    }

    /// The driver flagged `initial`, dispatched once at startup
    #[must_use]
    pub fn initial_driver(&self) -> Option<&Arc<Driver<S>>> {
        self.initial.as_ref()
    }

    /// All drivers in configuration order: routed, in-page and finally the error route's
    pub fn drivers(&self) -> impl Iterator<Item = &Arc<Driver<S>>> {
        self.drivers.iter().map(|entry| &entry.driver)
    }

    /// Full paths of the matchable routes, in resolution order
    #[must_use]
    pub fn full_paths(&self) -> Vec<&str> {
        self.routes().map(Route::full_path).collect()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!(
            "[routes] mountpath={} count={}",
            if self.mountpath.is_empty() { "/" } else { &self.mountpath },
            self.len()
        );
        for route in self.routes() {
            println!(
                "[route] {} -> {} ({})",
                route.full_path(),
                route.name().unwrap_or("-"),
                route.driver().action_type()
            );
        }
    }

    /// Compose the reducers of every driver in the table
    pub fn root_reducer(&self) -> Result<RootReducer<S>, ConfigurationError> {
        RootReducer::build(self.drivers().map(|driver| driver.as_ref()))
    }

    /// Instantiate every driver's enhancer, in configuration order
    pub fn enhancers(&self, history: &Arc<dyn History>) -> Vec<Arc<dyn Enhancer<S>>> {
        self.drivers
            .iter()
            .filter_map(|entry| {
                let factory = entry.driver.enhancer_factory()?;
                Some(factory(&EnhancerContext {
                    full_path: entry.full_path.as_deref(),
                    history,
                }))
            })
            .collect()
    }

    /// Find the route for a resolution context
    ///
    /// Without an error the location's path is matched against every route in
    /// registration order and the first match wins. With an error the error route
    /// is selected directly, with no parameters.
    pub fn resolve(&self, ctx: &ResolveContext) -> Result<RouteMatch<'_, S, V>, NavigationError> {
        if let Some(error) = &ctx.error {
            debug!(
                path = %ctx.location.pathname,
                error_path = %self.error_route.full_path(),
                status = error.status(),
                "Resolving error route"
            );
            return Ok(RouteMatch {
                route: &self.error_route,
                params: Params::new(),
            });
        }

        let path = ctx.location.pathname.as_str();
        debug!(path = %path, "Route match attempt");
        let match_start = Instant::now();

        for route in self.routes() {
            if let Some(params) = route.match_path(path) {
                let match_duration = match_start.elapsed();
                if match_duration > Duration::from_millis(1) {
                    warn!(
                        path = %path,
                        route_pattern = %route.full_path(),
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                }
                info!(
                    path = %path,
                    route_pattern = %route.full_path(),
                    route_name = route.name().unwrap_or("-"),
                    path_params = ?params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
                return Ok(RouteMatch { route, params });
            }
        }

        warn!(
            path = %path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        Err(NavigationError::NotFound {
            path: path.to_string(),
        })
    }
}

impl<S, V> fmt::Debug for RouteTable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("mountpath", &self.mountpath)
            .field("routes", &self.full_paths())
            .finish()
    }
}
