use std::fmt;
use std::sync::Arc;

use super::Settings;
use crate::driver::{Driver, DriverFactory};
use crate::router::{Page, PageContext, PatternOptions};

/// One entry of the application's action configuration
///
/// An entry with a route becomes a [`Route`](crate::router::Route); an entry without
/// one is an in-page driver that only contributes its reducer and enhancer.
pub struct ActionConfig<S, V> {
    pub(crate) name: Option<String>,
    pub(crate) route: Option<String>,
    pub(crate) page: Option<Page<S, V>>,
    pub(crate) driver: Option<DriverFactory<S>>,
    pub(crate) initial: bool,
}

impl<S, V> ActionConfig<S, V> {
    /// An entry mounted at `route` (relative to the mount path)
    pub fn routed(route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
            ..Self::in_page()
        }
    }

    /// An entry that never matches a location
    #[must_use]
    pub fn in_page() -> Self {
        Self {
            name: None,
            route: None,
            page: None,
            driver: None,
            initial: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_page<F>(mut self, page: F) -> Self
    where
        F: Fn(&PageContext<'_, S>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        self.page = Some(Arc::new(page));
        self
    }

    #[must_use]
    pub fn with_page_fn(mut self, page: Page<S, V>) -> Self {
        self.page = Some(page);
        self
    }

    /// Use `factory` to create this entry's driver
    #[must_use]
    pub fn with_driver<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Driver<S> + Send + Sync + 'static,
    {
        self.driver = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn with_driver_factory(mut self, factory: DriverFactory<S>) -> Self {
        self.driver = Some(factory);
        self
    }

    /// Dispatch this entry's driver once at startup
    #[must_use]
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.initial
    }
}

impl<S, V> fmt::Debug for ActionConfig<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("page", &self.page.is_some())
            .field("driver", &self.driver.is_some())
            .field("initial", &self.initial)
            .finish()
    }
}

/// Everything needed to mount an application
///
/// ```
/// use waypost::config::{ActionConfig, AppConfig};
///
/// let config: AppConfig<(), &'static str> = AppConfig::new(())
///     .mountpath("/blog")
///     .action(ActionConfig::routed("/").with_page(|_| Ok("home")))
///     .action(ActionConfig::routed("/post/:id").with_page(|_| Ok("post")))
///     .error_page(|_| Ok("error"));
/// assert_eq!(config.len(), 2);
/// ```
pub struct AppConfig<S, V> {
    pub(crate) initial_state: S,
    pub(crate) mountpath: Option<String>,
    pub(crate) actions: Vec<Option<ActionConfig<S, V>>>,
    pub(crate) error_page: Option<Page<S, V>>,
    pub(crate) error_driver: Option<DriverFactory<S>>,
    pub(crate) pattern: PatternOptions,
    pub(crate) cancel_superseded: bool,
}

impl<S, V> AppConfig<S, V> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            mountpath: None,
            actions: Vec::new(),
            error_page: None,
            error_driver: None,
            pattern: PatternOptions::default(),
            cancel_superseded: true,
        }
    }

    #[must_use]
    pub fn mountpath(mut self, mountpath: impl Into<String>) -> Self {
        self.mountpath = Some(mountpath.into());
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionConfig<S, V>) -> Self {
        self.actions.push(Some(action));
        self
    }

    /// Append a raw entry; `None` stands for a null entry in declarative input
    #[must_use]
    pub fn entry(mut self, entry: Option<ActionConfig<S, V>>) -> Self {
        self.actions.push(entry);
        self
    }

    #[must_use]
    pub fn error_page<F>(mut self, page: F) -> Self
    where
        F: Fn(&PageContext<'_, S>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        self.error_page = Some(Arc::new(page));
        self
    }

    #[must_use]
    pub fn error_page_fn(mut self, page: Page<S, V>) -> Self {
        self.error_page = Some(page);
        self
    }

    #[must_use]
    pub fn error_driver<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Driver<S> + Send + Sync + 'static,
    {
        self.error_driver = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn error_driver_factory(mut self, factory: DriverFactory<S>) -> Self {
        self.error_driver = Some(factory);
        self
    }

    #[must_use]
    pub fn pattern_options(mut self, options: PatternOptions) -> Self {
        self.pattern = options;
        self
    }

    /// Keep (`false`) or abort (`true`) an earlier navigation's pending driver task
    /// when a newer navigation starts
    #[must_use]
    pub fn cancel_superseded(mut self, cancel: bool) -> Self {
        self.cancel_superseded = cancel;
        self
    }

    /// Apply runtime settings; an explicitly configured mount path wins
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if self.mountpath.is_none() {
            self.mountpath = settings.mountpath.clone();
        }
        self.pattern = settings.pattern_options();
        self.cancel_superseded = settings.cancel_superseded;
        self
    }

    #[must_use]
    pub fn mountpath_str(&self) -> Option<&str> {
        self.mountpath.as_deref()
    }

    #[must_use]
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// Number of action entries, null entries included
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S, V> fmt::Debug for AppConfig<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("mountpath", &self.mountpath)
            .field("actions", &self.actions)
            .field("error_page", &self.error_page.is_some())
            .field("error_driver", &self.error_driver.is_some())
            .field("pattern", &self.pattern)
            .field("cancel_superseded", &self.cancel_superseded)
            .finish()
    }
}
