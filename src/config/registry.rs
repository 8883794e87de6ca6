use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{ActionConfig, AppConfig, Manifest};
use crate::driver::{Driver, DriverFactory};
use crate::error::ConfigurationError;
use crate::router::{Page, PageContext};

/// Named pages and driver factories that a [`Manifest`] can refer to
pub struct Registry<S, V> {
    pages: HashMap<String, Page<S, V>>,
    drivers: HashMap<String, DriverFactory<S>>,
}

impl<S, V> Registry<S, V> {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            drivers: HashMap::new(),
        }
    }

    /// Register a page under `name`, replacing any earlier registration
    pub fn register_page<F>(&mut self, name: impl Into<String>, page: F) -> &mut Self
    where
        F: Fn(&PageContext<'_, S>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.pages.insert(name.clone(), Arc::new(page)).is_some() {
            debug!(page = %name, "Replacing registered page");
        }
        self
    }

    /// Register a driver factory under `name`, replacing any earlier registration
    pub fn register_driver<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Driver<S> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.drivers.insert(name.clone(), Arc::new(factory)).is_some() {
            debug!(driver = %name, "Replacing registered driver");
        }
        self
    }

    #[must_use]
    pub fn has_page(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    #[must_use]
    pub fn has_driver(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    fn page(&self, name: &str) -> Result<Page<S, V>, ConfigurationError> {
        self.pages
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownPage {
                name: name.to_string(),
            })
    }

    fn driver(&self, name: &str) -> Result<DriverFactory<S>, ConfigurationError> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownDriver {
                name: name.to_string(),
            })
    }

    /// Resolve every name in `manifest` into an [`AppConfig`]
    ///
    /// `null` entries are passed through untouched; building the route table from
    /// the result reports them.
    pub fn assemble(
        &self,
        manifest: &Manifest,
        initial_state: S,
    ) -> Result<AppConfig<S, V>, ConfigurationError> {
        let mut config = AppConfig::new(initial_state);
        if let Some(mountpath) = &manifest.mountpath {
            config = config.mountpath(mountpath.clone());
        }

        for entry in &manifest.actions {
            let Some(entry) = entry else {
                config = config.entry(None);
                continue;
            };
            let mut action = match &entry.route {
                Some(route) => ActionConfig::routed(route.clone()),
                None => ActionConfig::in_page(),
            };
            if let Some(name) = &entry.name {
                action = action.with_name(name.clone());
            }
            if let Some(page) = &entry.page {
                action = action.with_page_fn(self.page(page)?);
            }
            if let Some(driver) = &entry.driver {
                action = action.with_driver_factory(self.driver(driver)?);
            }
            if entry.initial {
                action = action.initial();
            }
            config = config.action(action);
        }

        if let Some(error) = &manifest.error {
            config = config.error_page_fn(self.page(&error.page)?);
            if let Some(driver) = &error.driver {
                config = config.error_driver_factory(self.driver(driver)?);
            }
        }

        debug!(
            entries = config.len(),
            pages = self.pages.len(),
            drivers = self.drivers.len(),
            "Manifest assembled"
        );
        Ok(config)
    }
}

impl<S, V> Default for Registry<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, V> fmt::Debug for Registry<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pages: Vec<&String> = self.pages.keys().collect();
        pages.sort();
        let mut drivers: Vec<&String> = self.drivers.keys().collect();
        drivers.sort();
        f.debug_struct("Registry")
            .field("pages", &pages)
            .field("drivers", &drivers)
            .finish()
    }
}
