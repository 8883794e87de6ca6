//! # App Module
//!
//! Mounting an application and the [`Router`] that drives it.
//!
//! [`mount`] wires everything from an [`AppConfig`]: it builds the route table,
//! composes the root reducer from every driver, instantiates the drivers'
//! enhancers, creates the store and starts the router on the current location.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waypost::app::mount;
//! use waypost::config::{ActionConfig, AppConfig};
//! use waypost::history::{History, MemoryHistory};
//! use waypost::render::TaskQueue;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: AppConfig<(), String> = AppConfig::new(())
//!     .mountpath("/blog")
//!     .action(ActionConfig::routed("/post/:id").with_page(|ctx| {
//!         Ok(format!("post {}", ctx.param("id").unwrap_or_default()))
//!     }))
//!     .error_page(|ctx| Ok(format!("error {}", ctx.location.pathname)));
//!
//! let history = MemoryHistory::new("/blog/post/1");
//! let router = mount(
//!     config,
//!     Arc::new(history.clone()),
//!     Arc::new(|view: String| println!("{view}")),
//!     Arc::new(TaskQueue::new()),
//! )?;
//! assert_eq!(router.state().route(), Some("/blog/post/:id"));
//!
//! history.push("/blog/nowhere");
//! assert!(router.state().is_fallback());
//! # Ok(())
//! # }
//! ```

mod core;
mod state;

pub use self::core::Router;
pub use state::{Navigation, NavigationState};

use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::ConfigurationError;
use crate::history::History;
use crate::middleware::Enhancer;
use crate::render::{Renderer, Spawner};
use crate::router::RouteTable;
use crate::store::{MemoryStore, RootReducer, Store};

/// Mount an application on an in-process [`MemoryStore`] and start it
///
/// Configuration errors are returned before anything renders. A fatal first
/// navigation is logged and left observable through [`Router::state`].
pub fn mount<S, V>(
    config: AppConfig<S, V>,
    history: Arc<dyn History>,
    renderer: Arc<dyn Renderer<V>>,
    spawner: Arc<dyn Spawner>,
) -> Result<Arc<Router<S, V>>, ConfigurationError>
where
    S: Send + Sync + 'static,
    V: 'static,
{
    mount_with_store(config, history, renderer, spawner, |reducer, state, enhancers| {
        MemoryStore::new(reducer, state, enhancers) as Arc<dyn Store<S>>
    })
}

/// Mount an application on a store produced by `create_store`
///
/// `create_store` receives the composed root reducer, the initial state and the
/// drivers' enhancers in configuration order.
pub fn mount_with_store<S, V, F>(
    config: AppConfig<S, V>,
    history: Arc<dyn History>,
    renderer: Arc<dyn Renderer<V>>,
    spawner: Arc<dyn Spawner>,
    create_store: F,
) -> Result<Arc<Router<S, V>>, ConfigurationError>
where
    S: Send + Sync + 'static,
    V: 'static,
    F: FnOnce(RootReducer<S>, S, Vec<Arc<dyn Enhancer<S>>>) -> Arc<dyn Store<S>>,
{
    let table = RouteTable::build(&config)?;
    let reducer = table.root_reducer()?;
    let enhancers = table.enhancers(&history);
    info!(
        mountpath = %table.mountpath(),
        routes = table.len(),
        reducers = reducer.action_types().len(),
        enhancers = enhancers.len(),
        "Mounting application"
    );

    let AppConfig {
        initial_state,
        cancel_superseded,
        ..
    } = config;
    let store = create_store(reducer, initial_state, enhancers);

    let router = Arc::new(
        Router::new(table, store, history, renderer, spawner).cancel_superseded(cancel_superseded),
    );
    if let Err(err) = router.start() {
        error!(error = %err, "Initial navigation failed");
    }
    Ok(router)
}
