//! # waypost
//!
//! **waypost** is a client-side navigation engine for single-page applications.
//! It maps locations to pages, extracts path parameters, activates the driver that
//! loads each page's data, and keeps application state in a reducer-driven store.
//!
//! ## Overview
//!
//! An application is a list of action entries under a mount path. An entry with a
//! route template (`/post/:id`) becomes a route; an entry without one is an
//! in-page driver that only contributes to the store. Every application gets an
//! error route at `<mountpath>/error`, rendered whenever a location matches no
//! route or its page fails.
//!
//! Each navigation:
//!
//! 1. resolves the location against the routes, first match wins
//! 2. renders the matched page
//! 3. activates the route's driver with the extracted parameters
//!
//! ## Architecture
//!
//! - **[`router`]** - route templates, mount paths, the route table and resolver
//! - **[`driver`]** - actions, drivers and the null driver
//! - **[`store`]** - the store contract, root reducer and in-memory store
//! - **[`middleware`]** - store enhancers (tracing, metrics)
//! - **[`history`]** - locations and the history collaborator
//! - **[`render`]** - renderer and task spawner collaborators
//! - **[`app`]** - the navigation orchestrator and [`mount`]
//! - **[`config`]** - typed and declarative configuration, runtime settings
//! - **[`telemetry`]** - logging initialization
//! - **[`cli`]** - the `waypost` command-line tools
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use waypost::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Blog {
//!     title: Option<String>,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::new(Blog::default())
//!     .mountpath("/blog")
//!     .action(
//!         ActionConfig::routed("/post/:id")
//!             .with_page(|ctx: &PageContext<'_, Blog>| {
//!                 Ok(ctx.state().title.clone().unwrap_or_else(|| "loading".into()))
//!             })
//!             .with_driver(|| {
//!                 Driver::new("POST_LOADED")
//!                     .with_reducer(|_state: Arc<Blog>, action| {
//!                         let title = action.payload()["title"].as_str().map(String::from);
//!                         Arc::new(Blog { title })
//!                     })
//!                     .on_activate(|dispatch, params| {
//!                         let id = params.get("id").unwrap_or_default();
//!                         dispatch.send(Action::new("POST_LOADED").with_payload(json!({ "title": id })));
//!                         DriverTask::Done
//!                     })
//!             }),
//!     )
//!     .error_page(|_| Ok("not found".to_string()));
//!
//! let history = MemoryHistory::new("/blog/post/hello");
//! let router = mount(
//!     config,
//!     Arc::new(history),
//!     Arc::new(|view: String| println!("{view}")),
//!     Arc::new(TaskQueue::new()),
//! )?;
//! assert_eq!(router.store().state().title.as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod history;
pub mod ids;
pub mod middleware;
pub mod render;
pub mod router;
pub mod store;
pub mod telemetry;

pub use app::{mount, mount_with_store, Navigation, NavigationState, Router};
pub use error::{ConfigurationError, FatalResolutionError, NavigationError, PatternError};

/// The types most applications need
pub mod prelude {
    pub use crate::app::{mount, Router};
    pub use crate::config::{ActionConfig, AppConfig};
    pub use crate::driver::{Action, Dispatch, Driver, DriverTask};
    pub use crate::history::{History, Location, MemoryHistory};
    pub use crate::render::{Renderer, Spawner, TaskQueue};
    pub use crate::router::{PageContext, Params};
    pub use crate::store::Store;
}
