//! # Driver Module
//!
//! A driver is the bundle of behaviour one route (or in-page action) contributes to
//! the application:
//!
//! - an **action type** tag,
//! - an optional **reducer** applied when an action with that tag is dispatched,
//! - an optional **enhancer** factory, registered once into the store,
//! - an optional **activation**, run after the route's page has rendered to start
//!   loading the data the page needs.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use waypost::driver::{Action, Driver};
//!
//! #[derive(Clone, Default)]
//! struct Blog {
//!     post: Option<String>,
//! }
//!
//! let driver: Driver<Blog> = Driver::new("POST_LOADED")
//!     .with_reducer(|state: Arc<Blog>, action| {
//!         let mut state = state;
//!         Arc::make_mut(&mut state).post = action.payload()["title"].as_str().map(String::from);
//!         state
//!     })
//!     .on_activate_async(|dispatch, params| async move {
//!         let id = params.get("id").unwrap_or_default().to_string();
//!         dispatch.send(Action::new("POST_LOADED").with_payload(json!({ "title": id })));
//!     });
//! assert_eq!(driver.action_type(), "POST_LOADED");
//! ```
//!
//! Drivers are created through a [`DriverFactory`] exactly once per configuration
//! entry, so any state a driver keeps (caches, counters) belongs to that entry alone.
//! [`Driver::null`] is used wherever no driver is configured.

mod core;

pub use self::core::{
    null_driver_factory, Action, ActivateFn, Dispatch, Driver, DriverFactory, DriverTask,
    EnhancerContext, EnhancerFactory, ReducerFn, NULL_ACTION_TYPE,
};
