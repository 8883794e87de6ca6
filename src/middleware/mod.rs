//! # Middleware Module
//!
//! Store enhancers: hooks that run around every action dispatched into a store.
//! Drivers contribute enhancers through their enhancer factory; each factory is
//! invoked once when the application is mounted and the resulting enhancers run in
//! configuration order.
//!
//! Two general-purpose enhancers ship with the crate:
//!
//! - [`TracingEnhancer`] - structured logging of every action
//! - [`MetricsEnhancer`] - counters of dispatched and halted actions

mod core;
mod metrics;
mod logging;

pub use self::core::{Enhancer, Flow};
pub use metrics::MetricsEnhancer;
pub use logging::TracingEnhancer;
