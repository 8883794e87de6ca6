//! # Router Module
//!
//! Path matching and route resolution for a mounted application. Route templates
//! are compiled to regular expressions once, when the [`RouteTable`] is built, and
//! every navigation is a linear first-match-wins scan over them.
//!
//! ## Overview
//!
//! - [`normalize`] / [`normalize_mountpath`] join a mount path and a route path
//! - [`PathPattern`] compiles a `:name` template into a matcher plus its keys
//! - [`RouteTable::build`] turns an [`AppConfig`](crate::config::AppConfig) into
//!   ordered [`Route`]s and appends the `<mountpath>/error` route
//! - [`RouteTable::resolve`] finds the route for a [`ResolveContext`]
//!
//! ## Example
//!
//! ```rust
//! use waypost::config::{ActionConfig, AppConfig};
//! use waypost::history::Location;
//! use waypost::router::{ResolveContext, RouteTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: AppConfig<(), String> = AppConfig::new(())
//!     .mountpath("/blog")
//!     .action(ActionConfig::routed("/post/:id").with_page(|ctx| {
//!         Ok(format!("post {}", ctx.param("id").unwrap_or("?")))
//!     }))
//!     .error_page(|_| Ok("oops".to_string()));
//!
//! let table = RouteTable::build(&config)?;
//! let found = table.resolve(&ResolveContext::new(Location::parse("/blog/post/2")))?;
//! assert_eq!(found.route.full_path(), "/blog/post/:id");
//! assert_eq!(found.params.get("id"), Some("2"));
//! assert_eq!(table.error_route().full_path(), "/blog/error");
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! Matching is O(n) in the number of routes. Parameters are kept in a
//! [`ParamVec`] that stays on the stack for up to [`MAX_INLINE_PARAMS`] entries.

mod core;
mod mountpath;
mod pattern;

pub use self::core::{
    Page, PageContext, ResolveContext, Route, RouteKind, RouteMatch, RouteTable,
    ERROR_ROUTE_PATH,
};
pub use mountpath::{normalize, normalize_mountpath};
pub use pattern::{Params, ParamVec, PathPattern, PatternOptions, MAX_INLINE_PARAMS};
