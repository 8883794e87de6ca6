//! # CLI Module
//!
//! Command-line tools for inspecting an application's routes from its manifest.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the compiled route table, in resolution order, error route last:
//!
//! ```bash
//! waypost routes --manifest app.yaml
//! ```
//!
//! ### `resolve`
//!
//! Navigate to a path and report the route that renders, its page and its
//! parameters. Exits with status 2 when only the error route matched:
//!
//! ```bash
//! waypost resolve --manifest app.yaml /blog/post/2
//! ```
//!
//! Both commands honour the `WAYPOST_*` settings (see
//! [`Settings`](crate::config::Settings)); a mount path in the manifest wins over
//! `WAYPOST_MOUNTPATH`.

mod commands;


pub use commands::{outline, run_cli, Cli, Commands, EXIT_NO_MATCH};
