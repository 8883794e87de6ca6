//! # Config Module
//!
//! Application configuration, in three layers:
//!
//! - [`AppConfig`] / [`ActionConfig`] - typed, in-code configuration of the mount
//!   path, the action entries and the error route
//! - [`Manifest`] + [`Registry`] - the same configuration declared in YAML or JSON,
//!   with pages and drivers referred to by name
//! - [`Settings`] - runtime switches read from `WAYPOST_*` environment variables

mod action;
mod manifest;
mod registry;
mod settings;

pub use action::{ActionConfig, AppConfig};
pub use manifest::{load_manifest, ActionEntry, ErrorEntry, Manifest};
pub use registry::Registry;
pub use settings::Settings;
