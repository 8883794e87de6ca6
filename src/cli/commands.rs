use anyhow::Context;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::Router;
use crate::config::{load_manifest, AppConfig, Manifest, Registry, Settings};
use crate::driver::Driver;
use crate::history::{History, Location, MemoryHistory};
use crate::render::TaskQueue;
use crate::router::RouteTable;
use crate::store::{MemoryStore, Store};

/// Exit status of `resolve` when the path only reached the error route
pub const EXIT_NO_MATCH: u8 = 2;

/// Command-line interface for waypost
///
/// Inspects a manifest's route table without running the application: pages
/// render as their own names and drivers do nothing.
#[derive(Parser)]
#[command(name = "waypost")]
#[command(about = "Waypost route table tools", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the compiled route table of a manifest
    Routes {
        /// Path to the manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Resolve a path against a manifest and show the route that renders
    ///
    /// Exits with status 2 when only the error route matched.
    Resolve {
        /// Path to the manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Location to resolve, e.g. /blog/post/2
        path: String,
    },
}

/// Run a parsed command line, writing its report to `out`; returns the exit status
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<u8> {
    match &cli.command {
        Commands::Routes { manifest } => {
            let manifest = load_manifest(manifest)?;
            let table = RouteTable::build(&outline(&manifest)?)?;
            print_routes(&table, out)?;
            Ok(0)
        }
        Commands::Resolve { manifest, path } => resolve(manifest, path, out),
    }
}

/// Configuration for `manifest` in which every page renders its own name
pub fn outline(manifest: &Manifest) -> anyhow::Result<AppConfig<(), String>> {
    let mut registry: Registry<(), String> = Registry::new();
    for page in manifest.page_names() {
        let view = page.to_string();
        registry.register_page(page, move |_| Ok(view.clone()));
    }
    for driver in manifest.driver_names() {
        let action_type = driver.to_string();
        registry.register_driver(driver, move || Driver::new(&action_type));
    }
    let config = registry
        .assemble(manifest, ())?
        .with_settings(&Settings::from_env());
    Ok(config)
}

fn print_routes(table: &RouteTable<(), String>, out: &mut dyn Write) -> anyhow::Result<()> {
    let mountpath = if table.mountpath().is_empty() {
        "/"
    } else {
        table.mountpath()
    };
    writeln!(out, "mountpath: {mountpath}")?;
    for route in table.routes() {
        let keys: Vec<&str> = route.pattern().keys().iter().map(|k| k.as_ref()).collect();
        writeln!(
            out,
            "{:<32} name={} driver={} params=[{}]{}",
            route.full_path(),
            route.name().unwrap_or("-"),
            route.driver().action_type(),
            keys.join(","),
            if route.is_error() { " (error)" } else { "" }
        )?;
    }
    Ok(())
}

fn resolve(manifest: &Path, path: &str, out: &mut dyn Write) -> anyhow::Result<u8> {
    let manifest = load_manifest(manifest)?;
    let table = RouteTable::build(&outline(&manifest)?)?;

    let rendered = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&rendered);
    let store: Arc<dyn Store<()>> = MemoryStore::with_identity_reducer(());
    let history: Arc<dyn History> = Arc::new(MemoryHistory::new(path));
    let router = Arc::new(Router::new(
        table,
        store,
        history,
        Arc::new(move |view: String| sink.lock().push(view)),
        Arc::new(TaskQueue::new()),
    ));

    let navigation = router
        .navigate(&Location::parse(path))
        .with_context(|| format!("failed to resolve {path}"))?
        .with_context(|| format!("navigation to {path} was queued"))?;
    let page = rendered.lock().pop().unwrap_or_default();

    writeln!(out, "path: {}", navigation.path)?;
    writeln!(out, "route: {}", navigation.route)?;
    writeln!(out, "page: {page}")?;
    for (name, value) in navigation.params.iter() {
        writeln!(out, "param {name} = {}", value.unwrap_or("<absent>"))?;
    }

    match navigation.fallback {
        Some(status) => {
            writeln!(out, "fallback: {status}")?;
            Ok(EXIT_NO_MATCH)
        }
        None => Ok(0),
    }
}
