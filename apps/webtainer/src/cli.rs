//! # Command-Line Interface
//!
//! `serve` (the default) runs the container; `routes` prints the mapping
//! table without opening a socket.

use crate::config::{Config, ServerArgs};
use crate::loader::{read_mappings, FileServletLoader};
use crate::server::WebContainer;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use webtainer_core::{DefaultServletRegistry, ServletFactory, ServletLoader, ServletRegistry};

#[derive(Debug, Parser)]
#[command(name = "webtainer", version, about = "A small servlet-style web container")]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load servlets and serve HTTP until interrupted
    Serve,
    /// Print the servlet mapping table and exit
    Routes {
        /// Print JSON instead of `path -> servlet` lines
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// SERVE
// =============================================================================

/// Load the configured servlets and run until `shutdown` completes.
///
/// A mapping file that fails to load is logged and the container starts
/// with whatever servlets were registered before the failure.
pub async fn cmd_serve<F>(config: Config, factory: ServletFactory, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let registry = Arc::new(DefaultServletRegistry::new());

    let loader = FileServletLoader::new(config.servlet_config.clone(), factory);
    match loader.load(&*registry) {
        Ok(count) => tracing::info!(count, "servlets loaded"),
        Err(err) => tracing::error!(
            path = %loader.path().display(),
            error = %err,
            registered = registry.len(),
            "failed to load servlets"
        ),
    }

    let addr = config.addr();
    let container = WebContainer::new(config, registry)
        .bind()
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    container.run(shutdown).await?;
    Ok(())
}

// =============================================================================
// ROUTES
// =============================================================================

/// Print the mapping table in `path` to `out`. Returns the route count.
pub fn cmd_routes<W: Write>(
    path: &Path,
    factory: &ServletFactory,
    json: bool,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mappings = read_mappings(path)?;

    let unknown: Vec<&str> = mappings
        .iter()
        .map(|(_, servlet)| servlet)
        .filter(|servlet| !factory.contains(servlet))
        .collect();
    if !unknown.is_empty() {
        bail!(
            "{}: unknown servlet(s): {}",
            path.display(),
            unknown.join(", ")
        );
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &mappings)?;
        writeln!(out)?;
    } else {
        for (route, servlet) in mappings.iter() {
            writeln!(out, "{route} -> {servlet}")?;
        }
    }
    Ok(mappings.len())
}
