//! # Webtainer Library
//!
//! This library exposes the container modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod config;
pub mod handler;
pub mod loader;
pub mod server;

pub use config::Config;
pub use handler::{ConnectionHandler, Outcome};
pub use loader::{read_mappings, FileServletLoader};
pub use server::{BoundContainer, ShutdownHandle, WebContainer};

// Re-export webtainer_core for convenience
pub use webtainer_core;
