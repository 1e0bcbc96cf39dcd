//! # Servlet Registry
//!
//! The path -> servlet table shared by every connection.
//!
//! Paths are matched exactly (no prefix or wildcard matching). A servlet
//! is initialized before it becomes visible and destroyed exactly once.

use crate::servlet::{Servlet, ServletError};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors produced while registering servlets.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Another servlet already owns the path.
    #[error("Servlet already registered for path: {0}")]
    Duplicate(String),

    /// The servlet's `init` failed; it was not registered.
    #[error("Servlet for path {path} failed to initialize: {source}")]
    InitFailed {
        path: String,
        #[source]
        source: ServletError,
    },
}

// =============================================================================
// REGISTRY TRAIT
// =============================================================================

/// Registration and lookup of servlets by path.
pub trait ServletRegistry: Send + Sync {
    /// Initialize `servlet` and register it under `path`.
    ///
    /// Fails without side effects if the path is taken or `init` fails.
    fn register(&self, path: &str, servlet: Box<dyn Servlet>) -> Result<(), RegistryError>;

    /// The servlet registered for exactly `path`.
    fn get(&self, path: &str) -> Option<Arc<dyn Servlet>>;

    /// Destroy every servlet and empty the registry.
    fn destroy_all(&self);

    /// Registered paths, sorted.
    fn paths(&self) -> Vec<String>;

    /// Number of registered servlets.
    fn len(&self) -> usize {
        self.paths().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// DEFAULT REGISTRY
// =============================================================================

/// In-memory registry backed by a `BTreeMap`.
#[derive(Default)]
pub struct DefaultServletRegistry {
    servlets: RwLock<BTreeMap<String, Arc<dyn Servlet>>>,
}

impl DefaultServletRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for DefaultServletRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultServletRegistry")
            .field("paths", &self.paths())
            .finish()
    }
}

impl ServletRegistry for DefaultServletRegistry {
    fn register(&self, path: &str, mut servlet: Box<dyn Servlet>) -> Result<(), RegistryError> {
        // Write lock spans check, init and insert.
        let mut servlets = self.servlets.write().unwrap_or_else(PoisonError::into_inner);
        if servlets.contains_key(path) {
            return Err(RegistryError::Duplicate(path.to_string()));
        }

        servlet.init().map_err(|source| RegistryError::InitFailed {
            path: path.to_string(),
            source,
        })?;

        tracing::debug!(path, servlet = servlet.name(), "servlet registered");
        servlets.insert(path.to_string(), Arc::from(servlet));
        Ok(())
    }

    fn get(&self, path: &str) -> Option<Arc<dyn Servlet>> {
        self.servlets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    fn destroy_all(&self) {
        let drained = std::mem::take(&mut *self.servlets.write().unwrap_or_else(PoisonError::into_inner));
        for (path, servlet) in drained {
            tracing::debug!(path = %path, servlet = servlet.name(), "destroying servlet");
            servlet.destroy();
        }
    }

    fn paths(&self) -> Vec<String> {
        self.servlets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.servlets.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
