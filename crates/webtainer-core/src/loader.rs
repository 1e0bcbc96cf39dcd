//! # Servlet Loader
//!
//! Populates a registry from a mapping. File-backed loading lives in the
//! app; this module holds the contract and the in-memory loader it
//! delegates to.

use crate::factory::{FactoryError, ServletFactory};
use crate::mapping::{MappingError, ServletMappings};
use crate::registry::{RegistryError, ServletRegistry};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading servlets.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("Error loading servlets from configuration file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Something that can fill a registry with servlets.
pub trait ServletLoader {
    /// Register servlets; returns how many were registered.
    fn load(&self, registry: &dyn ServletRegistry) -> Result<usize, LoadError>;
}

// =============================================================================
// MAPPING LOADER
// =============================================================================

/// Creates each mapped servlet through a factory and registers it.
///
/// Loading stops at the first error; servlets registered before it stay
/// registered.
#[derive(Debug, Clone)]
pub struct MappingLoader<'a> {
    mappings: &'a ServletMappings,
    factory: &'a ServletFactory,
}

impl<'a> MappingLoader<'a> {
    #[must_use]
    pub fn new(mappings: &'a ServletMappings, factory: &'a ServletFactory) -> Self {
        Self { mappings, factory }
    }
}

impl ServletLoader for MappingLoader<'_> {
    fn load(&self, registry: &dyn ServletRegistry) -> Result<usize, LoadError> {
        let mut loaded = 0usize;
        for (path, name) in self.mappings.iter() {
            let servlet = self.factory.create(name)?;
            registry.register(path, servlet)?;
            tracing::info!(path, servlet = name, "servlet loaded");
            loaded += 1;
        }
        Ok(loaded)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DefaultServletRegistry;

    #[test]
    fn loads_every_mapping() {
        let mappings = ServletMappings::from_properties_str("/=welcome\n/home=welcome\n").unwrap();
        let factory = ServletFactory::with_builtins();
        let registry = DefaultServletRegistry::new();

        let loaded = MappingLoader::new(&mappings, &factory).load(&registry).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(registry.paths(), vec!["/", "/home"]);
        assert_eq!(registry.get("/").unwrap().name(), "WelcomeServlet");
    }

    #[test]
    fn unknown_servlet_stops_loading() {
        // BTreeMap order: "/a" loads, "/b" fails, "/c" is never reached
        let mappings =
            ServletMappings::from_properties_str("/a=welcome\n/b=missing\n/c=welcome\n").unwrap();
        let factory = ServletFactory::with_builtins();
        let registry = DefaultServletRegistry::new();

        let err = MappingLoader::new(&mappings, &factory).load(&registry).unwrap_err();

        assert!(matches!(err, LoadError::Factory(FactoryError::Unknown(ref n)) if n == "missing"));
        assert_eq!(registry.paths(), vec!["/a"]);
    }

    #[test]
    fn duplicate_path_in_registry_fails() {
        let mappings = ServletMappings::from_properties_str("/=welcome").unwrap();
        let factory = ServletFactory::with_builtins();
        let registry = DefaultServletRegistry::new();
        let loader = MappingLoader::new(&mappings, &factory);

        loader.load(&registry).unwrap();
        let err = loader.load(&registry).unwrap_err();
        assert!(matches!(err, LoadError::Registry(RegistryError::Duplicate(_))));
    }

    #[test]
    fn error_messages_name_the_file() {
        let err = LoadError::NotFound(PathBuf::from("nonexistent.properties"));
        assert_eq!(err.to_string(), "Configuration file not found: nonexistent.properties");
    }
}
