//! # Servlet Factory
//!
//! Creates servlets by name. Mapping files refer to servlets by the names
//! registered here; an application adds its own servlets with
//! [`ServletFactory::register`] before loading a mapping.

use crate::servlet::{Servlet, WelcomeServlet};
use std::collections::BTreeMap;
use thiserror::Error;

/// Constructor for one servlet type.
pub type ServletConstructor = fn() -> Box<dyn Servlet>;

/// Name of the built-in welcome page servlet.
pub const WELCOME_SERVLET: &str = "welcome";

/// Errors produced while creating servlets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// No constructor is registered under the name.
    #[error("Failed to create servlet: {0}")]
    Unknown(String),
}

/// A catalogue of servlet constructors keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ServletFactory {
    constructors: BTreeMap<String, ServletConstructor>,
}

impl ServletFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory holding the built-in servlets.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(WELCOME_SERVLET, || Box::new(WelcomeServlet));
        factory
    }

    /// Add a constructor, replacing any constructor with the same name.
    pub fn register(&mut self, name: impl Into<String>, constructor: ServletConstructor) -> &mut Self {
        self.constructors.insert(name.into(), constructor);
        self
    }

    /// Create a new servlet instance.
    pub fn create(&self, name: &str) -> Result<Box<dyn Servlet>, FactoryError> {
        self.constructors
            .get(name)
            .map(|construct| construct())
            .ok_or_else(|| FactoryError::Unknown(name.to_string()))
    }

    /// Whether a constructor exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

// =============================================================================
// TESTS
// =============================================================================
