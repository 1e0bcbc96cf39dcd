//! # Mapping Formats
//!
//! Parses servlet mapping files (`path -> servlet name`).
//!
//! Supported formats:
//! - Properties: `/path=servlet` lines, `#`/`!` comments, `=` or `:` separator
//! - JSON: a single object `{ "/path": "servlet" }`
//!
//! Note: reading the file is the app's job. This module only converts text.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors produced while parsing a mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A properties line had neither `=` nor `:`.
    #[error("line {line}: expected `path=servlet`, found `{text}`")]
    MissingSeparator { line: usize, text: String },

    /// A mapped path does not start with `/`.
    #[error("servlet path must start with '/': {0}")]
    InvalidPath(String),

    /// A path was mapped to an empty servlet name.
    #[error("no servlet named for path: {0}")]
    EmptyServletName(String),

    /// The JSON document was malformed.
    #[error("invalid JSON mapping: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// FORMAT
// =============================================================================

/// Mapping file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    Properties,
    Json,
}

impl MappingFormat {
    /// Pick the format from a file extension: `.json` is JSON, anything
    /// else is properties.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Properties,
        }
    }
}

// =============================================================================
// MAPPINGS
// =============================================================================

/// Ordered `path -> servlet name` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServletMappings {
    entries: BTreeMap<String, String>,
}

impl ServletMappings {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse text in the given format.
    pub fn parse(text: &str, format: MappingFormat) -> Result<Self, MappingError> {
        match format {
            MappingFormat::Properties => Self::from_properties_str(text),
            MappingFormat::Json => Self::from_json_str(text),
        }
    }

    /// Parse the properties format.
    ///
    /// A later line for the same path overrides an earlier one.
    pub fn from_properties_str(text: &str) -> Result<Self, MappingError> {
        let mut mappings = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some(separator) = line.find(['=', ':']) else {
                return Err(MappingError::MissingSeparator {
                    line: index + 1,
                    text: line.to_string(),
                });
            };
            let path = line[..separator].trim();
            let servlet = line[separator + 1..].trim();
            mappings.insert(path, servlet)?;
        }
        Ok(mappings)
    }

    /// Parse the JSON format.
    pub fn from_json_str(text: &str) -> Result<Self, MappingError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(text)?;
        let mut mappings = Self::new();
        for (path, servlet) in raw {
            mappings.insert(&path, &servlet)?;
        }
        Ok(mappings)
    }

    /// Add or replace a validated mapping.
    pub fn insert(&mut self, path: &str, servlet: &str) -> Result<(), MappingError> {
        if !path.starts_with('/') {
            return Err(MappingError::InvalidPath(path.to_string()));
        }
        if servlet.is_empty() {
            return Err(MappingError::EmptyServletName(path.to_string()));
        }
        self.entries.insert(path.to_string(), servlet.to_string());
        Ok(())
    }

    /// The servlet name mapped to `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Iterate `(path, servlet)` pairs, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, servlet)| (path.as_str(), servlet.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
