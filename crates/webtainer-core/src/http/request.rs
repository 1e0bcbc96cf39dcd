//! The parsed HTTP request handed to servlets.

use std::collections::BTreeMap;

/// An HTTP request.
///
/// Headers are keyed case-insensitively; parameters and attributes are
/// keyed exactly. Adding a header or parameter that already exists
/// replaces the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Raw method token (e.g. "GET").
    method: String,
    /// Request path without the query string.
    uri: String,
    /// Protocol version token, stored verbatim.
    version: String,
    /// Lowercased header name -> (original name, values).
    headers: BTreeMap<String, (String, Vec<String>)>,
    /// Parameter name -> values.
    parameters: BTreeMap<String, Vec<String>>,
    /// Raw request body.
    body: Vec<u8>,
    /// Attributes set by the container or by servlets.
    attributes: BTreeMap<String, String>,
}

impl Request {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The request method token.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = method.into();
    }

    /// The request path, without the query string.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    /// The protocol version from the request line.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    // =========================================================================
    // HEADERS
    // =========================================================================

    /// First value of the named header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Iterate headers as (name as received, first value).
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.values().filter_map(|(name, values)| {
            values.first().map(|value| (name.as_str(), value.as_str()))
        })
    }

    /// Add a header, replacing any header with the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .insert(name.to_ascii_lowercase(), (name, vec![value.into()]));
    }

    /// Check whether the named header is present.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    /// First value of the named query or form parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All parameters, ordered by name.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.parameters
    }

    /// Add a parameter, replacing any parameter with the same name.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), vec![value.into()]);
    }

    // =========================================================================
    // BODY & ATTRIBUTES
    // =========================================================================

    /// The raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// The named request attribute, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

// =============================================================================
// TESTS
// =============================================================================
