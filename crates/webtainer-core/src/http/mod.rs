//! # HTTP Module
//!
//! The HTTP/1.1 subset spoken by the container.
//!
//! This module contains:
//! - `Method`: the request methods servlets can dispatch on
//! - `reason_phrase`: status code to reason phrase lookup
//! - `Request` + `RequestParser`: reading a request off a `BufRead`
//! - `Response`: writing a response onto a `Write`

mod parser;
mod request;
mod response;

pub use parser::{ParseError, ParseLimits, RequestParser};
pub use request::Request;
pub use response::Response;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Protocol version written on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Default content type for responses that do not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

// =============================================================================
// METHOD
// =============================================================================

/// The HTTP methods a servlet can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// Retrieve a resource.
    Get,
    /// Submit data to a resource.
    Post,
}

impl Method {
    /// The canonical method token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for method tokens the container does not dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Method not supported: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    /// Method tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Resolve the reason phrase for a status code.
///
/// Codes without a known phrase render as `HTTP Status <code>`.
#[must_use]
pub fn reason_phrase(code: u16) -> Cow<'static, str> {
    let phrase = match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        other => return Cow::Owned(format!("HTTP Status {other}")),
    };
    Cow::Borrowed(phrase)
}

// =============================================================================
// TESTS
// =============================================================================
