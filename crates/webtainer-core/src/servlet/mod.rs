//! # Servlet Module
//!
//! The contract between the container and request handlers.
//!
//! A servlet is registered under an exact path, initialized once, shared
//! by every connection, and destroyed once on shutdown. The default
//! `service` dispatches on the request method to `do_get` / `do_post`.

mod welcome;

pub use welcome::WelcomeServlet;

use crate::http::{Method, Request, Response, UnsupportedMethod};
use std::io;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors a servlet can return while handling a request.
#[derive(Debug, Error)]
pub enum ServletError {
    /// The servlet does not handle this method.
    #[error("Method not supported: {0}")]
    MethodNotAllowed(String),

    /// Writing the response failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other failure inside the servlet.
    #[error("Servlet failed: {0}")]
    Failed(String),
}

impl ServletError {
    /// Create a generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The HTTP status the container answers with for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::Io(_) | Self::Failed(_) => 500,
        }
    }
}

impl From<UnsupportedMethod> for ServletError {
    fn from(err: UnsupportedMethod) -> Self {
        Self::MethodNotAllowed(err.0)
    }
}

// =============================================================================
// SERVLET TRAIT
// =============================================================================

/// A request handler hosted by the container.
pub trait Servlet: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Called once, before the servlet becomes reachable.
    fn init(&mut self) -> Result<(), ServletError> {
        Ok(())
    }

    /// Handle one request.
    ///
    /// The default dispatches `GET` to [`Servlet::do_get`] and `POST` to
    /// [`Servlet::do_post`]; any other method is `MethodNotAllowed`.
    fn service(&self, request: &Request, response: &mut Response<'_>) -> Result<(), ServletError> {
        match request.method().parse::<Method>()? {
            Method::Get => self.do_get(request, response),
            Method::Post => self.do_post(request, response),
        }
    }

    /// Handle a `GET` request.
    fn do_get(&self, _request: &Request, _response: &mut Response<'_>) -> Result<(), ServletError> {
        Err(ServletError::MethodNotAllowed(Method::Get.to_string()))
    }

    /// Handle a `POST` request.
    fn do_post(&self, _request: &Request, _response: &mut Response<'_>) -> Result<(), ServletError> {
        Err(ServletError::MethodNotAllowed(Method::Post.to_string()))
    }

    /// Called once on shutdown.
    fn destroy(&self) {}
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Recording {
        get_called: AtomicBool,
        post_called: AtomicBool,
    }

    impl Servlet for Recording {
        fn do_get(&self, _request: &Request, response: &mut Response<'_>) -> Result<(), ServletError> {
            self.get_called.store(true, Ordering::SeqCst);
            write!(response, "got")?;
            Ok(())
        }

        fn do_post(&self, _request: &Request, _response: &mut Response<'_>) -> Result<(), ServletError> {
            self.post_called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct GetOnly;

    impl Servlet for GetOnly {
        fn do_get(&self, _request: &Request, _response: &mut Response<'_>) -> Result<(), ServletError> {
            Ok(())
        }
    }

    fn request(method: &str) -> Request {
        let mut request = Request::new();
        request.set_method(method);
        request.set_uri("/");
        request
    }

    #[test]
    fn get_dispatches_to_do_get() {
        let servlet = Recording::default();
        let mut out = Vec::new();
        let mut response = Response::new(&mut out);

        servlet.service(&request("GET"), &mut response).unwrap();
        assert!(servlet.get_called.load(Ordering::SeqCst));
        assert!(!servlet.post_called.load(Ordering::SeqCst));
    }

    #[test]
    fn post_dispatches_to_do_post() {
        let servlet = Recording::default();
        let mut out = Vec::new();
        let mut response = Response::new(&mut out);

        servlet.service(&request("POST"), &mut response).unwrap();
        assert!(servlet.post_called.load(Ordering::SeqCst));
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let servlet = Recording::default();
        let mut out = Vec::new();
        let mut response = Response::new(&mut out);

        let err = servlet.service(&request("PUT"), &mut response).unwrap_err();
        assert!(matches!(&err, ServletError::MethodNotAllowed(m) if m == "PUT"));
        assert_eq!(err.status(), 405);
    }

    #[test]
    fn unimplemented_handler_is_method_not_allowed() {
        let mut out = Vec::new();
        let mut response = Response::new(&mut out);

        let err = GetOnly.service(&request("POST"), &mut response).unwrap_err();
        assert!(matches!(err, ServletError::MethodNotAllowed(m) if m == "POST"));
        assert!(!response.is_committed());
    }

    #[test]
    fn name_is_the_type_name() {
        assert_eq!(GetOnly.name(), "GetOnly");
    }

    #[test]
    fn failures_map_to_500() {
        assert_eq!(ServletError::failed("boom").status(), 500);
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert_eq!(ServletError::from(io_err).status(), 500);
    }
}
