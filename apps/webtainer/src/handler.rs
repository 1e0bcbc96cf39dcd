//! # Connection Handler
//!
//! Serves exactly one request per connection: parse, route by exact path,
//! call the servlet, flush. Runs on a blocking worker thread.

use std::io::{BufReader, Read, Write};
use std::sync::Arc;
use std::time::Instant;
use webtainer_core::http::reason_phrase;
use webtainer_core::{
    write_error_response, ParseError, Request, RequestParser, Response, ServletRegistry,
};

/// What happened to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A servlet produced a response with this status.
    Served(u16),
    /// No servlet is registered for the path (404 sent).
    NotFound,
    /// The request could not be parsed (400 sent).
    BadRequest,
    /// The servlet failed; this status was sent, or would have been had
    /// the response not already been committed.
    Failed(u16),
    /// The client went away before a response could be sent.
    Closed,
}

impl Outcome {
    /// The status written to the client, if any.
    #[must_use]
    pub fn status(self) -> Option<u16> {
        match self {
            Self::Served(status) | Self::Failed(status) => Some(status),
            Self::NotFound => Some(404),
            Self::BadRequest => Some(400),
            Self::Closed => None,
        }
    }
}

/// Dispatches parsed requests to the registry.
#[derive(Clone)]
pub struct ConnectionHandler {
    registry: Arc<dyn ServletRegistry>,
    parser: RequestParser,
}

impl ConnectionHandler {
    pub fn new(registry: Arc<dyn ServletRegistry>, parser: RequestParser) -> Self {
        Self { registry, parser }
    }

    /// Serve one request read from `reader`, answering on `writer`.
    pub fn handle<R: Read, W: Write>(&self, reader: R, mut writer: W) -> Outcome {
        let started = Instant::now();
        let mut reader = BufReader::new(reader);

        let request = match self.parser.parse(&mut reader) {
            Ok(request) => request,
            Err(ParseError::EmptyRequestLine) => {
                tracing::debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "connection closed without a request"
                );
                return Outcome::Closed;
            }
            Err(ParseError::Io(err)) => {
                tracing::warn!(
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "failed to read request"
                );
                return Outcome::Closed;
            }
            Err(err) => {
                let outcome = send_error(&mut writer, 400, Outcome::BadRequest);
                tracing::warn!(
                    error = %err,
                    status = ?outcome.status(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "rejected malformed request"
                );
                return outcome;
            }
        };

        let outcome = self.dispatch(&request, &mut writer);
        tracing::info!(
            method = %request.method(),
            uri = %request.uri(),
            status = ?outcome.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );
        outcome
    }

    fn dispatch<W: Write>(&self, request: &Request, writer: &mut W) -> Outcome {
        let Some(servlet) = self.registry.get(request.uri()) else {
            return send_error(writer, 404, Outcome::NotFound);
        };

        let mut response = Response::new(&mut *writer);
        response.set_header("Connection", "close");

        match servlet.service(request, &mut response) {
            Ok(()) => match response.flush() {
                Ok(()) => Outcome::Served(response.status()),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to flush response");
                    Outcome::Closed
                }
            },
            Err(err) if response.is_committed() => {
                // Too late for an error page; the client sees a truncated body.
                tracing::error!(
                    servlet = servlet.name(),
                    error = %err,
                    "servlet failed after the response was committed"
                );
                if let Err(flush_err) = response.flush() {
                    tracing::debug!(error = %flush_err, "failed to flush partial response");
                }
                Outcome::Failed(err.status())
            }
            Err(err) => {
                tracing::error!(servlet = servlet.name(), error = %err, "servlet failed");
                drop(response);
                let status = err.status();
                send_error(writer, status, Outcome::Failed(status))
            }
        }
    }
}

/// Write the container error page; `Closed` if the client is gone.
fn send_error<W: Write + ?Sized>(writer: &mut W, status: u16, outcome: Outcome) -> Outcome {
    match write_error_response(writer, status, &reason_phrase(status)) {
        Ok(()) => outcome,
        Err(err) => {
            tracing::debug!(error = %err, status, "failed to send error response");
            Outcome::Closed
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
