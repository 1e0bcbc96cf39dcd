//! # Request Parser
//!
//! Reads a single HTTP/1.1 request (request line, headers, optional form
//! body) from any `BufRead`.
//!
//! Lines end with `\n`; a preceding `\r` is stripped, so both CRLF and bare
//! LF framing are accepted.

use super::Request;
use std::io::{self, BufRead, Read};
use thiserror::Error;

/// The request line is always `METHOD TARGET VERSION`.
const REQUEST_LINE_PARTS: usize = 3;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced while parsing a request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading from the connection failed.
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),

    /// The connection closed, or sent a blank line, before a request line.
    #[error("Empty HTTP request line")]
    EmptyRequestLine,

    /// The request line did not have exactly three parts.
    #[error("Invalid HTTP request line: {0}")]
    InvalidRequestLine(String),

    /// A header line had no name or no colon.
    #[error("Invalid HTTP header line: {0}")]
    InvalidHeaderLine(String),

    /// The Content-Length header was not a non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// A request or header line exceeded the configured limit.
    #[error("HTTP line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// More header lines than the configured limit.
    #[error("HTTP request has more than {limit} headers")]
    TooManyHeaders { limit: usize },

    /// The declared body is larger than the configured limit.
    #[error("HTTP body of {length} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { length: usize, limit: usize },

    /// The request head was not valid UTF-8.
    #[error("HTTP request head is not valid UTF-8")]
    InvalidEncoding,
}

// =============================================================================
// LIMITS
// =============================================================================

/// Default maximum length of one request or header line.
pub const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024;

/// Default maximum number of header lines.
pub const DEFAULT_MAX_HEADERS: usize = 100;

/// Default maximum body size (1 MiB).
pub const DEFAULT_MAX_BODY_LEN: usize = 1024 * 1024;

/// Bounds applied while reading a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum bytes in one line, excluding the line terminator.
    pub max_line_len: usize,
    /// Maximum number of header lines.
    pub max_headers: usize,
    /// Maximum accepted Content-Length.
    pub max_body_len: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_headers: DEFAULT_MAX_HEADERS,
            max_body_len: DEFAULT_MAX_BODY_LEN,
        }
    }
}

// =============================================================================
// PARSER
// =============================================================================

/// Parses HTTP requests under a set of limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestParser {
    limits: ParseLimits,
}

impl RequestParser {
    /// Create a parser with the given limits.
    #[must_use]
    pub fn new(limits: ParseLimits) -> Self {
        Self { limits }
    }

    /// The limits this parser enforces.
    #[must_use]
    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    /// Parse one request from `reader`.
    ///
    /// The query string and, for `POST` form submissions, the body are
    /// decoded into request parameters.
    pub fn parse<R: BufRead>(&self, reader: &mut R) -> Result<Request, ParseError> {
        let mut request = Request::new();

        // Request line, e.g. "GET /path?name=deep HTTP/1.1"
        let line = match self.read_line(reader)? {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(ParseError::EmptyRequestLine),
        };

        let parts: Vec<&str> = line.split(' ').collect();
        if parts.len() != REQUEST_LINE_PARTS {
            return Err(ParseError::InvalidRequestLine(line));
        }
        let (method, target, version) = (parts[0], parts[1], parts[2]);

        request.set_method(method);
        request.set_version(version);

        match target.split_once('?') {
            Some((path, query)) => {
                request.set_uri(path);
                parse_parameters(&mut request, query);
            }
            None => request.set_uri(target),
        }

        // Headers
        let mut header_count = 0usize;
        while let Some(line) = self.read_line(reader)? {
            if line.is_empty() {
                break;
            }
            header_count += 1;
            if header_count > self.limits.max_headers {
                return Err(ParseError::TooManyHeaders {
                    limit: self.limits.max_headers,
                });
            }
            match line.find(':') {
                Some(colon) if colon > 0 => {
                    let name = line[..colon].trim();
                    let value = line[colon + 1..].trim();
                    request.add_header(name, value);
                }
                _ => return Err(ParseError::InvalidHeaderLine(line)),
            }
        }

        if request.method() == "POST" {
            self.read_body(reader, &mut request)?;
        }

        tracing::trace!(
            method = %request.method(),
            uri = %request.uri(),
            headers = header_count,
            body_len = request.body().len(),
            "parsed request"
        );

        Ok(request)
    }

    /// Read the body announced by Content-Length.
    ///
    /// A short body (EOF before Content-Length bytes) is accepted as-is.
    fn read_body<R: BufRead>(&self, reader: &mut R, request: &mut Request) -> Result<(), ParseError> {
        let Some(raw_length) = request.header("Content-Length") else {
            return Ok(());
        };
        let length: usize = raw_length
            .parse()
            .map_err(|_| ParseError::InvalidContentLength(raw_length.to_string()))?;
        if length == 0 {
            return Ok(());
        }
        if length > self.limits.max_body_len {
            return Err(ParseError::BodyTooLarge {
                length,
                limit: self.limits.max_body_len,
            });
        }

        let mut body = Vec::with_capacity(length);
        reader.by_ref().take(length as u64).read_to_end(&mut body)?;

        let is_form = request.header("Content-Type").is_none_or(|content_type| {
            content_type
                .to_ascii_lowercase()
                .starts_with(FORM_CONTENT_TYPE)
        });
        if is_form && !body.is_empty() {
            let text = String::from_utf8_lossy(&body).into_owned();
            parse_parameters(request, &text);
        }

        request.set_body(body);
        Ok(())
    }

    /// Read one line without its terminator. `None` at EOF.
    fn read_line<R: BufRead>(&self, reader: &mut R) -> Result<Option<String>, ParseError> {
        let limit = self.limits.max_line_len;
        let mut buf = Vec::new();
        // Room for the CRLF terminator on a line of exactly `limit` bytes.
        let read = reader
            .by_ref()
            .take(limit as u64 + 2)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        if buf.len() > limit {
            return Err(ParseError::LineTooLong { limit });
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|_| ParseError::InvalidEncoding)
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Decode `name=value&name2=value2` into request parameters.
///
/// Empty pairs are skipped; a pair without `=` gets an empty value.
fn parse_parameters(request: &mut Request, query: &str) {
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        request.add_parameter(decode_component(name), decode_component(value));
    }
}

/// Form-decode one component: `+` is a space, then percent-decoding.
/// Text that does not decode to UTF-8 is kept raw.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(raw: &str) -> Result<Request, ParseError> {
        RequestParser::default().parse(&mut Cursor::new(raw.as_bytes()))
    }

    #[test]
    fn parses_query_and_headers() {
        let raw = "GET /test?param=value http/1.1\nHost: localhost\nConnection: keep-alive\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.uri(), "/test");
        assert_eq!(request.version(), "http/1.1");
        assert_eq!(request.parameter("param"), Some("value"));
        assert_eq!(request.header("Host"), Some("localhost"));
        assert_eq!(request.header("Connection"), Some("keep-alive"));
    }

    #[test]
    fn parses_crlf_framing() {
        let raw = "GET /index HTTP/1.1\r\nHost: example.org\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.uri(), "/index");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.header("Host"), Some("example.org"));
    }

    #[test]
    fn post_without_body_has_no_parameters() {
        let raw = "POST /submit HTTP/1.1\nContent-Type: application/json\n\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri(), "/submit");
        assert!(request.parameters().is_empty());
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn post_form_body_becomes_parameters() {
        let raw = "POST /submit HTTP/1.1\n\
                   Content-Type: application/x-www-form-urlencoded\n\
                   Content-Length: 16\n\
                   \n\
                   name=John&age=25";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("Content-Length"), Some("16"));
        assert_eq!(request.parameter("name"), Some("John"));
        assert_eq!(request.parameter("age"), Some("25"));
        assert_eq!(request.body(), b"name=John&age=25");
    }

    #[test]
    fn body_is_read_only_up_to_content_length() {
        let raw = "POST /submit HTTP/1.1\nContent-Length: 5\n\nx=abcEXTRA";
        let request = parse(raw).unwrap();

        assert_eq!(request.body(), b"x=abc");
        assert_eq!(request.parameter("x"), Some("abc"));
    }

    #[test]
    fn non_form_body_is_kept_raw() {
        let raw = "POST /api HTTP/1.1\nContent-Type: application/json\nContent-Length: 9\n\n{\"a\":\"b\"}";
        let request = parse(raw).unwrap();

        assert_eq!(request.body(), br#"{"a":"b"}"#);
        assert!(request.parameters().is_empty());
    }

    #[test]
    fn get_ignores_body() {
        let raw = "GET /x HTTP/1.1\nContent-Length: 3\n\na=b";
        let request = parse(raw).unwrap();
        assert!(request.body().is_empty());
        assert!(request.parameters().is_empty());
    }

    #[test]
    fn parameters_are_form_decoded() {
        let request = parse("GET /search?q=hello+world&name=J%C3%BCrgen&flag HTTP/1.1\n\n").unwrap();

        assert_eq!(request.parameter("q"), Some("hello world"));
        assert_eq!(request.parameter("name"), Some("Jürgen"));
        assert_eq!(request.parameter("flag"), Some(""));
    }

    #[test]
    fn empty_pairs_are_skipped() {
        let request = parse("GET /p?a=1&&b=2& HTTP/1.1\n\n").unwrap();
        assert_eq!(request.parameters().len(), 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse(""), Err(ParseError::EmptyRequestLine)));
        assert!(matches!(parse("   \r\n"), Err(ParseError::EmptyRequestLine)));
    }

    #[test]
    fn invalid_request_line_is_rejected() {
        let err = parse("INVALID_REQUEST_LINE\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidRequestLine(_)));
        assert!(err.to_string().contains("Invalid HTTP request line"));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let err = parse("GET /test HTTP/1.1\nBadHeaderLine withoutColon\n").unwrap_err();
        assert!(err.to_string().contains("Invalid HTTP header line"));

        let err = parse("GET /test HTTP/1.1\n: no-name\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeaderLine(_)));
    }

    #[test]
    fn invalid_content_length_is_rejected() {
        let err = parse("POST /x HTTP/1.1\nContent-Length: lots\n\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(v) if v == "lots"));
    }

    #[test]
    fn limits_are_enforced() {
        let parser = RequestParser::new(ParseLimits {
            max_line_len: 32,
            max_headers: 1,
            max_body_len: 4,
        });

        let long_line = format!("GET /{} HTTP/1.1\n\n", "a".repeat(64));
        let err = parser.parse(&mut Cursor::new(long_line.as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::LineTooLong { limit: 32 }));

        let many_headers = "GET / HTTP/1.1\nA: 1\nB: 2\n\n";
        let err = parser.parse(&mut Cursor::new(many_headers.as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::TooManyHeaders { limit: 1 }));

        let big_body = "POST / HTTP/1.1\nContent-Length: 10\n\n0123456789";
        let err = parser.parse(&mut Cursor::new(big_body.as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::BodyTooLarge { length: 10, limit: 4 }));
    }

    #[test]
    fn line_of_exactly_the_limit_is_accepted() {
        let parser = RequestParser::new(ParseLimits {
            max_line_len: 16,
            ..ParseLimits::default()
        });
        // "GET /abcd HTTP/1" is 16 bytes
        let raw = "GET /abcd HTTP/1\r\n\r\n";
        let request = parser.parse(&mut Cursor::new(raw.as_bytes())).unwrap();
        assert_eq!(request.uri(), "/abcd");
    }
}
