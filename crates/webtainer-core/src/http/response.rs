//! # Response Writer
//!
//! A response writes straight onto the connection. The status line and
//! headers (the "head") are committed exactly once: on the first body
//! write, on `writer()`, on `send_redirect()` or on `flush()`.

use super::{reason_phrase, DEFAULT_CONTENT_TYPE, HTTP_VERSION};
use std::borrow::Cow;
use std::io::{self, Write};

/// An HTTP response bound to an output stream.
pub struct Response<'a> {
    /// The connection, or any sink in tests.
    out: &'a mut dyn Write,
    status: u16,
    reason: Cow<'static, str>,
    /// Headers in insertion order.
    headers: Vec<(String, String)>,
    /// Whether the head has been written.
    committed: bool,
}

impl<'a> Response<'a> {
    /// Create a `200 OK` response writing to `out`.
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            status: 200,
            reason: Cow::Borrowed("OK"),
            headers: Vec::new(),
            committed: false,
        }
    }

    /// The current status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set the status code; the reason phrase follows from it.
    pub fn set_status(&mut self, status: u16) {
        if self.committed {
            tracing::debug!(status, "status set after response was committed; ignored");
            return;
        }
        self.status = status;
        self.reason = reason_phrase(status);
    }

    /// The named header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing an existing header of the same name.
    ///
    /// A name or value containing CR or LF would split the head; such a
    /// header is dropped.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.committed {
            tracing::debug!(header = %name, "header set after response was committed; ignored");
            return;
        }
        let value = value.into();
        if has_line_break(&name) || has_line_break(&value) {
            tracing::warn!(header = %name.escape_debug(), "header contains CR or LF; dropped");
            return;
        }
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Redirect the client to `location` with a `302 Found`.
    ///
    /// Fails with `InvalidInput` if `location` contains CR or LF.
    pub fn send_redirect(&mut self, location: &str) -> io::Result<()> {
        if has_line_break(location) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "redirect location contains CR or LF",
            ));
        }
        self.set_status(302);
        self.set_header("Location", location);
        self.commit()
    }

    /// Commit the head and return the body writer.
    pub fn writer(&mut self) -> io::Result<&mut dyn Write> {
        self.commit()?;
        Ok(&mut *self.out)
    }

    /// Whether the head has been written.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Write the status line and headers, once.
    fn commit(&mut self) -> io::Result<()> {
        if self.committed {
            return Ok(());
        }
        if self.header("Content-Type").is_none() {
            self.headers
                .push(("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()));
        }

        let mut head = format!("{HTTP_VERSION} {} {}\r\n", self.status, self.reason);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        self.out.write_all(head.as_bytes())?;
        self.committed = true;
        Ok(())
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

impl Write for Response<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.commit()?;
        self.out.write(buf)
    }

    /// Commits the head if nothing was written yet, then flushes.
    fn flush(&mut self) -> io::Result<()> {
        self.commit()?;
        self.out.flush()
    }
}

// =============================================================================
// TESTS
// =============================================================================
