//! Container-generated error responses (400, 404, 405, 500).

use crate::http::HTTP_VERSION;
use std::io::{self, Write};

/// Footer shown on every error page.
pub const SERVER_SIGNATURE: &str = "Webtainer (Rust Web Container)";

/// Render the HTML error page for a status.
#[must_use]
pub fn render_error_page(status: u16, reason: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html>\
         <head>\
         <meta charset='UTF-8'>\
         <title>HTTP Status {status} – {reason}</title>\
         <style type='text/css'>\
         body {{font-family: Tahoma, Arial, sans-serif; background-color: #fff; color: #000;}}\
         h1 {{font-size: 22px; font-weight: bold; margin: 20px 0 10px;}}\
         p {{margin: 5px 0;}}\
         hr {{border: none; border-top: 1px solid #aaa; margin: 20px 0;}}\
         .footer {{font-size: 12px; color: #555;}}\
         </style>\
         </head>\
         <body>\
         <h1>HTTP Status {status} – {reason}</h1>\
         <p>The server encountered an error while processing your request.</p>\
         <hr/>\
         <div class='footer'>{SERVER_SIGNATURE}</div>\
         </body>\
         </html>"
    )
}

/// Write a complete error response (head and page) to `out`.
pub fn write_error_response<W: Write + ?Sized>(out: &mut W, status: u16, reason: &str) -> io::Result<()> {
    let page = render_error_page(status, reason);
    write!(
        out,
        "{HTTP_VERSION} {status} {reason}\r\n\
         Content-Type: text/html; charset=UTF-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {page}",
        page.len()
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_status_and_reason() {
        let page = render_error_page(404, "Not Found");
        assert!(page.contains("<title>HTTP Status 404 – Not Found</title>"));
        assert!(page.contains("<h1>HTTP Status 404 – Not Found</h1>"));
        assert!(page.contains("The server encountered an error while processing your request."));
        assert!(page.contains(SERVER_SIGNATURE));
    }

    #[test]
    fn response_has_head_and_page() {
        let mut out = Vec::new();
        write_error_response(&mut out, 500, "Internal Server Error").unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(output.contains("Content-Type: text/html; charset=UTF-8\r\n"));
        assert!(output.contains("Connection: close\r\n\r\n<!DOCTYPE html>"));

        let (_, page) = output.split_once("\r\n\r\n").unwrap();
        assert!(output.contains(&format!("Content-Length: {}\r\n", page.len())));
    }
}
