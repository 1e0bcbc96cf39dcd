//! The built-in landing page, mapped to `/` by the default configuration.

use super::{Servlet, ServletError};
use crate::http::{Request, Response};

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Welcome to Webtainer</title>
  <style>
    body { font-family: 'Segoe UI', Tahoma, sans-serif; margin: 0; background: #f4f7f9; color: #333; }
    header { background: #1d3557; color: #fff; padding: 24px 40px; text-align: center; }
    main { max-width: 860px; margin: 32px auto; padding: 0 20px; }
    h2 { color: #1d3557; border-bottom: 2px solid #457b9d; padding-bottom: 4px; }
    pre { background: #1e1e1e; color: #dcdcdc; padding: 16px; border-radius: 6px; overflow-x: auto; }
    footer { text-align: center; font-size: 12px; color: #777; padding: 24px 0; }
  </style>
</head>
<body>
  <header>
    <h1>Webtainer</h1>
    <p>A small servlet container written in Rust</p>
  </header>
  <main>
    <section>
      <h2>Overview</h2>
      <p>Webtainer accepts HTTP/1.1 connections, parses each request and hands it to the
      servlet registered for the exact request path.</p>
    </section>
    <section>
      <h2>Features</h2>
      <ul>
        <li>Exact-path routing from <code>servlet.properties</code> or <code>servlet.json</code></li>
        <li>GET and POST dispatch with query string and form body decoding</li>
        <li>Servlet lifecycle: <code>init</code> on registration, <code>destroy</code> on shutdown</li>
        <li>Error pages for 400, 404, 405 and 500</li>
      </ul>
    </section>
    <section>
      <h2>Usage</h2>
      <p>Map a path to a servlet name in <code>servlet.properties</code>:</p>
      <pre>/=welcome
/hello=hello</pre>
      <p>Implement the servlet and add it to the factory:</p>
      <pre>struct Hello;

impl Servlet for Hello {
    fn do_get(&amp;self, req: &amp;Request, resp: &amp;mut Response&lt;'_&gt;) -&gt; Result&lt;(), ServletError&gt; {
        let name = req.parameter("name").unwrap_or("world");
        write!(resp, "Hello, {name}!")?;
        Ok(())
    }
}

factory.register("hello", || Box::new(Hello));</pre>
    </section>
  </main>
  <footer>Webtainer (Rust Web Container)</footer>
</body>
</html>
"#;

/// Serves the Webtainer welcome page on `GET`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WelcomeServlet;

impl Servlet for WelcomeServlet {
    fn do_get(&self, _request: &Request, response: &mut Response<'_>) -> Result<(), ServletError> {
        response.set_header("Content-Type", "text/html; charset=UTF-8");
        response.writer()?.write_all(WELCOME_PAGE.as_bytes())?;
        Ok(())
    }
}
