//! # Webtainer Core
//!
//! The synchronous model of the Webtainer servlet container.
//!
//! ```text
//! bytes ─► RequestParser ─► Request ─► ServletRegistry::get(uri) ─► Servlet::service
//!                                                                     │
//!                                                   Response ◄────────┘
//! ```
//!
//! Everything here works on `BufRead` / `Write`, so the container logic
//! can be exercised without sockets. The `webtainer` app supplies the
//! network, the configuration file and the process lifecycle.

pub mod error_page;
pub mod factory;
pub mod http;
pub mod loader;
pub mod mapping;
pub mod registry;
pub mod servlet;

pub use error_page::{render_error_page, write_error_response};
pub use factory::{FactoryError, ServletFactory};
pub use http::{Method, ParseError, ParseLimits, Request, RequestParser, Response};
pub use loader::{LoadError, MappingLoader, ServletLoader};
pub use mapping::{MappingError, MappingFormat, ServletMappings};
pub use registry::{DefaultServletRegistry, RegistryError, ServletRegistry};
pub use servlet::{Servlet, ServletError, WelcomeServlet};
