//! Server configuration: command-line flags with environment fallbacks.

use clap::Args;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use webtainer_core::ParseLimits;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVLET_CONFIG: &str = "servlet.properties";
pub const DEFAULT_MAX_CONNECTIONS: usize = 256;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Server flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, global = true, env = "WEBTAINER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, global = true, env = "WEBTAINER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Servlet mapping file (.properties or .json)
    #[arg(long, global = true, env = "WEBTAINER_SERVLET_CONFIG", default_value = DEFAULT_SERVLET_CONFIG)]
    pub servlet_config: PathBuf,

    /// Maximum connections served at once
    #[arg(long, global = true, env = "WEBTAINER_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Socket read timeout in seconds (0 disables)
    #[arg(long, global = true, env = "WEBTAINER_READ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,

    /// Socket write timeout in seconds (0 disables)
    #[arg(long, global = true, env = "WEBTAINER_WRITE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub write_timeout_secs: u64,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub servlet_config: PathBuf,
    /// Always at least 1.
    pub max_connections: usize,
    /// `None` disables the timeout.
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub limits: ParseLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            servlet_config: PathBuf::from(DEFAULT_SERVLET_CONFIG),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            write_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            limits: ParseLimits::default(),
        }
    }
}

impl Config {
    /// The socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl From<ServerArgs> for Config {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            servlet_config: args.servlet_config,
            max_connections: args.max_connections.max(1),
            read_timeout: timeout(args.read_timeout_secs),
            write_timeout: timeout(args.write_timeout_secs),
            limits: ParseLimits::default(),
        }
    }
}

/// Zero means "no timeout"; std sockets reject a zero duration.
fn timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
