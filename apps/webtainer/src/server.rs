//! # Web Container
//!
//! The tokio accept loop. Each accepted connection is converted to a
//! blocking std stream and served on the blocking pool, so servlets can
//! use plain `std::io::Write`. A semaphore bounds in-flight connections.
//!
//! Shutdown order: stop accepting, drain in-flight connections, then
//! destroy every servlet.

use crate::config::Config;
use crate::handler::ConnectionHandler;
use std::future::Future;
use std::io::{self, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use webtainer_core::{RequestParser, ServletRegistry};

// =============================================================================
// SHUTDOWN HANDLE
// =============================================================================

/// Triggers a graceful stop of a running container.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask the container to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// A future that completes once `trigger` has been called.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            while !*rx.borrow_and_update() {
                // All handles dropped; treat as a stop request.
                if rx.changed().await.is_err() {
                    return;
                }
            }
        }
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

/// A configured, not yet listening container.
pub struct WebContainer {
    config: Config,
    registry: Arc<dyn ServletRegistry>,
}

impl WebContainer {
    pub fn new(config: Config, registry: Arc<dyn ServletRegistry>) -> Self {
        Self { config, registry }
    }

    /// Bind the listening socket.
    pub async fn bind(self) -> io::Result<BoundContainer> {
        let listener = TcpListener::bind(self.config.addr()).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(
            %local_addr,
            servlets = self.registry.len(),
            max_connections = self.config.max_connections,
            "webtainer listening"
        );
        Ok(BoundContainer {
            listener,
            local_addr,
            config: self.config,
            registry: self.registry,
        })
    }
}

/// A listening container, ready to `run`.
pub struct BoundContainer {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Config,
    registry: Arc<dyn ServletRegistry>,
}

impl BoundContainer {
    /// The address actually bound (resolves port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let Self {
            listener,
            local_addr,
            config,
            registry,
        } = self;

        let handler = ConnectionHandler::new(Arc::clone(&registry), RequestParser::new(config.limits));
        let permits = Arc::new(Semaphore::new(config.max_connections.max(1)));
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            reap_finished(&mut connections);

            let permit = tokio::select! {
                () = &mut shutdown => break,
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (stream, peer) = tokio::select! {
                () = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                },
            };

            let stream = match stream.into_std().and_then(|s| s.set_nonblocking(false).map(|()| s)) {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(%peer, error = %err, "failed to prepare connection");
                    continue;
                }
            };

            let handler = handler.clone();
            let (read_timeout, write_timeout) = (config.read_timeout, config.write_timeout);
            connections.spawn_blocking(move || {
                let _permit = permit;
                serve_connection(&handler, stream, peer, read_timeout, write_timeout);
            });
        }

        drop(listener);
        tracing::info!(
            %local_addr,
            in_flight = connections.len(),
            "webtainer stopping; draining connections"
        );
        while let Some(joined) = connections.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "connection worker failed");
            }
        }

        registry.destroy_all();
        tracing::info!(%local_addr, "webtainer stopped");
        Ok(())
    }
}

/// Log workers that finished since the last pass and free their slots.
fn reap_finished(connections: &mut JoinSet<()>) {
    while let Some(joined) = connections.try_join_next() {
        if let Err(err) = joined {
            tracing::error!(error = %err, "connection worker failed");
        }
    }
}

/// Serve one connection on the current (blocking) thread.
fn serve_connection(
    handler: &ConnectionHandler,
    stream: TcpStream,
    peer: SocketAddr,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
) {
    let span = tracing::info_span!("connection", %peer);
    let _entered = span.enter();

    if let Err(err) = stream
        .set_read_timeout(read_timeout)
        .and_then(|()| stream.set_write_timeout(write_timeout))
    {
        tracing::warn!(error = %err, "failed to configure socket timeouts");
        return;
    }

    let outcome = handler.handle(&stream, BufWriter::new(&stream));
    tracing::debug!(?outcome, "connection finished");

    // Half-close so the client sees EOF after the response.
    if let Err(err) = stream.shutdown(Shutdown::Write) {
        tracing::debug!(error = %err, "failed to shut down connection");
    }
}
