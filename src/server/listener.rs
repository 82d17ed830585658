use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::http::connection::Connection;
use crate::http::resolver::PathResolver;

/// Pending-connection queue length passed to `listen`.
pub const BACKLOG: u32 = 10;

/// Connections served at once. Beyond this the acceptor stops calling
/// `accept` until a connection finishes.
pub const MAX_CONNECTIONS: usize = 1024;

/// Creates the listening socket: IPv4, `SO_REUSEADDR`, bound and listening.
pub fn bind_endpoint(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = TcpSocket::new_v4().context("failed to create socket")?;
    socket
        .set_reuseaddr(true)
        .context("failed to set socket options")?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {}", addr))?;
    socket.listen(BACKLOG).context("failed to listen")
}

/// Owns the listening socket and the connection tasks it spawns.
pub struct Acceptor {
    listener: TcpListener,
    resolver: Arc<PathResolver>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
}

impl Acceptor {
    pub fn new(listener: TcpListener, resolver: Arc<PathResolver>) -> Self {
        Self {
            listener,
            resolver,
            permits: Arc::new(Semaphore::new(MAX_CONNECTIONS)),
            tracker: TaskTracker::new(),
        }
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// Accepts connections until `shutdown` is cancelled.
    ///
    /// Each connection runs on its own task holding one permit. Accept errors
    /// are logged and the loop keeps going.
    pub async fn accept_loop(&self, shutdown: &CancellationToken) -> anyhow::Result<()> {
        loop {
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                permit = self.permits.clone().acquire_owned() => permit?,
            };

            let (socket, peer) = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        if !shutdown.is_cancelled() {
                            warn!(error = %e, "Failed to accept connection");
                        }
                        continue;
                    }
                },
            };
            debug!("Accepted connection from {}", peer);

            let resolver = self.resolver.clone();
            self.tracker.spawn(async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, resolver, peer);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {:#}", peer, e);
                }
            });
        }

        Ok(())
    }

    /// Closes the listening socket and waits for every spawned connection task.
    pub async fn drain(self) {
        let Acceptor {
            listener, tracker, ..
        } = self;
        drop(listener);

        tracker.close();
        if !tracker.is_empty() {
            info!(in_flight = tracker.len(), "Waiting for in-flight connections");
        }
        tracker.wait().await;
    }
}
