//! Server lifecycle.
//!
//! ```text
//! Server::bind ──▶ Running ──stop()──▶ Draining ──all connections done──▶ Stopped
//! ```
//!
//! `bind` creates the listening socket, so the server is `Running` from then
//! on: connections queue in the backlog until `run` starts accepting them.
//! `stop` cancels the shutdown token; the accept loop exits, the listening
//! socket is closed and `run` waits for every in-flight connection with no
//! time limit. Dropping the server, or the `run` future, also stops it.

pub mod listener;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::config::Config;
use crate::http::resolver::PathResolver;
use listener::{bind_endpoint, Acceptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Running,
    Draining,
}

pub struct Server {
    acceptor: Acceptor,
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    state: watch::Sender<ServerState>,
    _stop_on_drop: DropGuard,
}

impl Server {
    /// Binds the listening socket for `config`.
    ///
    /// The web root must already exist. Socket and bind failures are returned
    /// as-is for the caller to treat as fatal.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        let resolver = PathResolver::new(&config.web_root).with_context(|| {
            format!("web root {} is not accessible", config.web_root.display())
        })?;

        let listener = bind_endpoint(config.listen_addr())?;
        let acceptor = Acceptor::new(listener, Arc::new(resolver));
        let local_addr = acceptor.local_addr()?;

        info!("Listening on {}", local_addr);
        info!("Serving files from {}", config.web_root.display());

        let shutdown = CancellationToken::new();
        let (state, _) = watch::channel(ServerState::Running);

        Ok(Self {
            acceptor,
            local_addr,
            _stop_on_drop: shutdown.clone().drop_guard(),
            shutdown,
            state,
        })
    }

    /// The bound address; reports the real port when bound to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
            state: self.state.subscribe(),
            tracker: self.acceptor.tracker(),
        }
    }

    /// Accepts connections until stopped, then drains in-flight connections.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            acceptor,
            shutdown,
            state,
            _stop_on_drop,
            ..
        } = self;

        let result = acceptor.accept_loop(&shutdown).await;

        state.send_replace(ServerState::Draining);
        info!("Stopped accepting connections");

        acceptor.drain().await;

        state.send_replace(ServerState::Stopped);
        info!("Server stopped");

        result
    }
}

/// Cloneable control handle for a bound [`Server`].
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: CancellationToken,
    state: watch::Receiver<ServerState>,
    tracker: TaskTracker,
}

impl ServerHandle {
    /// Stops accepting new connections. Connections already accepted finish.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Whether stop has been requested, by `stop` or by dropping the server.
    pub fn is_stopping(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Connections currently being served.
    pub fn active_connections(&self) -> usize {
        self.tracker.len()
    }

    /// Resolves once the server has drained and stopped.
    pub async fn stopped(&mut self) {
        // A closed channel means the server is gone, which is stopped too.
        let _ = self
            .state
            .wait_for(|state| *state == ServerState::Stopped)
            .await;
    }
}
