//! Process-wide loopback relay: lazily bound on first use, shared by every player
//! session, stopped once when the host shuts down.

pub mod port;
mod serve;

use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;

use crate::http::{self, page::PlayerOptions, state::AppState};
use crate::relay::port::AllocationError;
use crate::video_id::VideoId;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Observable lifecycle of a [`Relay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStatus {
    Stopped,
    Starting,
    Listening { port: u16 },
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub player: PlayerOptions,
    /// Upper bound on how long [`Relay::stop`] lets open connections finish
    /// before tearing them down.
    pub shutdown_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            player: PlayerOptions::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("failed to bind 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Playable URL for `id` on a relay bound to `port`.
pub fn player_url(port: u16, id: &VideoId) -> String {
    format!("http://127.0.0.1:{}/?v={}", port, urlencoding::encode(id.as_str()))
}

/// A bound listener and the task serving it.
struct Running {
    port: u16,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Resets the published status to `Stopped` if a start attempt is dropped midway.
struct StartingGuard<'a> {
    status: &'a watch::Sender<RelayStatus>,
    armed: bool,
}

impl Drop for StartingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.status.send_replace(RelayStatus::Stopped);
        }
    }
}

/// Source of the port the relay binds. [`port::allocate`] unless overridden.
pub type Allocator = Arc<dyn Fn() -> Result<u16, AllocationError> + Send + Sync>;

pub struct Relay {
    config: RelayConfig,
    allocator: Allocator,
    /// Held across the whole allocate + bind sequence, so concurrent starters
    /// queue behind the first and then observe its listener.
    running: Mutex<Option<Running>>,
    status: watch::Sender<RelayStatus>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self::with_allocator(config, Arc::new(port::allocate))
    }

    /// Relay whose start asks `allocator` for the port instead of the OS.
    pub fn with_allocator(config: RelayConfig, allocator: Allocator) -> Self {
        let (status, _) = watch::channel(RelayStatus::Stopped);
        Self {
            config,
            allocator,
            running: Mutex::new(None),
            status,
        }
    }

    pub fn status(&self) -> RelayStatus {
        *self.status.borrow()
    }

    /// Watch status transitions (`Stopped → Starting → Listening → Stopped`).
    pub fn subscribe(&self) -> watch::Receiver<RelayStatus> {
        self.status.subscribe()
    }

    /// Bound port, only while listening.
    pub fn port(&self) -> Option<u16> {
        match self.status() {
            RelayStatus::Listening { port } => Some(port),
            _ => None,
        }
    }

    /// `http://127.0.0.1:<port>/?v=<id>`, or None if the relay is not listening.
    /// Await [`Relay::ensure_started`] before handing the URL to a player.
    pub fn url_for(&self, id: &VideoId) -> Option<String> {
        self.port().map(|port| player_url(port, id))
    }

    /// Start the relay if needed and return its port.
    ///
    /// Idempotent: once listening, every call returns the same port without binding again.
    /// Callers racing a start in progress wait for it and get its port.
    pub async fn ensure_started(&self) -> Result<u16, RelayError> {
        let mut running = self.running.lock().await;
        if let Some(r) = running.as_ref() {
            return Ok(r.port);
        }

        self.status.send_replace(RelayStatus::Starting);
        let mut guard = StartingGuard { status: &self.status, armed: true };
        let started = self.start().await;
        guard.armed = false;

        match started {
            Ok(r) => {
                let port = r.port;
                *running = Some(r);
                self.status.send_replace(RelayStatus::Listening { port });
                Ok(port)
            }
            Err(e) => {
                tracing::error!("Relay failed to start: {}", e);
                self.status.send_replace(RelayStatus::Stopped);
                Err(e)
            }
        }
    }

    async fn start(&self) -> Result<Running, RelayError> {
        let port = (self.allocator)()?;
        let addr = SocketAddrV4::new(Ipv4Addr::LOCALHOST, port);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| RelayError::Bind { port, source })?;

        let app = http::build_router(AppState::new(port, self.config.player));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve::serve(
            listener,
            app,
            shutdown_rx,
            self.config.shutdown_timeout,
        ));

        tracing::info!("Relay listening on http://{}", addr);
        Ok(Running { port, shutdown_tx, task })
    }

    /// Stop serving and forget the port. No-op when already stopped.
    ///
    /// The listener closes immediately. Open connections get at most
    /// `shutdown_timeout` to finish their current request; any still open after
    /// that are torn down before this returns.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        let Some(Running { port, shutdown_tx, task }) = running.take() else {
            return;
        };

        let _ = shutdown_tx.send(());
        if let Err(e) = task.await {
            tracing::error!("Relay task on port {} failed: {}", port, e);
        }

        self.status.send_replace(RelayStatus::Stopped);
        tracing::info!("Relay on port {} stopped", port);
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        if let Some(r) = self.running.get_mut().take() {
            let _ = r.shutdown_tx.send(());
            r.task.abort();
        }
    }
}
