//! Process lifecycle.
//!
//! ```text
//! Startup:  Config::from_env → build router → Server::bind → Server::run
//! Shutdown: signal / failed background task → ShutdownHandle::shutdown
//!           → stop accepting → drain in-flight requests → exit
//!           (forced after the grace period)
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::ShutdownHandle;

use axum::Router;
use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How long in-flight requests get to finish once shutdown starts
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished within the grace period
    Drained,
    /// The grace period ran out with requests still open
    Forced,
}

/// Owns the listener and the router until shutdown.
pub struct Server {
    listener: TcpListener,
    app: Router,
    shutdown: ShutdownHandle,
}

impl Server {
    pub async fn bind(addr: &str, app: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            app,
            shutdown: ShutdownHandle::new(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serve until the shutdown handle fires, then wait up to `grace` for
    /// open connections to finish.
    pub async fn run(self, grace: Duration) -> io::Result<ShutdownOutcome> {
        let Self {
            listener,
            app,
            shutdown,
        } = self;

        let signal = shutdown.clone();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.triggered().await })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result?;
                return Ok(ShutdownOutcome::Drained);
            }
            _ = shutdown.triggered() => {}
        }

        tracing::info!(
            grace_secs = grace.as_secs_f64(),
            "Stopped accepting connections, waiting for in-flight requests"
        );

        match tokio::time::timeout(grace, serve).await {
            Ok(result) => {
                result?;
                tracing::info!("Server closed");
                Ok(ShutdownOutcome::Drained)
            }
            Err(_) => {
                tracing::error!("Forced shutdown: in-flight requests did not finish in time");
                Ok(ShutdownOutcome::Forced)
            }
        }
    }
}

/// Spawn a background task whose failure must not go unnoticed. A panic or
/// an error result is logged and triggers a graceful shutdown.
pub fn spawn_supervised<F, E>(
    name: &'static str,
    shutdown: ShutdownHandle,
    task: F,
) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let inner = tokio::spawn(task);

    tokio::spawn(async move {
        match inner.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(task = name, error = %err, "Background task failed");
                shutdown.shutdown();
            }
            Err(err) if err.is_panic() => {
                tracing::error!(task = name, error = %err, "Background task panicked");
                shutdown.shutdown();
            }
            Err(_) => {}
        }
    })
}
