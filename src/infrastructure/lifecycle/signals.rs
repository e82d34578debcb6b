//! OS signal handling.
//!
//! SIGINT and SIGTERM both request a graceful shutdown.

use std::io;

use super::ShutdownHandle;

/// Wait for a termination signal, then trigger the shutdown handle
pub async fn listen(shutdown: ShutdownHandle) -> io::Result<()> {
    termination().await?;
    tracing::info!("Shutdown signal received, shutting down gracefully");
    shutdown.shutdown();
    Ok(())
}

#[cfg(unix)]
async fn termination() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn termination() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
