//! Graceful-shutdown trigger for the HTTP server.

use std::future::Future;
use std::io;

use tracing::{info, warn};

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = wait_for("Ctrl-C", tokio::signal::ctrl_c());

  #[cfg(unix)]
  let terminate = wait_for("SIGTERM", async {
    let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    sig.recv().await;
    Ok::<(), io::Error>(())
  });

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  info!("shutdown signal received");
}

/// A handler that fails to install never fires; it must not stop the server.
async fn wait_for<F>(name: &str, signal: F)
where
  F: Future<Output = io::Result<()>>,
{
  if let Err(e) = signal.await {
    warn!(signal = name, error = %e, "failed to install signal handler");
    std::future::pending::<()>().await;
  }
}
