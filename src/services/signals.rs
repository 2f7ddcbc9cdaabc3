//! Shutdown signal handling.
//!
//! SIGINT/SIGTERM stop the listener and give in-flight requests up to the
//! configured timeout to finish.

use std::process::ExitCode;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::utils::fmt_duration;

/// Wait for a shutdown signal (or the server dying on its own), then drain.
///
/// Exits successfully only when the server drains within `shutdown_timeout`.
pub async fn handle_shutdown_signals(
    mut server: JoinHandle<anyhow::Result<()>>,
    shutdown: CancellationToken,
    shutdown_timeout: Duration,
) -> ExitCode {
    tokio::select! {
        result = &mut server => {
            match result {
                Ok(Ok(())) => error!("web server exited unexpectedly"),
                Ok(Err(e)) => error!(error = ?e, "web server failed"),
                Err(e) => error!(error = ?e, "web server task panicked"),
            }
            return ExitCode::FAILURE;
        }
        signal = shutdown_signal() => {
            info!(
                signal,
                timeout = fmt_duration(shutdown_timeout),
                "shutdown signal received, draining in-flight requests"
            );
        }
    }

    drain(server, shutdown, shutdown_timeout).await
}

/// Cancel `shutdown` and wait up to `shutdown_timeout` for the server to finish.
///
/// A server still running at the deadline is aborted.
pub async fn drain(
    mut server: JoinHandle<anyhow::Result<()>>,
    shutdown: CancellationToken,
    shutdown_timeout: Duration,
) -> ExitCode {
    shutdown.cancel();

    match tokio::time::timeout(shutdown_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => {
            info!("graceful shutdown complete");
            ExitCode::SUCCESS
        }
        Ok(Ok(Err(e))) => {
            error!(error = ?e, "web server failed during shutdown");
            ExitCode::FAILURE
        }
        Ok(Err(e)) => {
            error!(error = ?e, "web server task panicked during shutdown");
            ExitCode::FAILURE
        }
        Err(_) => {
            warn!(
                timeout = fmt_duration(shutdown_timeout),
                "graceful shutdown timed out, abandoning in-flight requests"
            );
            server.abort();
            ExitCode::FAILURE
        }
    }
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
