use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::lifecycle::coordinator::ShutdownCoordinator;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("listener error: {0}")]
    Io(#[from] io::Error),

    #[error("listener did not stop within {0:?}")]
    DrainTimeout(Duration),

    #[error("listener exited before a shutdown signal")]
    ListenerExited,

    #[error("server task failed: {0}")]
    Join(String),
}

impl From<JoinError> for ServeError {
    fn from(e: JoinError) -> Self {
        Self::Join(e.to_string())
    }
}

/// Run the HTTP listener until `signal` resolves, then drain.
///
/// On the signal the coordinator moves to `Draining`, the listener stops
/// accepting and finishes in-flight requests within the drain timeout, and
/// finally every registered background unit is awaited.
///
/// # Arguments
/// * `listener` - Bound listener
/// * `router` - Fully layered application router
/// * `coordinator` - Lifecycle owner shared with the handlers
/// * `signal` - Resolves with the name of the trigger
///
/// When the drain timeout fires only the accept loop is aborted. Connection
/// tasks already running are left to finish on their own, and any
/// background work they register after the coordinator reports `Stopped`
/// is refused.
///
/// # Errors
/// * `DrainTimeout` - In-flight requests outlived the drain timeout
/// * `ListenerExited` / `Io` - The listener stopped on its own
pub async fn serve<S>(
    listener: TcpListener,
    router: Router,
    coordinator: Arc<ShutdownCoordinator>,
    signal: S,
) -> Result<(), ServeError>
where
    S: Future<Output = &'static str> + Send,
{
    let address = listener.local_addr()?;
    let draining = coordinator.draining();

    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(draining)
        .await
    });

    tracing::info!(address = %address, protocol = "http", "Http server listening");

    tokio::select! {
        result = &mut server => {
            tracing::error!("Http server exited before a shutdown signal");
            coordinator.finish().await;
            result??;
            return Err(ServeError::ListenerExited);
        }
        signal = signal => {
            tracing::info!(signal, "Shutting down server");
        }
    }

    coordinator.begin_drain();
    tracing::info!(
        pending_background = coordinator.pending_background(),
        drain_timeout_ms = coordinator.drain_timeout().as_millis(),
        "Draining in-flight requests"
    );

    let drained = match tokio::time::timeout(coordinator.drain_timeout(), &mut server).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(e))) => Err(ServeError::Io(e)),
        Ok(Err(e)) => Err(ServeError::from(e)),
        Err(_) => {
            server.abort();
            tracing::error!(
                drain_timeout_ms = coordinator.drain_timeout().as_millis(),
                "Http server did not stop in time"
            );
            Err(ServeError::DrainTimeout(coordinator.drain_timeout()))
        }
    };

    tracing::info!(
        pending_background = coordinator.pending_background(),
        "Completing background tasks"
    );
    coordinator.finish().await;

    if drained.is_ok() {
        tracing::info!(address = %address, "Stopped server");
    }
    drained
}

/// Resolves on SIGINT or SIGTERM with the signal's name.
pub async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install interrupt handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "interrupt",
        _ = terminate => "terminate",
    }
}
