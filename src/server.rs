use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// How long in-flight requests may run after a shutdown signal.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Serves `app` until `shutdown` resolves, then drains in-flight requests.
///
/// Requests still running `grace` after the signal are dropped.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown.await;
        info!("Shutting down server");
        let _ = tx.send(true);
    });

    let mut drain_rx = rx.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = drain_rx.wait_for(|stopping| *stopping).await;
    });

    let mut deadline_rx = rx;
    let deadline = async move {
        let _ = deadline_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => {
            result?;
            info!("Server exited");
        }
        _ = deadline => {
            error!(grace_secs = grace.as_secs(), "Server forced to shut down");
        }
    }

    Ok(())
}
