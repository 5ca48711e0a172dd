use tracing::{error, info};

/// Resolves on Ctrl-C, or on SIGTERM on unix platforms.
///
/// If a handler can't be installed its branch never resolves, so a failed installation
/// doesn't shut the server down on its own.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(er) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {er}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(er) => {
                error!("failed to install the SIGTERM handler: {er}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("{:<20} - Ctrl-C received", "shutdown"),
        _ = terminate => info!("{:<20} - SIGTERM received", "shutdown"),
    }
}
