//! Coordinated shutdown for the server and its background sweeper.
//!
//! The controller hands out child cancellation tokens; cancelling the
//! controller stops every holder. One controller per process.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Hands out cancellation tokens and fires them all on shutdown.
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    cancel_token: CancellationToken,
}

impl ShutdownController {
    /// Create a new controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token for one component. Cancelled when shutdown begins.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Begin shutdown: cancels every token handed out.
    pub fn shutdown(&self) {
        info!("shutdown initiated");
        self.cancel_token.cancel();
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C signal");
        }
        _ = terminate => {
            info!("received SIGTERM signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_cancels_tokens() {
        let controller = ShutdownController::new();
        let token = controller.token();
        assert!(!controller.is_shutting_down());

        controller.shutdown();

        assert!(controller.is_shutting_down());
        token.cancelled().await;
    }
}
