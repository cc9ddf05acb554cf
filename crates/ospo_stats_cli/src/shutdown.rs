use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag for graceful termination.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if shutdown has been requested.
#[inline]
pub(crate) fn is_shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Acquire)
}

#[inline]
fn request_shutdown() {
    SHUTDOWN_REQUESTED.store(true, Ordering::Release);
}

/// Set up the Ctrl+C handler.
///
/// The first Ctrl+C lets the current term or repository finish; the second
/// exits immediately.
pub(crate) fn setup_shutdown_handler() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Failed to install Ctrl+C handler");
            return;
        }

        tracing::warn!("Shutdown requested, finishing current operation (Ctrl+C again to force quit)");
        request_shutdown();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Force quit");
        }
        std::process::exit(130);
    });
}
