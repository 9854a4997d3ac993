//! Signal handling for graceful shutdown

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{error, info, warn};

/// Wait for SIGTERM or SIGINT.
///
/// Falls back to tokio's ctrl-c listener when the signal handlers cannot be
/// registered.
pub async fn shutdown_signal() {
    match Signals::new([SIGTERM, SIGINT]) {
        Ok(mut signals) => {
            if let Some(signal) = signals.next().await {
                info!("Received signal: {}", signal);
            }
        }
        Err(e) => {
            warn!("Failed to register signal handlers: {}, listening for ctrl-c", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                futures::future::pending::<()>().await;
            }
        }
    }
}
