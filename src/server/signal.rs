// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both request shutdown: the accept loop stops
// and the process exits with status 0.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start the signal listener and return the shutdown notifier.
///
/// The notification is sent with `notify_one` so a signal arriving while
/// the loop is busy serving a connection is not lost.
#[cfg(unix)]
pub fn start_signal_handler() -> Arc<Notify> {
    use tokio::signal::unix::{signal, SignalKind};

    let shutdown = Arc::new(Notify::new());
    let notify = Arc::clone(&shutdown);

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                logger::log_shutdown_signal("SIGTERM");
            }
            _ = sigint.recv() => {
                logger::log_shutdown_signal("SIGINT");
            }
        }

        notify.notify_one();
    });

    shutdown
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler() -> Arc<Notify> {
    let shutdown = Arc::new(Notify::new());
    let notify = Arc::clone(&shutdown);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::log_shutdown_signal("Ctrl+C");
            notify.notify_one();
        }
    });

    shutdown
}
