//! Stopping the background progress logger.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Signals the progress logger to stop and waits for it.
pub async fn shutdown_gracefully(stop: oneshot::Sender<()>, logging_task: JoinHandle<()>) {
    // The receiver is gone only if the task already ended.
    let _ = stop.send(());
    if let Err(e) = logging_task.await {
        log::warn!("Progress logger ended abnormally: {e}");
    }
}
