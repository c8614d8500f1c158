//! Unbounded FIFO of domain names with completion tracking.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, Mutex, Notify};

/// Shared queue of pending domains.
///
/// Every `put` must eventually be balanced by a `task_done`; `join` waits for
/// that. There is no capacity limit, so an input much larger than memory is
/// held in full.
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<String>,
    receiver: Mutex<mpsc::UnboundedReceiver<String>>,
    pending: AtomicUsize,
    drained: Notify,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        TaskQueue {
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Enqueues a domain.
    pub fn put(&self, domain: impl Into<String>) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        // The receiver lives as long as the queue, so sending cannot fail.
        if self.sender.send(domain.into()).is_err() {
            self.task_done();
        }
    }

    /// Waits for the next domain.
    pub async fn get(&self) -> String {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(domain) => domain,
            // Unreachable while `self.sender` is alive.
            None => std::future::pending().await,
        }
    }

    /// Marks one previously taken domain as fully processed.
    pub fn task_done(&self) {
        let previous = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match previous {
            Ok(1) => self.drained.notify_waiters(),
            Ok(_) => {}
            Err(_) => log::error!("task_done called more times than put"),
        }
    }

    /// Domains enqueued but not yet marked done.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Waits until every enqueued domain has been marked done.
    ///
    /// Returns at once on an empty queue.
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            // Register before checking so a notification in between is not lost.
            drained.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            drained.await;
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
