//! Long-lived workers draining the task queue.

use std::sync::Arc;

use log::warn;
use tokio::task::JoinHandle;

use crate::discovery::{survey_domain, SurveyContext};
use crate::error_handling::SurveyCounter;
use crate::run::TaskQueue;

/// A fixed set of workers, each looping get / survey / task_done forever.
///
/// Workers never exit on their own; dropping the pool aborts them.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `count` workers on `queue`.
    pub fn start(count: usize, queue: Arc<TaskQueue>, ctx: SurveyContext) -> Self {
        let workers = (0..count)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    loop {
                        let domain = queue.get().await;
                        // Run each domain in its own task so a panic is contained.
                        let task_ctx = ctx.clone();
                        let handle = tokio::spawn(async move {
                            survey_domain(&task_ctx, &domain, worker_id).await;
                        });
                        if let Err(join_error) = handle.await {
                            ctx.stats.increment(SurveyCounter::TasksPanicked);
                            warn!("[{worker_id}] Task panicked: {join_error:?}");
                        }
                        queue.task_done();
                    }
                })
            })
            .collect();
        WorkerPool { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}
