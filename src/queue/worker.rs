use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Task, TaskQueue};
use crate::Error;

/// Runs tasks handed out by a queue worker.
#[async_trait]
pub trait TaskExecutor: Send + Sync + 'static {
    /// Executes `task`, resolving only once the work has finished.
    async fn execute(&self, task: &Task) -> Result<(), Error>;

    /// Tells the task's origin that execution failed.
    async fn report_failure(&self, task: &Task, error: &Error);
}

/// Spawns the single consumer for `queue`.
pub fn spawn<E>(queue: Arc<TaskQueue>, executor: Arc<E>) -> JoinHandle<()>
where
    E: TaskExecutor + ?Sized,
{
    tokio::spawn(run(queue, executor))
}

pub async fn run<E>(queue: Arc<TaskQueue>, executor: Arc<E>)
where
    E: TaskExecutor + ?Sized,
{
    while let Some(task) = queue.next().await {
        debug!("task {} started: {}", task.id, task.title());

        // Runs to completion even if the queue is torn down meanwhile.
        let outcome = executor.execute(&task).await;

        if let Err(e) = &outcome {
            warn!("task {} failed: {e}", task.id);
            executor.report_failure(&task, e).await;
        }
        queue.finish(outcome.is_ok()).await;
    }

    info!("queue worker stopped");
}
