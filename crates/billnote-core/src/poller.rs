//! Task status polling.

use std::time::Duration;

use tokio::time::sleep;

use crate::api::NoteBackend;
use crate::config::{ClientConfig, DEFAULT_POLL_INTERVAL_SECS};
use crate::error::{Error, Result};
use crate::models::{Task, TaskStatus};
use crate::store::TaskStore;

pub const DEFAULT_MAX_TRANSPORT_FAILURES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between status requests.
    pub interval: Duration,
    /// Consecutive transport failures tolerated before giving up.
    pub max_transport_failures: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_transport_failures: DEFAULT_MAX_TRANSPORT_FAILURES,
        }
    }
}

impl PollOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::default().with_interval(config.poll_interval)
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_transport_failures(mut self, max: u32) -> Self {
        self.max_transport_failures = max.max(1);
        self
    }
}

/// Polls `/task_status/{task_id}` until the task succeeds or fails.
///
/// Each status change is written to `store` and reported to `on_update`.
/// An error envelope from the backend marks the task `FAILED` with the
/// backend's message. Transport errors are retried on the next tick until
/// `max_transport_failures` of them happen in a row.
pub async fn poll_until_done<B, F>(
    backend: &B,
    store: &TaskStore,
    task_id: &str,
    options: PollOptions,
    mut on_update: F,
) -> Result<Task>
where
    B: NoteBackend,
    F: FnMut(&Task),
{
    let mut last_status = store
        .get(task_id)
        .map(|task| task.status)
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    let mut transport_failures = 0;

    loop {
        let (status, message, result) = match backend.task_status(task_id).await {
            Ok(response) => {
                transport_failures = 0;
                (response.status, response.message, response.result)
            }
            Err(Error::Backend { message, .. }) => (TaskStatus::Failed, Some(message), None),
            Err(error) => {
                transport_failures += 1;
                tracing::warn!(
                    "Polling task {task_id} failed ({transport_failures}/{}): {error}",
                    options.max_transport_failures
                );
                if transport_failures >= options.max_transport_failures {
                    return Err(error);
                }
                sleep(options.interval).await;
                continue;
            }
        };

        if !store.update_status(task_id, status.clone(), message, result) {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        let task = store
            .get(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        if status != last_status {
            tracing::info!("Task {task_id} is now {status}");
            on_update(&task);
            last_status = status;
        }
        if task.status.is_terminal() {
            return Ok(task);
        }
        sleep(options.interval).await;
    }
}
