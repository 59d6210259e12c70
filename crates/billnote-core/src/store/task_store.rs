//! Task store: every generation task the client knows about.

use std::sync::{PoisonError, RwLock};

use tokio::sync::watch;

use crate::api::NoteBackend;
use crate::error::{Error, Result};
use crate::models::{GenerationRequest, NoteRequest, NoteResult, Task, TaskStatus};

#[derive(Debug, Default)]
struct TaskState {
    tasks: Vec<Task>,
    current_task_id: Option<String>,
}

/// Observable container for generation tasks, newest first.
#[derive(Debug)]
pub struct TaskStore {
    state: RwLock<TaskState>,
    version: watch::Sender<u64>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::from_tasks(Vec::new())
    }

    /// Restores a store from previously persisted tasks.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: RwLock::new(TaskState {
                tasks,
                current_task_id: None,
            }),
            version,
        }
    }

    /// Receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.read(|state| state.tasks.clone())
    }

    pub fn get(&self, task_id: &str) -> Option<Task> {
        self.read(|state| state.tasks.iter().find(|task| task.id == task_id).cloned())
    }

    pub fn current_task_id(&self) -> Option<String> {
        self.read(|state| state.current_task_id.clone())
    }

    pub fn current_task(&self) -> Option<Task> {
        self.read(|state| {
            let id = state.current_task_id.as_deref()?;
            state.tasks.iter().find(|task| task.id == id).cloned()
        })
    }

    /// Registers a freshly submitted task and makes it current.
    pub fn add_pending_task(&self, task_id: &str, source: &str, form_data: GenerationRequest) {
        let task = Task::pending(task_id, source, form_data);
        self.write(|state| {
            state.tasks.retain(|existing| existing.id != task_id);
            state.tasks.insert(0, task);
            state.current_task_id = Some(task_id.to_string());
        });
        tracing::info!("Registered pending task {task_id} ({source})");
    }

    /// Selects the task shown in the form; `None` starts a new one.
    pub fn set_current_task(&self, task_id: Option<&str>) {
        self.write(|state| state.current_task_id = task_id.map(ToString::to_string));
    }

    /// Applies a status update; returns `false` when the task is unknown.
    pub fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        message: Option<String>,
        result: Option<NoteResult>,
    ) -> bool {
        self.write(|state| {
            let Some(task) = state.tasks.iter_mut().find(|task| task.id == task_id) else {
                return false;
            };
            task.status = status;
            task.message = message;
            if result.is_some() {
                task.result = result;
            }
            true
        })
    }

    /// Resubmits an existing task with edited form data, keeping its id.
    pub async fn retry_task<B: NoteBackend>(
        &self,
        backend: &B,
        task_id: &str,
        mut request: NoteRequest,
    ) -> Result<()> {
        if self.get(task_id).is_none() {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        request.task_id = Some(task_id.to_string());
        backend.generate_note(&request).await?;

        self.write(|state| {
            if let Some(task) = state.tasks.iter_mut().find(|task| task.id == task_id) {
                task.status = TaskStatus::Pending;
                task.message = None;
                task.result = None;
                task.source.clone_from(&request.platform);
                task.form_data = GenerationRequest::Video(request);
            }
        });
        tracing::info!("Retried task {task_id}");
        Ok(())
    }

    /// Forgets a task; clears the selection when it was current.
    pub fn remove_task(&self, task_id: &str) -> Option<Task> {
        self.write(|state| {
            let index = state.tasks.iter().position(|task| task.id == task_id)?;
            if state.current_task_id.as_deref() == Some(task_id) {
                state.current_task_id = None;
            }
            Some(state.tasks.remove(index))
        })
    }

    fn read<T>(&self, f: impl FnOnce(&TaskState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut TaskState) -> T) -> T {
        let output = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state)
        };
        self.version.send_modify(|version| *version += 1);
        output
    }
}
