use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use billnote_core::config::ConfigLayer;
use billnote_core::export::FsDownloadSink;
use billnote_core::models::{GenerationRequest, NoteResult, Task, TaskStatus};
use billnote_core::poller::{poll_until_done, PollOptions};
use billnote_core::util::unix_timestamp_ms_now;
use billnote_core::{ClientConfig, HttpNoteBackend, ModelStore, NoteBackend, TaskStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

const HISTORY_FILE_NAME: &str = "tasks.json";
const TITLE_PREVIEW_CHARS: usize = 60;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub profile: Option<String>,
    pub api_base_url: Option<String>,
    pub history_path: Option<PathBuf>,
}

/// Everything a backend-facing command needs: resolved config, the HTTP
/// backend and the stores restored from the local task history.
pub struct AppContext {
    pub config: ClientConfig,
    pub backend: HttpNoteBackend,
    pub tasks: Arc<TaskStore>,
    pub models: Arc<ModelStore>,
    history_path: PathBuf,
}

impl AppContext {
    pub fn load(options: &GlobalOptions) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = profiles.resolve_profile_name(options.profile.as_deref());
        let profile = profiles.profile(&profile_name).cloned().unwrap_or_default();

        let explicit = ConfigLayer {
            api_base_url: options.api_base_url.clone(),
            ..ConfigLayer::default()
        };
        let layer = explicit
            .or(ConfigLayer::from_env())
            .or(profile.to_layer());
        let config = ClientConfig::from_layer(layer).map_err(CliError::Config)?;
        debug!(profile = %profile_name, api_base_url = %config.api_base_url, "Resolved client config");

        let history_path = match &options.history_path {
            Some(path) => path.clone(),
            None => default_history_path()?,
        };
        let tasks = load_history(&history_path)?;

        Ok(Self {
            backend: HttpNoteBackend::from_config(&config)?,
            config,
            tasks: Arc::new(TaskStore::from_tasks(tasks)),
            models: Arc::new(ModelStore::new(profile.models)),
            history_path,
        })
    }

    /// Writes the task store back to the history file.
    pub fn persist_tasks(&self) -> Result<(), CliError> {
        save_history(&self.history_path, &self.tasks.tasks())
    }

    pub fn task(&self, task_id: &str) -> Result<Task, CliError> {
        self.tasks
            .get(task_id)
            .ok_or_else(|| CliError::TaskNotFound(task_id.to_string()))
    }

    /// The task and its generated note, fetching the status once when the
    /// local history has no result yet.
    pub async fn note(&self, task_id: &str) -> Result<(Task, NoteResult), CliError> {
        let mut task = self.task(task_id)?;
        if task.result.is_none() {
            let response = self.backend.task_status(task_id).await?;
            if self
                .tasks
                .update_status(task_id, response.status, response.message, response.result)
            {
                self.persist_tasks()?;
            }
            task = self.task(task_id)?;
        }
        match task.result.clone() {
            Some(result) if !result.markdown.trim().is_empty() => Ok((task, result)),
            _ => Err(CliError::NoNote(task_id.to_string())),
        }
    }

    pub fn sink(&self) -> FsDownloadSink {
        FsDownloadSink::new(&self.config.downloads_dir)
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions::from_config(&self.config)
    }

    /// Polls a task to completion, printing every status change.
    pub async fn wait_for_task(&self, task_id: &str) -> Result<Task, CliError> {
        let outcome = poll_until_done(
            &self.backend,
            &self.tasks,
            task_id,
            self.poll_options(),
            |task| eprintln!("{}", format_status_line(task)),
        )
        .await;
        self.persist_tasks()?;

        let task = outcome?;
        if task.status == TaskStatus::Failed {
            return Err(CliError::GenerationFailed(
                task.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(task)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskHistory {
    #[serde(default)]
    tasks: Vec<Task>,
}

pub fn default_history_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("billnote").join(HISTORY_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve data directory".to_string()))
}

pub fn load_history(path: &Path) -> Result<Vec<Task>, CliError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let history: TaskHistory = serde_json::from_str(&raw)?;
    Ok(history.tasks)
}

pub fn save_history(path: &Path, tasks: &[Task]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let history = TaskHistory {
        tasks: tasks.to_vec(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&history)?)?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TaskListItem {
    pub id: String,
    pub status: String,
    pub source: String,
    pub title: String,
    pub created_at: i64,
    pub relative_time: String,
}

pub fn to_task_list_items(tasks: &[Task]) -> Vec<TaskListItem> {
    let now = unix_timestamp_ms_now();
    tasks
        .iter()
        .map(|task| TaskListItem {
            id: task.id.clone(),
            status: task.status.to_string(),
            source: task.source.clone(),
            title: task_title(task),
            created_at: task.created_at,
            relative_time: format_relative_time(task.created_at, now),
        })
        .collect()
}

/// Best display title: downloader title, then text title, then the source.
pub fn task_title(task: &Task) -> String {
    if let Some(title) = task.result.as_ref().and_then(|result| result.title()) {
        return title.to_string();
    }
    let fallback = match &task.form_data {
        GenerationRequest::Video(request) => request.video_url.clone(),
        GenerationRequest::Text(request) => request
            .title
            .clone()
            .unwrap_or_else(|| request.content.clone()),
    };
    preview(&fallback, TITLE_PREVIEW_CHARS)
}

pub fn format_status_line(task: &Task) -> String {
    match task.message.as_deref().filter(|message| !message.is_empty()) {
        Some(message) => format!("[{}] {} {}", task.status, task.id, message),
        None => format!("[{}] {}", task.status, task.id),
    }
}

pub fn preview(value: &str, max_chars: usize) -> String {
    let compact = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= max_chars {
        return compact;
    }
    let truncated: String = compact.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{truncated}...")
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Resolves an argument that may be `-` (read stdin) or literal text.
pub fn resolve_text_argument(value: Option<&str>) -> Result<String, CliError> {
    match value {
        Some("-") | None => read_piped_stdin()?.ok_or(CliError::EmptyContent),
        Some(text) => normalize_content(text).ok_or(CliError::EmptyContent),
    }
}
