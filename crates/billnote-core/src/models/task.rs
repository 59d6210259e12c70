//! Generation task model

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GenerationRequest;

/// Backend status of a generation task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Parsing,
    Downloading,
    Transcribing,
    Summarizing,
    Formatting,
    Saving,
    Success,
    Failed,
    /// A status this client does not know about yet
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Parsing => "PARSING",
            Self::Downloading => "DOWNLOADING",
            Self::Transcribing => "TRANSCRIBING",
            Self::Summarizing => "SUMMARIZING",
            Self::Formatting => "FORMATTING",
            Self::Saving => "SAVING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the task has reached `SUCCESS` or `FAILED`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Any status outside `{SUCCESS, FAILED}` counts as in-progress work.
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        !self.is_terminal()
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "PARSING" => Self::Parsing,
            "DOWNLOADING" => Self::Downloading,
            "TRANSCRIBING" => Self::Transcribing,
            "SUMMARIZING" => Self::Summarizing,
            "FORMATTING" => Self::Formatting,
            "SAVING" => Self::Saving,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated note content returned once a task succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteResult {
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub transcript: Option<serde_json::Value>,
    #[serde(default)]
    pub audio_meta: Option<serde_json::Value>,
}

impl NoteResult {
    /// Title reported by the downloader, if any.
    pub fn title(&self) -> Option<&str> {
        self.audio_meta
            .as_ref()
            .and_then(|meta| meta.get("title"))
            .and_then(serde_json::Value::as_str)
            .filter(|title| !title.trim().is_empty())
    }

    /// Plain transcript text, joined from segments when no full text exists.
    pub fn transcript_text(&self) -> Option<String> {
        let transcript = self.transcript.as_ref()?;
        if let Some(text) = transcript
            .get("full_text")
            .and_then(serde_json::Value::as_str)
            .filter(|text| !text.trim().is_empty())
        {
            return Some(text.to_string());
        }
        let segments = transcript.get("segments")?.as_array()?;
        let lines: Vec<&str> = segments
            .iter()
            .filter_map(|segment| segment.get("text").and_then(serde_json::Value::as_str))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Payload of `GET /task_status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<NoteResult>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// A generation task tracked by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Backend task identifier
    pub id: String,
    /// Last known status
    pub status: TaskStatus,
    /// Platform value, or `"text"` for text notes
    pub source: String,
    /// The request this task was created (or last retried) with
    pub form_data: GenerationRequest,
    /// Note content once the task succeeded
    #[serde(default)]
    pub result: Option<NoteResult>,
    /// Last status message from the backend
    #[serde(default)]
    pub message: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl Task {
    /// A freshly submitted task in `PENDING` state.
    #[must_use]
    pub fn pending(
        id: impl Into<String>,
        source: impl Into<String>,
        form_data: GenerationRequest,
    ) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            source: source.into(),
            form_data,
            result: None,
            message: None,
            created_at: crate::util::unix_timestamp_ms_now(),
        }
    }
}
