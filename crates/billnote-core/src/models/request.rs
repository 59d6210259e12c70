//! Generation request payloads sent to the backend.

use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE: &str = "minimal";
pub const DEFAULT_SUMMARY_LEVEL: &str = "medium";
pub const DEFAULT_VIDEO_INTERVAL: u8 = 4;
pub const DEFAULT_GRID_SIZE: [u8; 2] = [3, 3];

/// Download quality requested for the source media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Quality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

/// Where the content of a text note comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Text,
    Url,
}

impl SourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
        }
    }
}

/// Body of `POST /generate_note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub video_url: String,
    pub platform: String,
    pub quality: Quality,
    #[serde(default)]
    pub screenshot: bool,
    #[serde(default)]
    pub link: bool,
    pub model_name: String,
    #[serde(default)]
    pub provider_id: String,
    /// Set only when an existing task is being regenerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub format: Vec<String>,
    pub style: String,
    #[serde(default = "default_summary_level")]
    pub summary_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<String>,
    #[serde(default)]
    pub video_understanding: bool,
    #[serde(default = "default_video_interval")]
    pub video_interval: u8,
    #[serde(default = "default_grid_size")]
    pub grid_size: [u8; 2],
}

/// Body of `POST /generate_note_from_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNoteRequest {
    pub source_type: SourceType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub model_name: String,
    #[serde(default)]
    pub provider_id: String,
    pub style: String,
    #[serde(default = "default_summary_level")]
    pub summary_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<String>,
    #[serde(default)]
    pub format: Vec<String>,
}

/// A validated request of either kind, as remembered by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GenerationRequest {
    Video(NoteRequest),
    Text(TextNoteRequest),
}

impl GenerationRequest {
    /// Source kind recorded with the task: the platform, or `"text"`.
    pub fn source_kind(&self) -> &str {
        match self {
            Self::Video(request) => &request.platform,
            Self::Text(_) => "text",
        }
    }

    pub fn model_name(&self) -> &str {
        match self {
            Self::Video(request) => &request.model_name,
            Self::Text(request) => &request.model_name,
        }
    }

    pub fn style(&self) -> &str {
        match self {
            Self::Video(request) => &request.style,
            Self::Text(request) => &request.style,
        }
    }
}

fn default_summary_level() -> String {
    DEFAULT_SUMMARY_LEVEL.to_string()
}

const fn default_video_interval() -> u8 {
    DEFAULT_VIDEO_INTERVAL
}

const fn default_grid_size() -> [u8; 2] {
    DEFAULT_GRID_SIZE
}
