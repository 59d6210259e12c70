//! Backend configuration and file-export wire types

use serde::{Deserialize, Serialize};

/// Stored downloader cookie for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub platform: String,
    pub cookie: String,
}

/// Payload of `GET /get_downloader_cookie/{platform}`.
///
/// The backend sends no data at all when nothing is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieResponse {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub cookie: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDirResponse {
    #[serde(default)]
    pub output_dir: String,
}

/// Payload of `GET /pick_folder`; an empty path means the dialog was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickFolderResponse {
    #[serde(default)]
    pub path: String,
}

/// Body of `POST /export_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFileRequest {
    /// Text content, or base64 when `is_base64` is set
    pub content: String,
    pub filename: String,
    #[serde(default)]
    pub is_base64: bool,
    /// Conversion target understood by the backend (`md`, `pdf`, `docx`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFileResponse {
    #[serde(default)]
    pub path: Option<String>,
}

/// Body of `POST /delete_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    pub video_id: String,
    pub platform: String,
}

/// Payload returned by both generation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreated {
    pub task_id: String,
}

/// An enabled model the user can generate with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub id: String,
    pub model_name: String,
    pub provider_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_request_omits_missing_format() {
        let request = ExportFileRequest {
            content: "abc".to_string(),
            filename: "mindmap.html".to_string(),
            is_base64: false,
            format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("format").is_none());
        assert_eq!(value["is_base64"], false);
    }

    #[test]
    fn cookie_response_tolerates_empty_payload() {
        let parsed: CookieResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.cookie, None);
    }
}
