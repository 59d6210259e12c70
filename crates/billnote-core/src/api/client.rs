//! HTTP client for the note-generation backend.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::{parse_envelope, ApiEnvelope};
use crate::config::{normalize_api_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::models::{
    ChatReply, ChatRequest, CookieRecord, CookieResponse, DeleteTaskRequest, ExportFileRequest,
    ExportFileResponse, NoteRequest, OutputDirResponse, PickFolderResponse, TaskCreated,
    TaskStatusResponse, TextNoteRequest,
};
use crate::util::compact_text;

/// Every backend route the client consumes.
#[allow(async_fn_in_trait)]
pub trait NoteBackend {
    /// `POST /generate_note`
    async fn generate_note(&self, request: &NoteRequest) -> Result<TaskCreated>;

    /// `POST /generate_note_from_text`
    async fn generate_note_from_text(&self, request: &TextNoteRequest) -> Result<TaskCreated>;

    /// `GET /task_status/{task_id}`
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse>;

    /// `POST /delete_task`
    async fn delete_task(&self, request: &DeleteTaskRequest) -> Result<()>;

    /// `POST /chat_with_note`
    async fn chat_with_note(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// `GET /get_downloader_cookie/{platform}`
    async fn get_downloader_cookie(&self, platform: &str) -> Result<CookieResponse>;

    /// `POST /update_downloader_cookie`
    async fn update_downloader_cookie(&self, record: &CookieRecord) -> Result<()>;

    /// `GET /get_output_dir`
    async fn get_output_dir(&self) -> Result<OutputDirResponse>;

    /// `POST /update_output_dir`
    async fn update_output_dir(&self, output_dir: &str) -> Result<()>;

    /// `GET /pick_folder`, which opens a native dialog on the backend host
    async fn pick_folder(&self) -> Result<PickFolderResponse>;

    /// `POST /export_file`
    async fn export_file(&self, request: &ExportFileRequest) -> Result<ExportFileResponse>;
}

/// reqwest-backed [`NoteBackend`].
#[derive(Debug, Clone)]
pub struct HttpNoteBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNoteBackend {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::builder().build()?)
    }

    /// Builds a client honouring the configured base URL and timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Self::with_client(config.api_base_url.clone(), client)
    }

    fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Result<Self> {
        let base_url = normalize_api_base_url(&base_url.into()).map_err(Error::InvalidInput)?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn get_envelope<T: DeserializeOwned>(&self, route: &str) -> Result<ApiEnvelope<T>> {
        tracing::debug!("GET {route}");
        let response = self
            .client
            .get(self.url(route))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn post_envelope<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>> {
        tracing::debug!("POST {route}");
        let response = self
            .client
            .post(self.url(route))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        read_envelope(response).await
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: error_detail(&body),
        });
    }
    parse_envelope(&body)
}

/// Extracts a readable message from an error body (`detail`, `msg`, or raw text).
fn error_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let detail = parsed.as_ref().and_then(|value| {
        value
            .get("detail")
            .or_else(|| value.get("msg"))
            .and_then(serde_json::Value::as_str)
    });
    compact_text(detail.unwrap_or(body))
}

impl NoteBackend for HttpNoteBackend {
    async fn generate_note(&self, request: &NoteRequest) -> Result<TaskCreated> {
        self.post_envelope("/generate_note", request)
            .await?
            .into_required_data("/generate_note")
    }

    async fn generate_note_from_text(&self, request: &TextNoteRequest) -> Result<TaskCreated> {
        self.post_envelope("/generate_note_from_text", request)
            .await?
            .into_required_data("/generate_note_from_text")
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        let route = format!("/task_status/{}", urlencoding::encode(task_id));
        self.get_envelope(&route)
            .await?
            .into_required_data(&route)
    }

    async fn delete_task(&self, request: &DeleteTaskRequest) -> Result<()> {
        self.post_envelope::<_, serde_json::Value>("/delete_task", request)
            .await?
            .into_data()
            .map(drop)
    }

    async fn chat_with_note(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.post_envelope("/chat_with_note", request)
            .await?
            .into_required_data("/chat_with_note")
    }

    async fn get_downloader_cookie(&self, platform: &str) -> Result<CookieResponse> {
        let route = format!("/get_downloader_cookie/{}", urlencoding::encode(platform));
        Ok(self
            .get_envelope::<CookieResponse>(&route)
            .await?
            .into_data()?
            .unwrap_or_default())
    }

    async fn update_downloader_cookie(&self, record: &CookieRecord) -> Result<()> {
        self.post_envelope::<_, serde_json::Value>("/update_downloader_cookie", record)
            .await?
            .into_data()
            .map(drop)
    }

    async fn get_output_dir(&self) -> Result<OutputDirResponse> {
        Ok(self
            .get_envelope::<OutputDirResponse>("/get_output_dir")
            .await?
            .into_data()?
            .unwrap_or_default())
    }

    async fn update_output_dir(&self, output_dir: &str) -> Result<()> {
        let body = serde_json::json!({ "output_dir": output_dir });
        self.post_envelope::<_, serde_json::Value>("/update_output_dir", &body)
            .await?
            .into_data()
            .map(drop)
    }

    async fn pick_folder(&self) -> Result<PickFolderResponse> {
        Ok(self
            .get_envelope::<PickFolderResponse>("/pick_folder")
            .await?
            .into_data()?
            .unwrap_or_default())
    }

    async fn export_file(&self, request: &ExportFileRequest) -> Result<ExportFileResponse> {
        Ok(self
            .post_envelope::<_, ExportFileResponse>("/export_file", request)
            .await?
            .into_data()?
            .unwrap_or_default())
    }
}
