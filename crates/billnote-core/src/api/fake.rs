//! In-memory backend used by controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::NoteBackend;
use crate::error::{Error, Result};
use crate::models::{
    ChatReply, ChatRequest, CookieRecord, CookieResponse, DeleteTaskRequest, ExportFileRequest,
    ExportFileResponse, NoteRequest, OutputDirResponse, PickFolderResponse, TaskCreated,
    TaskStatusResponse, TextNoteRequest,
};

/// How `export_file` should answer.
#[derive(Debug, Clone)]
pub enum ExportBehavior {
    Save(String),
    NoPath,
    Fail,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<String>>,
    pub video_requests: Mutex<Vec<NoteRequest>>,
    pub text_requests: Mutex<Vec<TextNoteRequest>>,
    pub export_requests: Mutex<Vec<ExportFileRequest>>,
    pub cookie_updates: Mutex<Vec<CookieRecord>>,
    pub output_dir_updates: Mutex<Vec<String>>,
    pub cookies: Mutex<HashMap<String, String>>,
    pub statuses: Mutex<VecDeque<Result<TaskStatusResponse>>>,
    pub next_task_id: Mutex<Option<String>>,
    pub output_dir: Mutex<Option<String>>,
    pub picked_folder: Mutex<Option<String>>,
    pub export_behavior: Mutex<Option<ExportBehavior>>,
    pub fail_generation: Mutex<bool>,
    pub fail_reads: Mutex<bool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task_id(task_id: &str) -> Self {
        let backend = Self::new();
        *backend.next_task_id.lock().unwrap() = Some(task_id.to_string());
        backend
    }

    pub fn set_cookie(&self, platform: &str, cookie: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(platform.to_string(), cookie.to_string());
    }

    pub fn set_export_behavior(&self, behavior: ExportBehavior) {
        *self.export_behavior.lock().unwrap() = Some(behavior);
    }

    pub fn push_status(&self, status: Result<TaskStatusResponse>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn created(&self) -> Result<TaskCreated> {
        if *self.fail_generation.lock().unwrap() {
            return Err(Error::HttpStatus {
                status: 500,
                body: "generation failed".to_string(),
            });
        }
        let task_id = self
            .next_task_id
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "task-1".to_string());
        Ok(TaskCreated { task_id })
    }

    fn read_guard(&self) -> Result<()> {
        if *self.fail_reads.lock().unwrap() {
            Err(Error::HttpStatus {
                status: 503,
                body: "unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl NoteBackend for FakeBackend {
    async fn generate_note(&self, request: &NoteRequest) -> Result<TaskCreated> {
        self.record("POST /generate_note");
        self.video_requests.lock().unwrap().push(request.clone());
        self.created()
    }

    async fn generate_note_from_text(&self, request: &TextNoteRequest) -> Result<TaskCreated> {
        self.record("POST /generate_note_from_text");
        self.text_requests.lock().unwrap().push(request.clone());
        self.created()
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        self.record(format!("GET /task_status/{task_id}"));
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::TaskNotFound(task_id.to_string())))
    }

    async fn delete_task(&self, request: &DeleteTaskRequest) -> Result<()> {
        self.record(format!("POST /delete_task {}", request.video_id));
        Ok(())
    }

    async fn chat_with_note(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.record("POST /chat_with_note");
        Ok(ChatReply {
            reply: format!("echo: {}", request.message),
        })
    }

    async fn get_downloader_cookie(&self, platform: &str) -> Result<CookieResponse> {
        self.record(format!("GET /get_downloader_cookie/{platform}"));
        self.read_guard()?;
        let cookie = self.cookies.lock().unwrap().get(platform).cloned();
        Ok(CookieResponse {
            platform: Some(platform.to_string()),
            cookie,
        })
    }

    async fn update_downloader_cookie(&self, record: &CookieRecord) -> Result<()> {
        self.record("POST /update_downloader_cookie");
        self.cookie_updates.lock().unwrap().push(record.clone());
        self.set_cookie(&record.platform, &record.cookie);
        Ok(())
    }

    async fn get_output_dir(&self) -> Result<OutputDirResponse> {
        self.record("GET /get_output_dir");
        self.read_guard()?;
        Ok(OutputDirResponse {
            output_dir: self.output_dir.lock().unwrap().clone().unwrap_or_default(),
        })
    }

    async fn update_output_dir(&self, output_dir: &str) -> Result<()> {
        self.record("POST /update_output_dir");
        self.output_dir_updates
            .lock()
            .unwrap()
            .push(output_dir.to_string());
        *self.output_dir.lock().unwrap() = Some(output_dir.to_string());
        Ok(())
    }

    async fn pick_folder(&self) -> Result<PickFolderResponse> {
        self.record("GET /pick_folder");
        self.read_guard()?;
        Ok(PickFolderResponse {
            path: self.picked_folder.lock().unwrap().clone().unwrap_or_default(),
        })
    }

    async fn export_file(&self, request: &ExportFileRequest) -> Result<ExportFileResponse> {
        self.record(format!("POST /export_file {}", request.filename));
        self.export_requests.lock().unwrap().push(request.clone());
        let behavior = self
            .export_behavior
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(ExportBehavior::Fail);
        match behavior {
            ExportBehavior::Save(dir) => Ok(ExportFileResponse {
                path: Some(format!("{dir}/{}", request.filename)),
            }),
            ExportBehavior::NoPath => Ok(ExportFileResponse { path: None }),
            ExportBehavior::Fail => Err(Error::HttpStatus {
                status: 502,
                body: "backend offline".to_string(),
            }),
        }
    }
}
