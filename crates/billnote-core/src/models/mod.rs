//! Data models for BillNote

mod catalog;
mod chat;
mod request;
mod settings;
mod task;

pub use catalog::{
    infer_platform, note_format_label, style_label, NoteFormat, Platform, NOTE_FORMATS,
    NOTE_STYLES, TEXT_MODE_FORMATS,
};
pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatRole};
pub use request::{
    GenerationRequest, NoteRequest, Quality, SourceType, TextNoteRequest, DEFAULT_GRID_SIZE,
    DEFAULT_STYLE, DEFAULT_SUMMARY_LEVEL, DEFAULT_VIDEO_INTERVAL,
};
pub use settings::{
    CookieRecord, CookieResponse, DeleteTaskRequest, ExportFileRequest, ExportFileResponse,
    ModelEntry, OutputDirResponse, PickFolderResponse, TaskCreated,
};
pub use task::{NoteResult, Task, TaskStatus, TaskStatusResponse};
