//! billnote-core - Core library for BillNote
//!
//! This crate holds the backend client, the observable task and model
//! stores, the form controllers and the note and mind-map export pipeline
//! used by the `billnote` CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod forms;
pub mod mindmap;
pub mod models;
pub mod poller;
pub mod store;
pub mod util;

pub use api::{HttpNoteBackend, NoteBackend};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{GenerationRequest, NoteRequest, Task, TaskStatus, TextNoteRequest};
pub use store::{ModelStore, TaskStore};
