use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] billnote_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No content provided")]
    EmptyContent,
    #[error("Chat message cannot be empty")]
    EmptyMessage,
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Task {0} has no generated note yet")]
    NoNote(String),
    #[error("Task {0} is still generating")]
    Busy(String),
    #[error("{0}")]
    Validation(String),
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    /// The failure was already logged; exit non-zero without printing again.
    #[error("generation request failed")]
    Silent,
    #[error("No model is enabled. Run `billnote config init --model <NAME> --provider <ID>`.")]
    NoModel,
    #[error("Configuration error: {0}")]
    Config(String),
}
