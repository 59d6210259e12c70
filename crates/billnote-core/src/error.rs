//! Error types for billnote-core

use thiserror::Error;

use crate::forms::ValidationErrors;

/// Result type alias using billnote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in billnote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status
    #[error("Backend request failed with HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Backend answered with an error envelope
    #[error("Backend error {code}: {message}")]
    Backend { code: i64, message: String },

    /// Local form validation failed; no request was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Task not known to the task store
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// An operation ran before its precondition was met
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Another export is already running on the same diagram
    #[error("An export is already in progress for this mind map")]
    ExportInProgress,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Archive error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The SVG surface could not be parsed for rasterizing
    #[error("SVG rendering error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// Raster encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
