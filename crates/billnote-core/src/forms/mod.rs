//! Form controllers.
//!
//! Each controller owns the editable state of one form, validates it at the
//! boundary and talks to the backend only through [`crate::api::NoteBackend`].

mod console_snippet;
mod downloader;
mod header;
mod note_form;
mod output_dir;

use std::fmt;

pub use console_snippet::console_snippet;
pub use downloader::{CookieForm, RefreshOutcome, RefreshTicket, MIN_COOKIE_LENGTH};
pub use header::{format_created_at, NoteHeader, ViewMode, COPIED_PULSE};
pub use note_form::{
    validate_text, validate_video, FormControl, InputMode, NoteForm, NoteFormValues,
    SubmitOutcome, TextFormValues,
};
pub use output_dir::{OutputDirForm, PickOutcome};

use crate::models::Platform;

/// Platforms listed on the downloader settings page.
pub fn downloader_providers() -> Vec<Platform> {
    Platform::downloader_platforms().collect()
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation messages collected for a single submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
    form: Vec<String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Adds an error that is not attached to any field.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.form.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    /// First message recorded for `field`.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form.clone();
        parts.extend(
            self.fields
                .iter()
                .map(|error| format!("{}: {}", error.field, error.message)),
        );
        f.write_str(&parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_lists_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add_form("Please enter text or a URL");
        errors.add_field("video_url", "Invalid video URL");
        assert_eq!(
            errors.to_string(),
            "Please enter text or a URL; video_url: Invalid video URL"
        );
        assert_eq!(errors.field("video_url"), Some("Invalid video URL"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn downloader_providers_skip_local() {
        assert!(!downloader_providers().contains(&Platform::Local));
    }
}
