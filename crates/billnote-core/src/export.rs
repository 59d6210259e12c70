//! Note export and the persist-or-download rule shared by every exporter.
//!
//! Every export first asks the backend to write the file into the user's
//! output directory. When that fails, or the backend answers without a
//! path, the bytes are handed to a [`DownloadSink`] instead. Failures of the
//! backend attempt are logged and never surfaced.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::api::NoteBackend;
use crate::error::{Error, Result};
use crate::models::ExportFileRequest;
use crate::util::sanitize_file_stem;

/// Formats offered by the note header's export menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteExportFormat {
    #[serde(rename = "md")]
    Markdown,
    Pdf,
    Docx,
}

impl NoteExportFormat {
    pub const ALL: [Self; 3] = [Self::Markdown, Self::Pdf, Self::Docx];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Pdf => "PDF",
            Self::Docx => "Word",
        }
    }

    /// Only Markdown can be produced without the backend's converters.
    #[must_use]
    pub const fn has_local_fallback(self) -> bool {
        matches!(self, Self::Markdown)
    }
}

impl fmt::Display for NoteExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for NoteExportFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "docx" | "word" => Ok(Self::Docx),
            other => Err(Error::InvalidInput(format!(
                "Unsupported note export format '{other}'"
            ))),
        }
    }
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDestination {
    /// Written by the backend into its output directory
    Saved(String),
    /// Written locally by the download sink
    Downloaded(PathBuf),
}

impl fmt::Display for ExportDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "{path}"),
            Self::Downloaded(path) => write!(f, "{}", path.display()),
        }
    }
}

/// File content ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ExportContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Wire form for `POST /export_file`; binary content travels as base64.
    pub fn to_request(&self, filename: &str, format: Option<&str>) -> ExportFileRequest {
        let (content, is_base64) = match self {
            Self::Text(text) => (text.clone(), false),
            Self::Binary(bytes) => (base64::engine::general_purpose::STANDARD.encode(bytes), true),
        };
        ExportFileRequest {
            content,
            filename: filename.to_string(),
            is_base64,
            format: format.map(ToString::to_string),
        }
    }
}

/// Client-side download target used when the backend cannot save a file.
pub trait DownloadSink {
    /// Writes `bytes` under a name derived from `filename` and returns the path.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves downloads into a local directory without overwriting.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FsDownloadSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = unique_path(&self.dir, filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// `name.ext`, then `name (1).ext`, `name (2).ext`, ... until unused.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (filename, None),
    };
    (1..)
        .map(|index| {
            let name = extension.map_or_else(
                || format!("{stem} ({index})"),
                |extension| format!("{stem} ({index}).{extension}"),
            );
            dir.join(name)
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// `{title}.{extension}`, with `fallback` standing in for a blank title.
#[must_use]
pub fn export_file_name(title: Option<&str>, fallback: &str, extension: &str) -> String {
    let stem = sanitize_file_stem(title.unwrap_or_default(), fallback);
    format!("{stem}.{extension}")
}

/// Asks the backend to save the file, falling back to `sink`.
pub async fn persist_or_download<B: NoteBackend, S: DownloadSink + ?Sized>(
    backend: &B,
    sink: &S,
    filename: &str,
    content: &ExportContent,
    format: Option<&str>,
) -> Result<ExportDestination> {
    match backend
        .export_file(&content.to_request(filename, format))
        .await
    {
        Ok(response) => {
            if let Some(path) = response.path.filter(|path| !path.trim().is_empty()) {
                tracing::info!("Exported {filename} to {path}");
                return Ok(ExportDestination::Saved(path));
            }
            tracing::warn!("Backend did not report a path for {filename}; downloading locally");
        }
        Err(error) => {
            tracing::warn!("Backend export of {filename} failed, downloading locally: {error}");
        }
    }
    let path = sink.save(filename, content.as_bytes())?;
    tracing::info!("Downloaded {filename} to {}", path.display());
    Ok(ExportDestination::Downloaded(path))
}

/// Exports a generated note from the header menu.
///
/// PDF and Word conversion only exists on the backend, so those formats
/// report the backend failure instead of downloading.
pub async fn export_note<B: NoteBackend, S: DownloadSink + ?Sized>(
    backend: &B,
    sink: &S,
    markdown: &str,
    title: Option<&str>,
    format: NoteExportFormat,
) -> Result<ExportDestination> {
    if markdown.trim().is_empty() {
        return Err(Error::NotReady("The note has no content to export".to_string()));
    }
    let filename = export_file_name(title, "note", format.extension());
    let content = ExportContent::Text(markdown.to_string());

    if format.has_local_fallback() {
        return persist_or_download(backend, sink, &filename, &content, Some(format.extension()))
            .await;
    }

    let response = backend
        .export_file(&content.to_request(&filename, Some(format.extension())))
        .await?;
    match response.path.filter(|path| !path.trim().is_empty()) {
        Some(path) => {
            tracing::info!("Exported {} note to {path}", format.label());
            Ok(ExportDestination::Saved(path))
        }
        None => Err(Error::NotReady(format!(
            "The backend did not produce a {} file",
            format.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::{ExportBehavior, FakeBackend};

    #[test]
    fn export_file_name_sanitizes_and_falls_back() {
        assert_eq!(export_file_name(Some("a/b"), "note", "md"), "a_b.md");
        assert_eq!(export_file_name(Some("  "), "mindmap", "svg"), "mindmap.svg");
        assert_eq!(export_file_name(None, "mindmap", "png"), "mindmap.png");
    }

    #[test]
    fn fs_sink_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path().join("downloads"));

        let first = sink.save("note.md", b"one").unwrap();
        let second = sink.save("note.md", b"two").unwrap();
        let third = sink.save("note.md", b"three").unwrap();

        assert_eq!(first.file_name().unwrap(), "note.md");
        assert_eq!(second.file_name().unwrap(), "note (1).md");
        assert_eq!(third.file_name().unwrap(), "note (2).md");
        assert_eq!(fs::read_to_string(first).unwrap(), "one");
    }

    #[test]
    fn binary_content_is_sent_as_base64() {
        let request = ExportContent::Binary(vec![0, 159, 146, 150]).to_request("m.png", None);
        assert!(request.is_base64);
        assert_eq!(request.content, "AJ+Slg==");
        assert_eq!(request.format, None);
    }

    #[test]
    fn format_parsing_accepts_aliases() {
        assert_eq!("Markdown".parse::<NoteExportFormat>().unwrap(), NoteExportFormat::Markdown);
        assert_eq!("word".parse::<NoteExportFormat>().unwrap(), NoteExportFormat::Docx);
        assert!("epub".parse::<NoteExportFormat>().is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn markdown_export_prefers_backend_path() {
        let backend = FakeBackend::new();
        backend.set_export_behavior(ExportBehavior::Save("/out".to_string()));
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());

        let destination = export_note(&backend, &sink, "# Hi", Some("Talk"), NoteExportFormat::Markdown)
            .await
            .unwrap();

        assert_eq!(destination, ExportDestination::Saved("/out/Talk.md".to_string()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        let sent = backend.export_requests.lock().unwrap().clone();
        assert_eq!(sent[0].format.as_deref(), Some("md"));
        assert!(!sent[0].is_base64);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn markdown_export_downloads_when_backend_fails_or_has_no_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());

        for behavior in [ExportBehavior::Fail, ExportBehavior::NoPath] {
            let backend = FakeBackend::new();
            backend.set_export_behavior(behavior);
            let destination =
                export_note(&backend, &sink, "# Hi", None, NoteExportFormat::Markdown)
                    .await
                    .unwrap();
            let ExportDestination::Downloaded(path) = destination else {
                panic!("expected a local download");
            };
            assert_eq!(fs::read_to_string(path).unwrap(), "# Hi");
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pdf_export_surfaces_backend_failure() {
        let backend = FakeBackend::new();
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());

        let error = export_note(&backend, &sink, "# Hi", Some("Talk"), NoteExportFormat::Pdf)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::HttpStatus { status: 502, .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(backend.calls(), vec!["POST /export_file Talk.pdf".to_string()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_notes_are_not_exported() {
        let backend = FakeBackend::new();
        let sink = FsDownloadSink::new(".");
        let error = export_note(&backend, &sink, "  ", None, NoteExportFormat::Docx)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotReady(_)));
        assert!(backend.calls().is_empty());
    }
}
