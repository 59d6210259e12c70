use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Mindmap;
use crate::api::NoteBackend;
use crate::error::{Error, Result};
use crate::export::{
    export_file_name, persist_or_download, DownloadSink, ExportContent, ExportDestination,
};

const DEFAULT_FILE_STEM: &str = "mindmap";

/// Mind-map export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MindmapFormat {
    Html,
    Svg,
    Png,
    Xmind,
}

impl MindmapFormat {
    pub const ALL: [Self; 4] = [Self::Html, Self::Svg, Self::Png, Self::Xmind];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Xmind => "xmind",
        }
    }
}

impl fmt::Display for MindmapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for MindmapFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "xmind" => Ok(Self::Xmind),
            other => Err(Error::InvalidInput(format!(
                "Unsupported mind map format '{other}'"
            ))),
        }
    }
}

/// Clears the in-flight flag when the export finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Exports one mind map, one export at a time.
#[derive(Debug)]
pub struct MindmapExporter {
    mindmap: Mindmap,
    in_flight: AtomicBool,
}

impl MindmapExporter {
    pub const fn new(mindmap: Mindmap) -> Self {
        Self {
            mindmap,
            in_flight: AtomicBool::new(false),
        }
    }

    pub const fn mindmap(&self) -> &Mindmap {
        &self.mindmap
    }

    pub fn mindmap_mut(&mut self) -> &mut Mindmap {
        &mut self.mindmap
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::ExportInProgress)?;
        Ok(InFlight(&self.in_flight))
    }

    /// Renders the file content for `format` without persisting it.
    pub fn render(&self, format: MindmapFormat, title: Option<&str>) -> Result<ExportContent> {
        if self.mindmap.is_empty() {
            return Err(Error::NotReady("The mind map has no content yet".to_string()));
        }
        Ok(match format {
            MindmapFormat::Html => ExportContent::Text(self.mindmap.export_html(title)?),
            MindmapFormat::Svg => ExportContent::Text(self.mindmap.export_svg()),
            MindmapFormat::Png => ExportContent::Binary(self.mindmap.export_png()?),
            MindmapFormat::Xmind => ExportContent::Binary(self.mindmap.export_xmind(title)?),
        })
    }

    /// Renders and persists, preferring the backend's output directory.
    ///
    /// A second export started while one is running fails with
    /// [`Error::ExportInProgress`].
    pub async fn export<B: NoteBackend, S: DownloadSink + ?Sized>(
        &self,
        backend: &B,
        sink: &S,
        format: MindmapFormat,
        title: Option<&str>,
    ) -> Result<ExportDestination> {
        let _guard = self.begin()?;
        let content = self.render(format, title)?;
        let filename = export_file_name(title, DEFAULT_FILE_STEM, format.extension());
        persist_or_download(backend, sink, &filename, &content, None).await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::{ExportBehavior, FakeBackend};
    use crate::export::FsDownloadSink;

    fn exporter(markdown: &str) -> MindmapExporter {
        let mut mindmap = Mindmap::default();
        mindmap.set_text(markdown);
        MindmapExporter::new(mindmap)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn backend_path_wins_and_binary_is_base64() {
        let backend = FakeBackend::new();
        backend.set_export_behavior(ExportBehavior::Save("/out".to_string()));
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());
        let exporter = exporter("# Root\n\n- a\n");

        let destination = exporter
            .export(&backend, &sink, MindmapFormat::Png, Some("Talk"))
            .await
            .unwrap();

        assert_eq!(destination, ExportDestination::Saved("/out/Talk.png".to_string()));
        let sent = backend.export_requests.lock().unwrap().clone();
        assert!(sent[0].is_base64);
        assert_eq!(sent[0].format, None);
        assert!(!exporter.is_exporting());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_persist_falls_back_to_download_with_default_name() {
        let backend = FakeBackend::new();
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());
        let exporter = exporter("# Root\n");

        let destination = exporter
            .export(&backend, &sink, MindmapFormat::Svg, None)
            .await
            .unwrap();

        let ExportDestination::Downloaded(path) = destination else {
            panic!("expected a local download");
        };
        assert_eq!(path.file_name().unwrap(), "mindmap.svg");
        assert!(fs::read_to_string(path).unwrap().starts_with("<svg"));
        assert_eq!(backend.calls(), vec!["POST /export_file mindmap.svg".to_string()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn overlapping_exports_are_refused() {
        let backend = FakeBackend::new();
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path());
        let exporter = exporter("# Root\n");

        let guard = exporter.begin().unwrap();
        let error = exporter
            .export(&backend, &sink, MindmapFormat::Html, None)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::ExportInProgress));
        assert!(backend.calls().is_empty());

        drop(guard);
        assert!(!exporter.is_exporting());
    }

    #[test]
    fn empty_mind_maps_do_not_render() {
        let exporter = MindmapExporter::new(Mindmap::default());
        assert!(matches!(
            exporter.render(MindmapFormat::Xmind, None),
            Err(Error::NotReady(_))
        ));
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("XMind".parse::<MindmapFormat>().unwrap(), MindmapFormat::Xmind);
        assert!("pdf".parse::<MindmapFormat>().is_err());
    }
}
