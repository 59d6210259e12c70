use std::path::Path;

use billnote_core::export::{export_note, ExportDestination};
use billnote_core::forms::NoteHeader;
use billnote_core::mindmap::{Mindmap, MindmapExporter, MindmapFormat};

use super::common::{normalize_content, AppContext};
use crate::cli::{ExportKind, ExportTarget};
use crate::error::CliError;

pub async fn run_export(
    ctx: &AppContext,
    task_id: &str,
    target: ExportTarget,
    title: Option<String>,
) -> Result<(), CliError> {
    let (task, result) = ctx.note(task_id).await?;
    let title = title.or_else(|| result.title().map(str::to_string));
    let sink = ctx.sink();

    let destination = match target.kind() {
        ExportKind::Note(format) => {
            let mut header = NoteHeader::new();
            header.toggle_export_menu();
            header
                .select_export(format, |format| {
                    export_note(
                        &ctx.backend,
                        &sink,
                        &result.markdown,
                        title.as_deref(),
                        format,
                    )
                })
                .await?
        }
        ExportKind::Mindmap(format) => {
            export_mindmap(ctx, &result.markdown, format, title.as_deref()).await?
        }
    };
    tracing::debug!(task_id = %task.id, "Export finished");
    println!("{destination}");
    Ok(())
}

pub async fn run_mindmap(
    ctx: &AppContext,
    path: &Path,
    format: MindmapFormat,
    title: Option<String>,
) -> Result<(), CliError> {
    let markdown = std::fs::read_to_string(path)?;
    let markdown = normalize_content(&markdown).ok_or(CliError::EmptyContent)?;
    let title = title.or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    });

    let destination = export_mindmap(ctx, &markdown, format, title.as_deref()).await?;
    println!("{destination}");
    Ok(())
}

async fn export_mindmap(
    ctx: &AppContext,
    markdown: &str,
    format: MindmapFormat,
    title: Option<&str>,
) -> Result<ExportDestination, CliError> {
    let mut mindmap = Mindmap::default();
    mindmap.set_text(markdown);
    let exporter = MindmapExporter::new(mindmap);
    Ok(exporter
        .export(&ctx.backend, &ctx.sink(), format, title)
        .await?)
}
