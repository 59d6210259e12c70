use billnote_core::forms::{format_created_at, NoteHeader, ViewMode};
use billnote_core::mindmap::{transform, MindNode};
use billnote_core::models::Task;
use chrono::Local;

use super::common::{task_title, AppContext};
use crate::error::CliError;

pub async fn run_show(
    ctx: &AppContext,
    task_id: &str,
    map: bool,
    transcript: bool,
) -> Result<(), CliError> {
    let (task, result) = ctx.note(task_id).await?;

    let mut header = NoteHeader::new();
    if map {
        header.toggle_view_mode();
    }
    if transcript {
        header.toggle_transcript();
    }

    println!("{}", header_line(&task));
    println!();
    match header.view_mode() {
        ViewMode::Preview => println!("{}", result.markdown.trim_end()),
        ViewMode::Map => print!("{}", outline(&transform(&result.markdown))),
    }

    if header.show_transcript() {
        println!();
        println!("--- Transcript ---");
        match result.transcript_text() {
            Some(text) => println!("{text}"),
            None => println!("(no transcript)"),
        }
    }
    Ok(())
}

/// Title, style, model and creation time, as shown above a note.
pub fn header_line(task: &Task) -> String {
    let mut parts = vec![task_title(task)];
    parts.push(NoteHeader::style_label(task.form_data.style()).to_string());
    parts.push(task.form_data.model_name().to_string());
    let created = format_created_at(task.created_at, &Local);
    if !created.is_empty() {
        parts.push(created);
    }
    parts.retain(|part| !part.is_empty());
    parts.join(" | ")
}

/// Indented plain-text outline of a mind-map tree.
pub fn outline(root: &MindNode) -> String {
    let mut out = String::new();
    write_outline(root, 0, &mut out);
    out
}

fn write_outline(node: &MindNode, depth: usize, out: &mut String) {
    let text = node.plain_text();
    let text = text.trim();
    if !text.is_empty() {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(&text.split_whitespace().collect::<Vec<_>>().join(" "));
        out.push('\n');
    }
    for child in &node.children {
        write_outline(child, depth + 1, out);
    }
}
