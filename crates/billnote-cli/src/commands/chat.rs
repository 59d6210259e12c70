use billnote_core::models::ChatRequest;
use billnote_core::NoteBackend;

use super::common::{normalize_content, AppContext};
use crate::error::CliError;

pub async fn run_chat(
    ctx: &AppContext,
    task_id: &str,
    message_parts: &[String],
    model: Option<&str>,
) -> Result<(), CliError> {
    let message = normalize_content(&message_parts.join(" ")).ok_or(CliError::EmptyMessage)?;
    let task = ctx.task(task_id)?;

    let model_name = match model {
        Some(model) => model.to_string(),
        None => task.form_data.model_name().to_string(),
    };
    let provider_id = ctx.models.provider_for(&model_name).unwrap_or_default();

    let request = ChatRequest {
        task_id: task.id,
        message,
        model_name,
        provider_id,
        history: Vec::new(),
    };
    let reply = ctx.backend.chat_with_note(&request).await?;
    println!("{}", reply.reply.trim());
    Ok(())
}
