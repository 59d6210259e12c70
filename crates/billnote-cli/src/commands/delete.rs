use billnote_core::models::{DeleteTaskRequest, Platform};
use billnote_core::NoteBackend;
use tracing::info;

use super::common::AppContext;
use crate::cli::PlatformArg;
use crate::error::CliError;

pub async fn run_delete(
    ctx: &AppContext,
    video_id: &str,
    platform: PlatformArg,
    task_id: Option<&str>,
) -> Result<(), CliError> {
    let request = DeleteTaskRequest {
        video_id: video_id.trim().to_string(),
        platform: Platform::from(platform).as_str().to_string(),
    };
    ctx.backend.delete_task(&request).await?;
    info!(video_id = %request.video_id, platform = %request.platform, "Deleted note");

    if let Some(task_id) = task_id {
        if ctx.tasks.remove_task(task_id).is_none() {
            return Err(CliError::TaskNotFound(task_id.to_string()));
        }
        ctx.persist_tasks()?;
    }
    println!("Deleted {} note {}", request.platform, request.video_id);
    Ok(())
}
