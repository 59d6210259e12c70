use billnote_core::NoteBackend;

use super::common::{format_status_line, to_task_list_items, AppContext};
use crate::error::CliError;

pub async fn run_status(
    ctx: &AppContext,
    task_id: &str,
    wait: bool,
    json: bool,
) -> Result<(), CliError> {
    if wait {
        ctx.task(task_id)?;
        let task = ctx.wait_for_task(task_id).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&task)?);
        } else {
            println!("{}", format_status_line(&task));
        }
        return Ok(());
    }

    let response = ctx.backend.task_status(task_id).await?;
    if ctx.tasks.update_status(
        task_id,
        response.status.clone(),
        response.message.clone(),
        response.result.clone(),
    ) {
        ctx.persist_tasks()?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        match response.message.as_deref().filter(|message| !message.is_empty()) {
            Some(message) => println!("[{}] {task_id} {message}", response.status),
            None => println!("[{}] {task_id}", response.status),
        }
    }
    Ok(())
}

pub fn run_tasks(ctx: &AppContext, json: bool) -> Result<(), CliError> {
    let mut tasks = ctx.tasks.tasks();
    tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    let items = to_task_list_items(&tasks);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    for item in items {
        println!(
            "{}  {:<12} {:<9} {}  ({})",
            item.id, item.status, item.source, item.title, item.relative_time
        );
    }
    Ok(())
}
