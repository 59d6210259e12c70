use billnote_core::forms::{
    FormControl, InputMode, NoteForm, NoteFormValues, SubmitOutcome, ValidationErrors,
};
use billnote_core::models::{GenerationRequest, ModelEntry, NoteFormat, Task};
use tracing::{info, warn};

use super::common::{resolve_text_argument, AppContext};
use crate::cli::{text_source, CommonOptions, PlatformArg, VideoOptions};
use crate::error::CliError;

pub async fn run_generate_video(
    ctx: &AppContext,
    platform: PlatformArg,
    url: &str,
    options: &VideoOptions,
    wait: bool,
) -> Result<(), CliError> {
    let mut form = new_form(ctx, &options.common)?;
    form.create_new();
    form.set_platform(billnote_core::models::Platform::from(platform).as_str())?;
    form.set_video_url(url)?;
    apply_video_options(&mut form, options);

    let task_id = finish_submit(ctx, form.submit(&ctx.backend).await)?;
    if wait {
        ctx.wait_for_task(&task_id).await?;
    }
    Ok(())
}

pub async fn run_generate_text(
    ctx: &AppContext,
    text: Option<&str>,
    url: Option<&str>,
    title: Option<String>,
    options: &CommonOptions,
    wait: bool,
) -> Result<(), CliError> {
    let mut form = new_form(ctx, options)?;
    form.create_new();
    form.set_input_mode(InputMode::Text);

    let content = match url {
        Some(url) => url.trim().to_string(),
        None => resolve_text_argument(text)?,
    };
    let fields = form.text_mut();
    fields.source_type = text_source(url);
    fields.content = content;
    fields.title = title.unwrap_or_default();
    apply_common_options(&mut form, options);

    let task_id = finish_submit(ctx, form.submit(&ctx.backend).await)?;
    if wait {
        ctx.wait_for_task(&task_id).await?;
    }
    Ok(())
}

pub async fn run_retry(
    ctx: &AppContext,
    task_id: &str,
    options: &VideoOptions,
    wait: bool,
) -> Result<(), CliError> {
    ensure_retryable(&ctx.task(task_id)?)?;
    let mut form = new_form(ctx, &options.common)?;
    form.load_task(task_id)?;
    if form.is_generating() {
        return Err(CliError::Busy(task_id.to_string()));
    }
    apply_video_options(&mut form, options);

    let task_id = finish_submit(ctx, form.submit(&ctx.backend).await)?;
    if wait {
        ctx.wait_for_task(&task_id).await?;
    }
    Ok(())
}

/// Only video tasks go through the retry path.
pub fn ensure_retryable(task: &Task) -> Result<(), CliError> {
    match task.form_data {
        GenerationRequest::Video(_) => Ok(()),
        GenerationRequest::Text(_) => Err(CliError::Validation(format!(
            "Task {} is a text note and cannot be retried; submit it again with `billnote generate text`",
            task.id
        ))),
    }
}

fn new_form(ctx: &AppContext, options: &CommonOptions) -> Result<NoteForm, CliError> {
    if let (Some(model), Some(provider)) = (&options.model, &options.provider) {
        let mut models = ctx.models.enabled_models();
        models.retain(|entry| entry.model_name != *model);
        models.push(ModelEntry {
            id: format!("{provider}:{model}"),
            model_name: model.clone(),
            provider_id: provider.clone(),
        });
        ctx.models.set_models(models);
    }
    if ctx.models.first_model().is_none() {
        return Err(CliError::NoModel);
    }
    Ok(NoteForm::new(ctx.tasks.clone(), ctx.models.clone()))
}

fn apply_common_options(form: &mut NoteForm, options: &CommonOptions) {
    let values = form.values_mut();
    if let Some(model) = &options.model {
        values.model_name.clone_from(model);
    }
    if let Some(style) = &options.style {
        values.style.clone_from(style);
    }
    if let Some(level) = &options.summary_level {
        values.summary_level.clone_from(level);
    }
    if let Some(extras) = &options.extras {
        values.extras.clone_from(extras);
    }

    if !options.formats.is_empty() {
        values.format.clear();
        for format in &options.formats {
            let format = NoteFormat::from(*format);
            if !form.toggle_format(format, true) {
                warn!(
                    "Format '{}' is not available with the current options; skipped",
                    format.as_str()
                );
            }
        }
    }
}

/// Applies flags on top of the form. Flags left unset keep the loaded values.
fn apply_video_options(form: &mut NoteForm, options: &VideoOptions) {
    apply_video_toggles(form.values_mut(), options);

    if form.is_enabled(FormControl::VideoInterval) {
        if let Some(interval) = &options.interval {
            form.values_mut().video_interval.clone_from(interval);
        }
    }
    if form.is_enabled(FormControl::GridSize) {
        if let Some([columns, rows]) = options.grid.as_deref() {
            form.values_mut().grid_size = [columns.clone(), rows.clone()];
        }
    }
    if options.interval.is_some() && !form.is_enabled(FormControl::VideoInterval) {
        warn!("--interval only applies with --video-understanding; ignored");
    }

    apply_common_options(form, &options.common);
}

/// Quality and the on/off flags; each overrides the loaded value only when given.
pub fn apply_video_toggles(values: &mut NoteFormValues, options: &VideoOptions) {
    if let Some(quality) = options.quality {
        values.quality = quality.into();
    }
    if let Some(screenshot) = options.screenshot_toggle() {
        values.screenshot = screenshot;
    }
    if let Some(link) = options.link_toggle() {
        values.link = link;
    }
    if let Some(video_understanding) = options.video_understanding_toggle() {
        values.video_understanding = video_understanding;
    }
}

fn finish_submit(ctx: &AppContext, outcome: SubmitOutcome) -> Result<String, CliError> {
    match outcome {
        SubmitOutcome::Created(task_id) => {
            ctx.persist_tasks()?;
            info!(task_id = %task_id, "Task created");
            println!("Task {task_id} submitted");
            Ok(task_id)
        }
        SubmitOutcome::Retried(task_id) => {
            ctx.persist_tasks()?;
            info!(task_id = %task_id, "Task resubmitted");
            println!("Task {task_id} resubmitted");
            Ok(task_id)
        }
        SubmitOutcome::Invalid(errors) => Err(CliError::Validation(describe_errors(&errors))),
        SubmitOutcome::Busy => Err(CliError::Busy(
            ctx.tasks.current_task_id().unwrap_or_default(),
        )),
        SubmitOutcome::Failed { message, notify } => {
            if notify {
                Err(CliError::GenerationFailed(message))
            } else {
                Err(CliError::Silent)
            }
        }
    }
}

/// One line per message, field errors prefixed by the field name.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    errors
        .fields()
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .chain(errors.form_errors().iter().cloned())
        .collect::<Vec<_>>()
        .join("\n")
}
