//! Note submission form: video requests and text/URL requests.

use std::sync::Arc;

use super::ValidationErrors;
use crate::api::NoteBackend;
use crate::error::{Error, Result};
use crate::models::{
    GenerationRequest, NoteFormat, NoteRequest, Quality, SourceType, TextNoteRequest,
    DEFAULT_GRID_SIZE, DEFAULT_STYLE, DEFAULT_SUMMARY_LEVEL, DEFAULT_VIDEO_INTERVAL, NOTE_FORMATS,
    TEXT_MODE_FORMATS,
};
use crate::store::{ModelStore, TaskStore};
use crate::util::normalize_text_option;

const LOCAL_PLATFORM: &str = "local";
const VIDEO_INTERVAL_RANGE: (i64, i64) = (1, 30);
const GRID_RANGE: (i64, i64) = (1, 10);

/// Which of the two submit paths the form runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Video,
    Text,
}

/// Raw video-mode field values. Numeric fields keep the text the user typed
/// and are coerced during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormValues {
    pub video_url: String,
    pub platform: String,
    pub quality: Quality,
    pub screenshot: bool,
    pub link: bool,
    pub model_name: String,
    pub format: Vec<String>,
    pub style: String,
    pub summary_level: String,
    pub extras: String,
    pub video_understanding: bool,
    pub video_interval: String,
    pub grid_size: [String; 2],
}

impl Default for NoteFormValues {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            platform: "bilibili".to_string(),
            quality: Quality::Medium,
            screenshot: false,
            link: false,
            model_name: String::new(),
            format: Vec::new(),
            style: DEFAULT_STYLE.to_string(),
            summary_level: DEFAULT_SUMMARY_LEVEL.to_string(),
            extras: String::new(),
            video_understanding: false,
            video_interval: DEFAULT_VIDEO_INTERVAL.to_string(),
            grid_size: DEFAULT_GRID_SIZE.map(|value| value.to_string()),
        }
    }
}

impl From<&NoteRequest> for NoteFormValues {
    fn from(request: &NoteRequest) -> Self {
        Self {
            video_url: request.video_url.clone(),
            platform: request.platform.clone(),
            quality: request.quality,
            screenshot: request.screenshot,
            link: request.link,
            model_name: request.model_name.clone(),
            format: request.format.clone(),
            style: request.style.clone(),
            summary_level: request.summary_level.clone(),
            extras: request.extras.clone().unwrap_or_default(),
            video_understanding: request.video_understanding,
            video_interval: request.video_interval.to_string(),
            grid_size: request.grid_size.map(|value| value.to_string()),
        }
    }
}

/// Text-mode inputs, kept separately so switching modes loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFormValues {
    pub source_type: SourceType,
    pub content: String,
    pub title: String,
}

/// Controls whose enabled state depends on other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormControl {
    Platform,
    VideoUrl,
    VideoInterval,
    GridSize,
    Format(NoteFormat),
    Submit,
}

/// Result of one submit action.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A new task was registered under this id
    Created(String),
    /// The current task was resubmitted under its existing id
    Retried(String),
    /// Local validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// The current task is still generating
    Busy,
    /// The request failed. `notify` is false on the video path, which only logs.
    Failed { message: String, notify: bool },
}

/// Validates video-mode values into a request (provider id left empty).
pub fn validate_video(values: &NoteFormValues) -> std::result::Result<NoteRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let platform = values.platform.trim();
    if platform.is_empty() {
        errors.add_field("platform", "Please select a platform");
    }

    let video_url = values.video_url.trim();
    if platform == LOCAL_PLATFORM {
        if video_url.is_empty() {
            errors.add_field("video_url", "Local path required");
        }
    } else if video_url.is_empty() {
        errors.add_field("video_url", "Video URL required");
    } else if !is_web_url(video_url) {
        errors.add_field("video_url", "Invalid video URL");
    }

    if values.model_name.trim().is_empty() {
        errors.add_field("model_name", "Please select a model");
    }
    if values.style.trim().is_empty() {
        errors.add_field("style", "Please select a note style");
    }

    let video_interval = coerce_in_range(&values.video_interval, VIDEO_INTERVAL_RANGE);
    if video_interval.is_none() {
        errors.add_field(
            "video_interval",
            format!(
                "Interval must be a whole number between {} and {}",
                VIDEO_INTERVAL_RANGE.0, VIDEO_INTERVAL_RANGE.1
            ),
        );
    }
    let columns = coerce_in_range(&values.grid_size[0], GRID_RANGE);
    let rows = coerce_in_range(&values.grid_size[1], GRID_RANGE);
    if columns.is_none() || rows.is_none() {
        errors.add_field(
            "grid_size",
            format!(
                "Grid size must be whole numbers between {} and {}",
                GRID_RANGE.0, GRID_RANGE.1
            ),
        );
    }

    errors.into_result()?;

    Ok(NoteRequest {
        video_url: video_url.to_string(),
        platform: platform.to_string(),
        quality: values.quality,
        screenshot: values.screenshot,
        link: values.link,
        model_name: values.model_name.trim().to_string(),
        provider_id: String::new(),
        task_id: None,
        format: values.format.clone(),
        style: values.style.trim().to_string(),
        summary_level: normalize_text_option(Some(values.summary_level.clone()))
            .unwrap_or_else(|| DEFAULT_SUMMARY_LEVEL.to_string()),
        extras: normalize_text_option(Some(values.extras.clone())),
        video_understanding: values.video_understanding,
        video_interval: video_interval.unwrap_or(DEFAULT_VIDEO_INTERVAL),
        grid_size: [
            columns.unwrap_or(DEFAULT_GRID_SIZE[0]),
            rows.unwrap_or(DEFAULT_GRID_SIZE[1]),
        ],
    })
}

/// Validates text-mode inputs. Errors here are form-level, never per field.
pub fn validate_text(
    text: &TextFormValues,
    values: &NoteFormValues,
) -> std::result::Result<TextNoteRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if text.content.trim().is_empty() {
        errors.add_form("Please enter text or a URL");
    }
    errors.into_result()?;

    Ok(TextNoteRequest {
        source_type: text.source_type,
        content: text.content.clone(),
        title: normalize_text_option(Some(text.title.clone())),
        model_name: values.model_name.trim().to_string(),
        provider_id: String::new(),
        style: values.style.clone(),
        summary_level: normalize_text_option(Some(values.summary_level.clone()))
            .unwrap_or_else(|| DEFAULT_SUMMARY_LEVEL.to_string()),
        extras: normalize_text_option(Some(values.extras.clone())),
        format: values.format.clone(),
    })
}

fn is_web_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Coerces typed text to a whole number and checks the inclusive range.
fn coerce_in_range(raw: &str, (min, max): (i64, i64)) -> Option<u8> {
    let number = raw.trim().parse::<f64>().ok()?;
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let whole = number as i64;
    if (min..=max).contains(&whole) {
        u8::try_from(whole).ok()
    } else {
        None
    }
}

/// Controller behind the note submission form.
#[derive(Debug)]
pub struct NoteForm {
    input_mode: InputMode,
    values: NoteFormValues,
    text: TextFormValues,
    errors: ValidationErrors,
    loaded_task_id: Option<String>,
    tasks: Arc<TaskStore>,
    models: Arc<ModelStore>,
}

impl NoteForm {
    /// A fresh form; the model defaults to the first enabled model.
    pub fn new(tasks: Arc<TaskStore>, models: Arc<ModelStore>) -> Self {
        let mut form = Self {
            input_mode: InputMode::Video,
            values: NoteFormValues::default(),
            text: TextFormValues::default(),
            errors: ValidationErrors::new(),
            loaded_task_id: None,
            tasks,
            models,
        };
        form.sync_default_model();
        form.sync_with_current_task();
        form
    }

    pub const fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Switches the submit path; neither mode's fields are cleared.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub const fn values(&self) -> &NoteFormValues {
        &self.values
    }

    /// Mutable access to fields that stay editable while a task is loaded.
    pub fn values_mut(&mut self) -> &mut NoteFormValues {
        &mut self.values
    }

    pub const fn text(&self) -> &TextFormValues {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextFormValues {
        &mut self.text
    }

    /// Field errors from the last video-mode submit.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether an existing task is loaded into the form.
    pub fn is_editing(&self) -> bool {
        self.tasks.current_task().is_some()
    }

    /// Whether the current task is still being generated.
    pub fn is_generating(&self) -> bool {
        self.tasks
            .current_task()
            .is_some_and(|task| task.status.is_generating())
    }

    pub fn set_platform(&mut self, platform: &str) -> Result<()> {
        self.ensure_source_editable()?;
        self.values.platform = platform.trim().to_string();
        Ok(())
    }

    pub fn set_video_url(&mut self, video_url: &str) -> Result<()> {
        self.ensure_source_editable()?;
        self.values.video_url = video_url.to_string();
        Ok(())
    }

    fn ensure_source_editable(&self) -> Result<()> {
        if self.is_editing() {
            return Err(Error::InvalidInput(
                "Platform and URL are read-only while editing a task; start a new note to change them"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Enabled state of controls that depend on other fields.
    pub fn is_enabled(&self, control: FormControl) -> bool {
        match control {
            FormControl::Platform | FormControl::VideoUrl => !self.is_editing(),
            FormControl::VideoInterval | FormControl::GridSize => self.values.video_understanding,
            FormControl::Format(NoteFormat::Link) => self.values.platform != LOCAL_PLATFORM,
            FormControl::Format(NoteFormat::Screenshot) => self.values.video_understanding,
            FormControl::Format(_) => true,
            FormControl::Submit => !self.is_generating(),
        }
    }

    /// Format checkboxes shown for the current mode.
    pub fn visible_formats(&self) -> Vec<NoteFormat> {
        match self.input_mode {
            InputMode::Video => NOTE_FORMATS.iter().map(|(format, _)| *format).collect(),
            InputMode::Text => TEXT_MODE_FORMATS.to_vec(),
        }
    }

    /// Checks or unchecks a format; disabled or hidden formats are left alone.
    pub fn toggle_format(&mut self, format: NoteFormat, checked: bool) -> bool {
        if !self.visible_formats().contains(&format) || !self.is_enabled(FormControl::Format(format))
        {
            return false;
        }
        let value = format.as_str();
        self.values.format.retain(|existing| existing != value);
        if checked {
            self.values.format.push(value.to_string());
        }
        true
    }

    /// Label of the primary button.
    pub fn submit_label(&self) -> &'static str {
        if self.is_generating() {
            "Generating..."
        } else if self.is_editing() {
            "Regenerate"
        } else {
            "Generate Note"
        }
    }

    /// Picks the first enabled model when none is selected yet.
    pub fn sync_default_model(&mut self) {
        if self.values.model_name.trim().is_empty() {
            if let Some(model) = self.models.first_model() {
                self.values.model_name = model.model_name;
            }
        }
    }

    /// Reloads the form from the task store's current task when it changed.
    pub fn sync_with_current_task(&mut self) {
        let current = self.tasks.current_task();
        let current_id = current.as_ref().map(|task| task.id.clone());
        if current_id == self.loaded_task_id {
            return;
        }
        self.loaded_task_id = current_id;
        let Some(task) = current else {
            return;
        };
        match &task.form_data {
            GenerationRequest::Video(request) => {
                self.values = NoteFormValues::from(request);
                self.input_mode = InputMode::Video;
            }
            GenerationRequest::Text(request) => {
                self.text = TextFormValues {
                    source_type: request.source_type,
                    content: request.content.clone(),
                    title: request.title.clone().unwrap_or_default(),
                };
                self.values.model_name.clone_from(&request.model_name);
                self.values.style.clone_from(&request.style);
                self.values.summary_level.clone_from(&request.summary_level);
                self.values.extras = request.extras.clone().unwrap_or_default();
                self.values.format.clone_from(&request.format);
                self.input_mode = InputMode::Text;
            }
        }
        self.errors = ValidationErrors::new();
    }

    /// Loads an existing task into the form for regeneration.
    pub fn load_task(&mut self, task_id: &str) -> Result<()> {
        if self.tasks.get(task_id).is_none() {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        self.tasks.set_current_task(Some(task_id));
        self.sync_with_current_task();
        Ok(())
    }

    /// Leaves edit mode so the next submit creates a new task.
    pub fn create_new(&mut self) {
        self.tasks.set_current_task(None);
        self.loaded_task_id = None;
    }

    /// Runs exactly one submit path for the active input mode.
    pub async fn submit<B: NoteBackend>(&mut self, backend: &B) -> SubmitOutcome {
        if self.is_generating() {
            return SubmitOutcome::Busy;
        }
        match self.input_mode {
            InputMode::Text => self.submit_text(backend).await,
            InputMode::Video => self.submit_video(backend).await,
        }
    }

    async fn submit_text<B: NoteBackend>(&mut self, backend: &B) -> SubmitOutcome {
        let mut request = match validate_text(&self.text, &self.values) {
            Ok(request) => request,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        request.provider_id = self
            .models
            .provider_for(&request.model_name)
            .unwrap_or_default();

        match backend.generate_note_from_text(&request).await {
            Ok(created) => {
                self.tasks
                    .add_pending_task(&created.task_id, "text", GenerationRequest::Text(request));
                self.loaded_task_id = Some(created.task_id.clone());
                SubmitOutcome::Created(created.task_id)
            }
            Err(error) => {
                tracing::error!("Text note submission failed: {error}");
                SubmitOutcome::Failed {
                    message: error.to_string(),
                    notify: true,
                }
            }
        }
    }

    async fn submit_video<B: NoteBackend>(&mut self, backend: &B) -> SubmitOutcome {
        let mut request = match validate_video(&self.values) {
            Ok(request) => request,
            Err(errors) => {
                tracing::warn!("Validation failed: {errors}");
                self.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.errors = ValidationErrors::new();

        let Some(provider_id) = self.models.provider_for(&request.model_name) else {
            let mut errors = ValidationErrors::new();
            errors.add_field("model_name", "Selected model is not enabled");
            self.errors = errors.clone();
            return SubmitOutcome::Invalid(errors);
        };
        request.provider_id = provider_id;

        if let Some(task_id) = self.tasks.current_task_id() {
            return match self.tasks.retry_task(backend, &task_id, request).await {
                Ok(()) => SubmitOutcome::Retried(task_id),
                Err(error) => {
                    tracing::error!("Retrying task {task_id} failed: {error}");
                    SubmitOutcome::Failed {
                        message: error.to_string(),
                        notify: false,
                    }
                }
            };
        }

        match backend.generate_note(&request).await {
            Ok(created) => {
                let platform = request.platform.clone();
                self.tasks.add_pending_task(
                    &created.task_id,
                    &platform,
                    GenerationRequest::Video(request),
                );
                self.loaded_task_id = Some(created.task_id.clone());
                SubmitOutcome::Created(created.task_id)
            }
            Err(error) => {
                tracing::error!("Video note submission failed: {error}");
                SubmitOutcome::Failed {
                    message: error.to_string(),
                    notify: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::models::{ModelEntry, TaskStatus};

    fn stores() -> (Arc<TaskStore>, Arc<ModelStore>) {
        let models = ModelStore::new(vec![ModelEntry {
            id: "1".to_string(),
            model_name: "gpt-4".to_string(),
            provider_id: "openai".to_string(),
        }]);
        (Arc::new(TaskStore::new()), Arc::new(models))
    }

    fn video_values(platform: &str, video_url: &str) -> NoteFormValues {
        NoteFormValues {
            platform: platform.to_string(),
            video_url: video_url.to_string(),
            model_name: "gpt-4".to_string(),
            ..NoteFormValues::default()
        }
    }

    #[test]
    fn non_local_platforms_require_http_urls() {
        for bad in ["ftp://x", "not a url", "https://", ""] {
            let errors = validate_video(&video_values("youtube", bad)).unwrap_err();
            assert!(errors.field("video_url").is_some(), "{bad} should fail");
        }
        let request =
            validate_video(&video_values("youtube", "https://youtube.com/watch?v=abc")).unwrap();
        assert_eq!(request.video_url, "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn local_platform_accepts_any_non_empty_path() {
        assert!(validate_video(&video_values("local", "not a url")).is_ok());
        assert!(validate_video(&video_values("local", "/uploads/talk.mp4")).is_ok());
        let errors = validate_video(&video_values("local", "")).unwrap_err();
        assert_eq!(errors.field("video_url"), Some("Local path required"));
    }

    #[test]
    fn missing_platform_model_and_style_are_field_errors() {
        let values = NoteFormValues {
            platform: String::new(),
            style: String::new(),
            ..NoteFormValues::default()
        };
        let errors = validate_video(&values).unwrap_err();
        assert_eq!(errors.field("platform"), Some("Please select a platform"));
        assert_eq!(errors.field("model_name"), Some("Please select a model"));
        assert_eq!(errors.field("style"), Some("Please select a note style"));
    }

    #[test]
    fn video_interval_accepts_only_whole_numbers_in_range() {
        for (raw, ok) in [
            ("1", true),
            ("30", true),
            (" 12 ", true),
            ("0", false),
            ("31", false),
            ("abc", false),
            ("", false),
            ("2.5", false),
        ] {
            let mut values = video_values("bilibili", "https://www.bilibili.com/video/x");
            values.video_interval = raw.to_string();
            assert_eq!(validate_video(&values).is_ok(), ok, "interval {raw:?}");
        }
    }

    #[test]
    fn grid_size_components_are_checked_independently() {
        let mut values = video_values("bilibili", "https://www.bilibili.com/video/x");
        assert_eq!(validate_video(&values).unwrap().grid_size, [3, 3]);

        values.grid_size = ["0".to_string(), "5".to_string()];
        assert!(validate_video(&values).unwrap_err().field("grid_size").is_some());

        values.grid_size = ["10".to_string(), "11".to_string()];
        assert!(validate_video(&values).is_err());

        values.grid_size = ["10".to_string(), "1".to_string()];
        assert_eq!(validate_video(&values).unwrap().grid_size, [10, 1]);
    }

    #[test]
    fn blank_text_content_is_a_form_level_error() {
        let errors = validate_text(&TextFormValues::default(), &NoteFormValues::default())
            .unwrap_err();
        assert!(errors.fields().is_empty());
        assert_eq!(errors.form_errors(), ["Please enter text or a URL"]);
    }

    #[test]
    fn video_understanding_gates_dependent_controls() {
        let (tasks, models) = stores();
        let mut form = NoteForm::new(tasks, models);
        assert!(!form.is_enabled(FormControl::VideoInterval));
        assert!(!form.is_enabled(FormControl::GridSize));
        assert!(!form.toggle_format(NoteFormat::Screenshot, true));

        form.values_mut().video_understanding = true;
        assert!(form.is_enabled(FormControl::GridSize));
        assert!(form.toggle_format(NoteFormat::Screenshot, true));
        assert_eq!(form.values().format, vec!["screenshot".to_string()]);
    }

    #[test]
    fn link_format_is_disabled_for_local_files_and_text_mode_hides_extras() {
        let (tasks, models) = stores();
        let mut form = NoteForm::new(tasks, models);
        form.set_platform("local").unwrap();
        assert!(!form.is_enabled(FormControl::Format(NoteFormat::Link)));

        form.set_input_mode(InputMode::Text);
        assert_eq!(
            form.visible_formats(),
            vec![NoteFormat::Toc, NoteFormat::Summary]
        );
        assert!(!form.toggle_format(NoteFormat::Link, true));
    }

    #[test]
    fn new_form_defaults_to_first_enabled_model() {
        let (tasks, models) = stores();
        let form = NoteForm::new(tasks, models);
        assert_eq!(form.values().model_name, "gpt-4");
        assert_eq!(form.submit_label(), "Generate Note");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn video_submit_posts_once_and_registers_pending_task() {
        let backend = FakeBackend::with_task_id("t1");
        let (tasks, models) = stores();
        let mut form = NoteForm::new(Arc::clone(&tasks), models);
        form.set_platform("bilibili").unwrap();
        form.set_video_url("https://www.bilibili.com/video/x").unwrap();
        form.values_mut().style = "minimal".to_string();

        let outcome = form.submit(&backend).await;

        assert!(matches!(outcome, SubmitOutcome::Created(ref id) if id == "t1"));
        assert_eq!(backend.calls(), vec!["POST /generate_note".to_string()]);
        let sent = backend.video_requests.lock().unwrap().clone();
        assert_eq!(sent[0].provider_id, "openai");
        assert_eq!(sent[0].task_id, None);

        let registered = tasks.tasks();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].id, "t1");
        assert_eq!(registered[0].status, TaskStatus::Pending);
        assert_eq!(registered[0].source, "bilibili");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn invalid_video_submit_sends_nothing() {
        let backend = FakeBackend::new();
        let (tasks, models) = stores();
        let mut form = NoteForm::new(tasks, models);
        form.set_video_url("not a url").unwrap();

        let outcome = form.submit(&backend).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(form.errors().field("video_url"), Some("Invalid video URL"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn text_submit_registers_text_task_and_keeps_video_fields() {
        let backend = FakeBackend::with_task_id("t9");
        let (tasks, models) = stores();
        let mut form = NoteForm::new(Arc::clone(&tasks), models);
        form.set_video_url("https://www.bilibili.com/video/x").unwrap();
        form.set_input_mode(InputMode::Text);
        form.text_mut().content = "Some article text".to_string();

        let outcome = form.submit(&backend).await;

        assert!(matches!(outcome, SubmitOutcome::Created(ref id) if id == "t9"));
        assert_eq!(
            backend.calls(),
            vec!["POST /generate_note_from_text".to_string()]
        );
        assert_eq!(tasks.get("t9").unwrap().source, "text");
        assert_eq!(form.values().video_url, "https://www.bilibili.com/video/x");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_text_submit_is_blocked() {
        let backend = FakeBackend::new();
        let (tasks, models) = stores();
        let mut form = NoteForm::new(tasks, models);
        form.set_input_mode(InputMode::Text);

        assert!(matches!(
            form.submit(&backend).await,
            SubmitOutcome::Invalid(_)
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failures_notify_only_on_the_text_path() {
        let backend = FakeBackend::new();
        *backend.fail_generation.lock().unwrap() = true;
        let (tasks, models) = stores();
        let mut form = NoteForm::new(Arc::clone(&tasks), models);
        form.set_video_url("https://www.youtube.com/watch?v=abc").unwrap();

        let video = form.submit(&backend).await;
        assert!(matches!(video, SubmitOutcome::Failed { notify: false, .. }));

        form.set_input_mode(InputMode::Text);
        form.text_mut().content = "text".to_string();
        let text = form.submit(&backend).await;
        assert!(matches!(text, SubmitOutcome::Failed { notify: true, .. }));
        assert!(tasks.tasks().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn editing_locks_source_fields_and_regenerates_with_same_id() {
        let backend = FakeBackend::with_task_id("t1");
        let (tasks, models) = stores();
        let mut form = NoteForm::new(Arc::clone(&tasks), models);
        form.set_video_url("https://www.youtube.com/watch?v=abc").unwrap();
        assert!(matches!(form.submit(&backend).await, SubmitOutcome::Created(_)));

        assert_eq!(form.submit_label(), "Generating...");
        assert!(matches!(form.submit(&backend).await, SubmitOutcome::Busy));

        tasks.update_status("t1", TaskStatus::Success, None, None);
        assert_eq!(form.submit_label(), "Regenerate");
        assert!(form.set_video_url("https://example.com/other").is_err());
        assert!(!form.is_enabled(FormControl::Platform));

        form.values_mut().style = "detailed".to_string();
        let outcome = form.submit(&backend).await;
        assert!(matches!(outcome, SubmitOutcome::Retried(ref id) if id == "t1"));
        let sent = backend.video_requests.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].task_id.as_deref(), Some("t1"));
        assert_eq!(tasks.tasks().len(), 1);

        form.create_new();
        assert!(form.set_video_url("https://example.com/other").is_ok());
    }

    #[test]
    fn load_task_restores_saved_form_values() {
        let (tasks, models) = stores();
        let mut saved = validate_video(&video_values("youtube", "https://youtu.be/x")).unwrap();
        saved.video_interval = 9;
        tasks.add_pending_task("t5", "youtube", GenerationRequest::Video(saved));
        tasks.set_current_task(None);

        let mut form = NoteForm::new(Arc::clone(&tasks), models);
        assert_eq!(form.values().video_url, "");
        form.load_task("t5").unwrap();
        assert_eq!(form.values().video_url, "https://youtu.be/x");
        assert_eq!(form.values().video_interval, "9");
        assert!(form.load_task("missing").is_err());
    }
}
