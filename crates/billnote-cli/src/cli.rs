use std::path::PathBuf;

use billnote_core::export::NoteExportFormat;
use billnote_core::mindmap::MindmapFormat;
use billnote_core::models::{NoteFormat, Platform, Quality, SourceType};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "billnote")]
#[command(about = "Turn videos, articles and text into structured notes and mind maps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (also the profile `config init` writes)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Backend API base URL (overrides env and profile)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Task history file
    #[arg(long, global = true, value_name = "PATH")]
    pub history_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a new note generation task
    #[command(alias = "gen")]
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
    /// Regenerate an existing video task with edited options
    ///
    /// Flags left out keep the task's values; `--no-*` flags switch options off.
    /// Text notes cannot be retried; submit them again with `generate text`.
    Retry {
        /// Task ID
        task_id: String,
        #[command(flatten)]
        options: VideoOptions,
        /// Wait until the task finishes
        #[arg(long)]
        wait: bool,
    },
    /// Show or follow the status of a task
    Status {
        /// Task ID
        task_id: String,
        /// Poll until the task succeeds or fails
        #[arg(long)]
        wait: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known tasks
    #[command(alias = "ls")]
    Tasks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a generated note on the backend
    Delete {
        /// Video ID of the note
        #[arg(long, value_name = "ID")]
        video_id: String,
        /// Platform of the note
        #[arg(long, value_enum)]
        platform: PlatformArg,
        /// Also forget this local task
        #[arg(long, value_name = "TASK_ID")]
        task_id: Option<String>,
    },
    /// Ask a question about a generated note
    Chat {
        /// Task ID
        task_id: String,
        /// Question text
        message: Vec<String>,
        /// Model to answer with (defaults to the task's model)
        #[arg(long)]
        model: Option<String>,
    },
    /// Print a generated note
    Show {
        /// Task ID
        task_id: String,
        /// Print the mind-map outline instead of markdown
        #[arg(long)]
        map: bool,
        /// Append the transcript
        #[arg(long)]
        transcript: bool,
    },
    /// Export a generated note or its mind map
    Export {
        /// Task ID
        task_id: String,
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportTarget::Md)]
        format: ExportTarget,
        /// File title (defaults to the video title)
        #[arg(long)]
        title: Option<String>,
    },
    /// Render a markdown file as a mind map
    Mindmap {
        /// Markdown file
        path: PathBuf,
        /// Export format
        #[arg(long, value_enum, default_value_t = MindmapTarget::Html)]
        format: MindmapTarget,
        /// File title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,
    },
    /// Manage downloader cookies
    Cookie {
        #[command(subcommand)]
        command: CookieCommands,
    },
    /// Manage the backend output directory
    OutputDir {
        #[command(subcommand)]
        command: OutputDirCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum GenerateCommands {
    /// Generate a note from a video
    Video {
        /// Source platform
        #[arg(long, value_enum, default_value_t = PlatformArg::Bilibili)]
        platform: PlatformArg,
        /// Video URL, or a path on the backend host for `local`
        #[arg(long)]
        url: String,
        #[command(flatten)]
        options: VideoOptions,
        /// Wait until the task finishes
        #[arg(long)]
        wait: bool,
    },
    /// Generate a note from text or an article URL
    Text {
        /// Text content (`-` reads stdin)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        text: Option<String>,
        /// Article URL
        #[arg(long)]
        url: Option<String>,
        /// Note title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        options: CommonOptions,
        /// Wait until the task finishes
        #[arg(long)]
        wait: bool,
    },
}

/// Options shared by both generation modes.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonOptions {
    /// Model name (defaults to the first model in the profile)
    #[arg(long)]
    pub model: Option<String>,
    /// Provider of `--model` when it is not in the profile
    #[arg(long, requires = "model")]
    pub provider: Option<String>,
    /// Note style
    #[arg(long)]
    pub style: Option<String>,
    /// Summary level
    #[arg(long)]
    pub summary_level: Option<String>,
    /// Extra instructions for the model
    #[arg(long)]
    pub extras: Option<String>,
    /// Note formats to include
    #[arg(long = "format", value_enum)]
    pub formats: Vec<NoteFormatArg>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VideoOptions {
    #[command(flatten)]
    pub common: CommonOptions,
    /// Download quality
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,
    /// Insert screenshots
    #[arg(long, overrides_with = "no_screenshot")]
    pub screenshot: bool,
    /// Do not insert screenshots
    #[arg(long, overrides_with = "screenshot")]
    pub no_screenshot: bool,
    /// Insert timestamp links
    #[arg(long, overrides_with = "no_link")]
    pub link: bool,
    /// Do not insert timestamp links
    #[arg(long, overrides_with = "link")]
    pub no_link: bool,
    /// Let a vision model look at sampled frames
    #[arg(long, overrides_with = "no_video_understanding")]
    pub video_understanding: bool,
    /// Turn frame sampling off
    #[arg(long, overrides_with = "video_understanding")]
    pub no_video_understanding: bool,
    /// Seconds between sampled frames
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<String>,
    /// Frame grid as columns and rows
    #[arg(long, num_args = 2, value_names = ["COLUMNS", "ROWS"])]
    pub grid: Option<Vec<String>>,
}

impl VideoOptions {
    /// `Some(true)` for `--screenshot`, `Some(false)` for `--no-screenshot`.
    pub const fn screenshot_toggle(&self) -> Option<bool> {
        toggle(self.screenshot, self.no_screenshot)
    }

    pub const fn link_toggle(&self) -> Option<bool> {
        toggle(self.link, self.no_link)
    }

    pub const fn video_understanding_toggle(&self) -> Option<bool> {
        toggle(self.video_understanding, self.no_video_understanding)
    }
}

/// The last of a `--flag`/`--no-flag` pair wins; neither leaves the value alone.
const fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Subcommand)]
pub enum CookieCommands {
    /// Print the stored cookie
    Get {
        #[arg(value_enum)]
        platform: PlatformArg,
    },
    /// Store a cookie (reads stdin when omitted)
    Set {
        #[arg(value_enum)]
        platform: PlatformArg,
        cookie: Option<String>,
    },
    /// Print the one-click browser console import script
    Snippet,
    /// Follow the stored cookie and print changes
    Watch {
        #[arg(value_enum)]
        platform: PlatformArg,
    },
}

#[derive(Subcommand)]
pub enum OutputDirCommands {
    /// Print the output directory
    Get,
    /// Choose the directory with the backend's folder picker
    Pick,
    /// Set the directory explicitly
    Set { path: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Backend API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Directory for local export downloads
        #[arg(long, value_name = "PATH")]
        downloads_dir: Option<String>,
        /// Seconds between status polls
        #[arg(long, value_name = "SECONDS")]
        poll_interval: Option<u64>,
        /// Enable a model for generation
        #[arg(long, requires = "provider")]
        model: Option<String>,
        /// Provider of `--model`
        #[arg(long)]
        provider: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PlatformArg {
    Bilibili,
    Youtube,
    Douyin,
    Kuaishou,
    Local,
}

impl From<PlatformArg> for Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Bilibili => Self::Bilibili,
            PlatformArg::Youtube => Self::Youtube,
            PlatformArg::Douyin => Self::Douyin,
            PlatformArg::Kuaishou => Self::Kuaishou,
            PlatformArg::Local => Self::Local,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum QualityArg {
    Fast,
    Medium,
    Slow,
}

impl From<QualityArg> for Quality {
    fn from(value: QualityArg) -> Self {
        match value {
            QualityArg::Fast => Self::Fast,
            QualityArg::Medium => Self::Medium,
            QualityArg::Slow => Self::Slow,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NoteFormatArg {
    Toc,
    Link,
    Screenshot,
    Summary,
}

impl From<NoteFormatArg> for NoteFormat {
    fn from(value: NoteFormatArg) -> Self {
        match value {
            NoteFormatArg::Toc => Self::Toc,
            NoteFormatArg::Link => Self::Link,
            NoteFormatArg::Screenshot => Self::Screenshot,
            NoteFormatArg::Summary => Self::Summary,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportTarget {
    Md,
    Pdf,
    Docx,
    Html,
    Svg,
    Png,
    Xmind,
}

/// An export target is either a note document or a mind-map rendering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportKind {
    Note(NoteExportFormat),
    Mindmap(MindmapFormat),
}

impl ExportTarget {
    pub const fn kind(self) -> ExportKind {
        match self {
            Self::Md => ExportKind::Note(NoteExportFormat::Markdown),
            Self::Pdf => ExportKind::Note(NoteExportFormat::Pdf),
            Self::Docx => ExportKind::Note(NoteExportFormat::Docx),
            Self::Html => ExportKind::Mindmap(MindmapFormat::Html),
            Self::Svg => ExportKind::Mindmap(MindmapFormat::Svg),
            Self::Png => ExportKind::Mindmap(MindmapFormat::Png),
            Self::Xmind => ExportKind::Mindmap(MindmapFormat::Xmind),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MindmapTarget {
    Html,
    Svg,
    Png,
    Xmind,
}

impl From<MindmapTarget> for MindmapFormat {
    fn from(value: MindmapTarget) -> Self {
        match value {
            MindmapTarget::Html => Self::Html,
            MindmapTarget::Svg => Self::Svg,
            MindmapTarget::Png => Self::Png,
            MindmapTarget::Xmind => Self::Xmind,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

/// Text source chosen on the command line.
pub const fn text_source(url: Option<&str>) -> SourceType {
    if url.is_some() {
        SourceType::Url
    } else {
        SourceType::Text
    }
}
