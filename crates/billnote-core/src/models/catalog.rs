//! Static catalogues: supported platforms, note styles and note formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A source-video provider, or the `local` sentinel for on-disk files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bilibili,
    Youtube,
    Douyin,
    Kuaishou,
    Local,
}

impl Platform {
    pub const ALL: [Self; 5] = [
        Self::Bilibili,
        Self::Youtube,
        Self::Douyin,
        Self::Kuaishou,
        Self::Local,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bilibili => "bilibili",
            Self::Youtube => "youtube",
            Self::Douyin => "douyin",
            Self::Kuaishou => "kuaishou",
            Self::Local => "local",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bilibili => "Bilibili",
            Self::Youtube => "YouTube",
            Self::Douyin => "Douyin",
            Self::Kuaishou => "Kuaishou",
            Self::Local => "Local file",
        }
    }

    /// Site to log in to before capturing a cookie. `None` for `local`.
    #[must_use]
    pub const fn home_url(self) -> Option<&'static str> {
        match self {
            Self::Bilibili => Some("https://www.bilibili.com"),
            Self::Youtube => Some("https://www.youtube.com"),
            Self::Douyin => Some("https://www.douyin.com"),
            Self::Kuaishou => Some("https://www.kuaishou.com"),
            Self::Local => None,
        }
    }

    /// Platforms that have a downloader cookie (everything but `local`).
    pub fn downloader_platforms() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|platform| *platform != Self::Local)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == needle)
            .ok_or_else(|| format!("Unsupported platform: {s}"))
    }
}

/// Infers the platform from a hostname the way the one-click cookie snippet does.
///
/// Substring match, checked in order; anything else is `"unknown"`.
pub fn infer_platform(hostname: &str) -> &'static str {
    Platform::downloader_platforms()
        .find(|platform| hostname.contains(platform.as_str()))
        .map_or("unknown", Platform::as_str)
}

/// Note styles offered by the generation form, as `(value, label)`.
pub const NOTE_STYLES: &[(&str, &str)] = &[
    ("minimal", "Minimal"),
    ("detailed", "Detailed"),
    ("academic", "Academic"),
    ("tutorial", "Tutorial"),
    ("xiaohongshu", "Social post"),
    ("life_journal", "Life journal"),
    ("task_oriented", "Task oriented"),
    ("business", "Business"),
    ("meeting_minutes", "Meeting minutes"),
];

/// Display label for a style value, falling back to the raw value.
pub fn style_label(value: &str) -> &str {
    NOTE_STYLES
        .iter()
        .find(|(style, _)| *style == value)
        .map_or(value, |(_, label)| *label)
}

/// Optional extras that can be requested alongside a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteFormat {
    Toc,
    Link,
    Screenshot,
    Summary,
}

impl NoteFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toc => "toc",
            Self::Link => "link",
            Self::Screenshot => "screenshot",
            Self::Summary => "summary",
        }
    }
}

impl FromStr for NoteFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NOTE_FORMATS
            .iter()
            .map(|(format, _)| *format)
            .find(|format| format.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown note format: {s}"))
    }
}

pub const NOTE_FORMATS: &[(NoteFormat, &str)] = &[
    (NoteFormat::Toc, "Table of contents"),
    (NoteFormat::Link, "Jump links"),
    (NoteFormat::Screenshot, "Screenshots"),
    (NoteFormat::Summary, "AI summary"),
];

/// Formats that make sense for text/URL notes.
pub const TEXT_MODE_FORMATS: &[NoteFormat] = &[NoteFormat::Toc, NoteFormat::Summary];

pub fn note_format_label(format: NoteFormat) -> &'static str {
    NOTE_FORMATS
        .iter()
        .find(|(candidate, _)| *candidate == format)
        .map_or("", |(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_platform_matches_hostname_substrings() {
        assert_eq!(infer_platform("www.bilibili.com"), "bilibili");
        assert_eq!(infer_platform("m.youtube.com"), "youtube");
        assert_eq!(infer_platform("www.douyin.com"), "douyin");
        assert_eq!(infer_platform("v.kuaishou.com"), "kuaishou");
        assert_eq!(infer_platform("example.org"), "unknown");
    }

    #[test]
    fn downloader_platforms_exclude_local() {
        let platforms: Vec<_> = Platform::downloader_platforms().collect();
        assert_eq!(platforms.len(), 4);
        assert!(!platforms.contains(&Platform::Local));
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::Youtube);
        assert!("vimeo".parse::<Platform>().is_err());
    }

    #[test]
    fn style_label_falls_back_to_value() {
        assert_eq!(style_label("minimal"), "Minimal");
        assert_eq!(style_label("custom"), "custom");
    }
}
