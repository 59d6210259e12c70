//! Toolbar state above a rendered note.

use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};

use crate::error::Result;
use crate::export::NoteExportFormat;

/// How long the "copied" indicator stays on after a copy.
pub const COPIED_PULSE: Duration = Duration::from_secs(2);

/// Body view: rendered markdown or mind map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Preview,
    Map,
}

impl ViewMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Preview => Self::Map,
            Self::Map => Self::Preview,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteHeader {
    copied_at: Option<Instant>,
    export_menu_open: bool,
    view_mode: ViewMode,
    show_transcript: bool,
}

impl NoteHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands `markdown` to the clipboard writer and starts the copied pulse.
    pub fn copy(
        &mut self,
        now: Instant,
        markdown: &str,
        write_clipboard: impl FnOnce(&str) -> Result<()>,
    ) -> Result<()> {
        write_clipboard(markdown)?;
        self.copied_at = Some(now);
        Ok(())
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|copied_at| now.saturating_duration_since(copied_at) < COPIED_PULSE)
    }

    pub const fn is_export_menu_open(&self) -> bool {
        self.export_menu_open
    }

    pub fn toggle_export_menu(&mut self) {
        self.export_menu_open = !self.export_menu_open;
    }

    /// A click anywhere outside the menu closes it.
    pub fn click_outside(&mut self) {
        self.export_menu_open = false;
    }

    /// Closes the menu, then runs the export handler for `format`.
    pub fn select_export<T>(
        &mut self,
        format: NoteExportFormat,
        handler: impl FnOnce(NoteExportFormat) -> T,
    ) -> T {
        self.export_menu_open = false;
        handler(format)
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    pub const fn show_transcript(&self) -> bool {
        self.show_transcript
    }

    pub fn toggle_transcript(&mut self) -> bool {
        self.show_transcript = !self.show_transcript;
        self.show_transcript
    }

    pub fn style_label(style: &str) -> &str {
        crate::models::style_label(style)
    }
}

/// Formats a creation timestamp (Unix ms) as `YYYY-MM-DD HH:MM` in `tz`.
/// Unset or out-of-range timestamps format as an empty string.
pub fn format_created_at<Tz: TimeZone>(created_at_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if created_at_ms <= 0 {
        return String::new();
    }
    DateTime::from_timestamp_millis(created_at_ms).map_or_else(String::new, |utc| {
        utc.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
    })
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    #[test]
    fn copy_pulse_lasts_two_seconds() {
        let mut header = NoteHeader::new();
        let start = Instant::now();
        let mut copied = String::new();
        header
            .copy(start, "# Note", |text| {
                copied.push_str(text);
                Ok(())
            })
            .unwrap();

        assert_eq!(copied, "# Note");
        assert!(header.is_copied(start + Duration::from_millis(1999)));
        assert!(!header.is_copied(start + Duration::from_secs(2)));
    }

    #[test]
    fn failed_copy_does_not_pulse() {
        let mut header = NoteHeader::new();
        let now = Instant::now();
        let result = header.copy(now, "x", |_| Err(Error::NotReady("clipboard".to_string())));
        assert!(result.is_err());
        assert!(!header.is_copied(now));
    }

    #[test]
    fn selecting_an_export_closes_the_menu_first() {
        let mut header = NoteHeader::new();
        header.toggle_export_menu();
        assert!(header.is_export_menu_open());

        let picked = header.select_export(NoteExportFormat::Pdf, |format| format);
        assert_eq!(picked, NoteExportFormat::Pdf);
        assert!(!header.is_export_menu_open());

        header.toggle_export_menu();
        header.click_outside();
        assert!(!header.is_export_menu_open());
    }

    #[test]
    fn view_and_transcript_toggles() {
        let mut header = NoteHeader::new();
        assert_eq!(header.toggle_view_mode(), ViewMode::Map);
        assert_eq!(header.toggle_view_mode(), ViewMode::Preview);
        assert!(header.toggle_transcript());
        assert!(!header.toggle_transcript());
        assert_eq!(NoteHeader::style_label("minimal"), "Minimal");
    }

    #[test]
    fn created_at_formats_minutes_in_the_given_zone() {
        // 2024-03-05T14:07:30Z
        let ms = 1_709_647_650_000;
        assert_eq!(format_created_at(ms, &Utc), "2024-03-05 14:07");
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_created_at(ms, &shanghai), "2024-03-05 22:07");
        assert_eq!(format_created_at(0, &Utc), "");
        assert_eq!(format_created_at(i64::MAX, &Utc), "");
    }
}
