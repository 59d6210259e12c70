//! Per-platform downloader cookie form.

use crate::api::NoteBackend;
use crate::error::{Error, Result};
use crate::models::{CookieRecord, Platform};

/// Shortest cookie string accepted by `save`.
pub const MIN_COOKIE_LENGTH: usize = 10;

/// What a background refresh did to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The field now holds the stored cookie
    Updated,
    /// Stored value was empty or identical to the field
    Unchanged,
    /// The field was edited or saved while the request was in flight
    Stale,
    /// The request failed; the field was left alone
    Failed,
}

/// Snapshot taken when a refresh request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

/// Editable cookie for one platform.
#[derive(Debug, Clone)]
pub struct CookieForm {
    platform: Platform,
    cookie: String,
    generation: u64,
}

impl CookieForm {
    pub const fn new(platform: Platform) -> Self {
        Self {
            platform,
            cookie: String::new(),
            generation: 0,
        }
    }

    pub const fn platform(&self) -> Platform {
        self.platform
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// User edit; invalidates any refresh already in flight.
    pub fn edit(&mut self, cookie: impl Into<String>) {
        self.cookie = cookie.into();
        self.generation += 1;
    }

    /// Initial load. Errors are swallowed and the field keeps its value.
    pub async fn load<B: NoteBackend>(&mut self, backend: &B) {
        match backend.get_downloader_cookie(self.platform.as_str()).await {
            Ok(response) => {
                if let Some(cookie) = response.cookie {
                    self.cookie = cookie;
                }
            }
            Err(error) => {
                tracing::warn!("Loading {} cookie failed: {error}", self.platform);
            }
        }
    }

    /// Starts a refresh; pair with [`Self::apply_refresh`].
    pub const fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Merges a fetched cookie into the field.
    ///
    /// The field is overwritten only when the fetched value is non-empty and
    /// differs from what the field holds, and only when no edit or save has
    /// happened since `ticket` was issued.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: Result<Option<String>>,
    ) -> RefreshOutcome {
        if ticket.generation != self.generation {
            return RefreshOutcome::Stale;
        }
        match fetched {
            Ok(Some(cookie)) if !cookie.is_empty() && cookie != self.cookie => {
                self.cookie = cookie;
                RefreshOutcome::Updated
            }
            Ok(_) => RefreshOutcome::Unchanged,
            Err(error) => {
                tracing::warn!("Refreshing {} cookie failed: {error}", self.platform);
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetches the stored cookie and merges it, e.g. when focus returns.
    pub async fn refresh<B: NoteBackend>(&mut self, backend: &B) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let fetched = backend
            .get_downloader_cookie(self.platform.as_str())
            .await
            .map(|response| response.cookie);
        self.apply_refresh(ticket, fetched)
    }

    /// Persists the field after a minimum-length check.
    pub async fn save<B: NoteBackend>(&mut self, backend: &B) -> Result<()> {
        let cookie = self.cookie.trim();
        if cookie.chars().count() < MIN_COOKIE_LENGTH {
            return Err(Error::InvalidInput("Please enter a valid cookie".to_string()));
        }
        let record = CookieRecord {
            platform: self.platform.as_str().to_string(),
            cookie: cookie.to_string(),
        };
        self.generation += 1;
        backend.update_downloader_cookie(&record).await?;
        tracing::info!("Saved {} cookie", self.platform);
        Ok(())
    }
}
