//! The `{code, msg, data}` wrapper every backend route answers with.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Success is signalled by `code == 0`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Returns the payload, or a `Backend` error for error envelopes.
    pub fn into_data(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::Backend {
                code: self.code,
                message: self.msg,
            })
        }
    }

    /// Like [`Self::into_data`] but treats a missing payload as an error.
    pub fn into_required_data(self, route: &str) -> Result<T> {
        self.into_data()?
            .ok_or_else(|| Error::InvalidInput(format!("Backend returned no data for {route}")))
    }
}

/// Parses a raw response body into an envelope.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiEnvelope<T>> {
    Ok(serde_json::from_str(body)?)
}
