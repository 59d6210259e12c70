//! Backend REST client.
//!
//! [`NoteBackend`] is the seam every controller talks through;
//! [`HttpNoteBackend`] is the reqwest implementation.

mod client;
mod envelope;

pub use client::{HttpNoteBackend, NoteBackend};
pub use envelope::ApiEnvelope;

#[cfg(test)]
pub(crate) mod fake;
