//! Local output directory form.

use crate::api::NoteBackend;
use crate::error::{Error, Result};

/// Result of the folder picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// A folder was chosen and saved to the backend
    Saved(String),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct OutputDirForm {
    output_dir: String,
}

impl OutputDirForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    /// Loads the stored directory; failures keep the previous value.
    pub async fn load<B: NoteBackend>(&mut self, backend: &B) {
        match backend.get_output_dir().await {
            Ok(response) => self.output_dir = response.output_dir,
            Err(error) => tracing::warn!("Loading output directory failed: {error}"),
        }
    }

    /// Opens the backend's folder picker and saves the choice right away.
    pub async fn pick<B: NoteBackend>(&mut self, backend: &B) -> Result<PickOutcome> {
        let picked = backend.pick_folder().await?;
        let path = picked.path.trim();
        if path.is_empty() {
            return Ok(PickOutcome::Cancelled);
        }
        backend.update_output_dir(path).await?;
        self.output_dir = path.to_string();
        tracing::info!("Output directory set to {path}");
        Ok(PickOutcome::Saved(self.output_dir.clone()))
    }

    /// Saves a directory typed by hand.
    pub async fn set<B: NoteBackend>(&mut self, backend: &B, path: &str) -> Result<()> {
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::InvalidInput(
                "Output directory cannot be empty".to_string(),
            ));
        }
        backend.update_output_dir(path).await?;
        self.output_dir = path.to_string();
        tracing::info!("Output directory set to {path}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::FakeBackend;

    #[tokio::test(flavor = "current_thread")]
    async fn load_is_silent_on_failure() {
        let backend = FakeBackend::new();
        *backend.output_dir.lock().unwrap() = Some("/srv/notes".to_string());
        let mut form = OutputDirForm::new();
        form.load(&backend).await;
        assert_eq!(form.output_dir(), "/srv/notes");

        *backend.fail_reads.lock().unwrap() = true;
        form.load(&backend).await;
        assert_eq!(form.output_dir(), "/srv/notes");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn picked_folder_is_saved_immediately() {
        let backend = FakeBackend::new();
        *backend.picked_folder.lock().unwrap() = Some("/home/me/notes".to_string());
        let mut form = OutputDirForm::new();

        let outcome = form.pick(&backend).await.unwrap();

        assert_eq!(outcome, PickOutcome::Saved("/home/me/notes".to_string()));
        assert_eq!(
            backend.calls(),
            vec![
                "GET /pick_folder".to_string(),
                "POST /update_output_dir".to_string()
            ]
        );
        assert_eq!(form.output_dir(), "/home/me/notes");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cancelled_picker_sends_no_update() {
        let backend = FakeBackend::new();
        let mut form = OutputDirForm::new();
        assert_eq!(form.pick(&backend).await.unwrap(), PickOutcome::Cancelled);
        assert_eq!(backend.calls(), vec!["GET /pick_folder".to_string()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn manual_set_rejects_blank_paths() {
        let backend = FakeBackend::new();
        let mut form = OutputDirForm::new();
        assert!(form.set(&backend, "   ").await.is_err());
        form.set(&backend, " /data/out ").await.unwrap();
        assert_eq!(
            backend.output_dir_updates.lock().unwrap().clone(),
            vec!["/data/out".to_string()]
        );
    }
}
