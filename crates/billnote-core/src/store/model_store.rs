//! Model store: the enabled models a note can be generated with.

use std::sync::{PoisonError, RwLock};

use tokio::sync::watch;

use crate::models::ModelEntry;

#[derive(Debug, Default)]
struct ModelState {
    models: Vec<ModelEntry>,
    show_feature_hint: bool,
}

#[derive(Debug)]
pub struct ModelStore {
    state: RwLock<ModelState>,
    version: watch::Sender<u64>,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ModelStore {
    #[must_use]
    pub fn new(models: Vec<ModelEntry>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: RwLock::new(ModelState {
                models,
                show_feature_hint: false,
            }),
            version,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Replaces the enabled model list.
    pub fn set_models(&self, models: Vec<ModelEntry>) {
        self.write(|state| state.models = models);
    }

    pub fn enabled_models(&self) -> Vec<ModelEntry> {
        self.read(|state| state.models.clone())
    }

    /// Default selection for a fresh form.
    pub fn first_model(&self) -> Option<ModelEntry> {
        self.read(|state| state.models.first().cloned())
    }

    /// Provider owning `model_name`, if that model is enabled.
    pub fn provider_for(&self, model_name: &str) -> Option<String> {
        self.read(|state| {
            state
                .models
                .iter()
                .find(|model| model.model_name == model_name)
                .map(|model| model.provider_id.clone())
        })
    }

    pub fn show_feature_hint(&self) -> bool {
        self.read(|state| state.show_feature_hint)
    }

    pub fn set_show_feature_hint(&self, show: bool) {
        self.write(|state| state.show_feature_hint = show);
    }

    fn read<T>(&self, f: impl FnOnce(&ModelState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut ModelState)) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
        }
        self.version.send_modify(|version| *version += 1);
    }
}
