//! Process-wide observable stores.
//!
//! Components read through accessors and mutate only through the store's
//! own operations. Every mutation bumps a version published on a
//! `tokio::sync::watch` channel so observers can re-read.

mod model_store;
mod task_store;

pub use model_store::ModelStore;
pub use task_store::TaskStore;
