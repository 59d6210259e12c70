pub mod chat;
pub mod common;
pub mod completions;
pub mod config;
pub mod cookie;
pub mod delete;
pub mod export;
pub mod generate;
pub mod output_dir;
pub mod show;
pub mod status;

pub use chat::run_chat;
pub use common::{AppContext, GlobalOptions};
pub use completions::run_completions;
pub use config::run_config;
pub use cookie::run_cookie;
pub use delete::run_delete;
pub use export::{run_export, run_mindmap};
pub use generate::{run_generate_text, run_generate_video, run_retry};
pub use output_dir::run_output_dir;
pub use show::run_show;
pub use status::{run_status, run_tasks};
