//! BillNote CLI - turn videos, articles and text into structured notes
//!
//! Talks to a running BillNote backend; task history is kept locally.

mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, GenerateCommands};
use crate::commands::{
    run_chat, run_completions, run_config, run_cookie, run_delete, run_export, run_generate_text,
    run_generate_video, run_mindmap, run_output_dir, run_retry, run_show, run_status, run_tasks,
    AppContext, GlobalOptions,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(CliError::Silent) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "billnote=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = GlobalOptions {
        profile: cli.profile,
        api_base_url: cli.api_base_url,
        history_path: cli.history_path,
    };

    dispatch(cli.command, &global).await
}

/// Runs one command. Only backend-facing commands load the app context.
async fn dispatch(command: Commands, global: &GlobalOptions) -> Result<(), CliError> {
    let context = || AppContext::load(global);
    match command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => run_config(command, global.profile.as_deref()),
        Commands::Generate { command } => match command {
            GenerateCommands::Video {
                platform,
                url,
                options,
                wait,
            } => run_generate_video(&context()?, platform, &url, &options, wait).await,
            GenerateCommands::Text {
                text,
                url,
                title,
                options,
                wait,
            } => {
                let ctx = context()?;
                run_generate_text(&ctx, text.as_deref(), url.as_deref(), title, &options, wait)
                    .await
            },
        },
        Commands::Retry {
            task_id,
            options,
            wait,
        } => run_retry(&context()?, &task_id, &options, wait).await,
        Commands::Status {
            task_id,
            wait,
            json,
        } => run_status(&context()?, &task_id, wait, json).await,
        Commands::Tasks { json } => run_tasks(&context()?, json),
        Commands::Delete {
            video_id,
            platform,
            task_id,
        } => run_delete(&context()?, &video_id, platform, task_id.as_deref()).await,
        Commands::Chat {
            task_id,
            message,
            model,
        } => run_chat(&context()?, &task_id, &message, model.as_deref()).await,
        Commands::Show {
            task_id,
            map,
            transcript,
        } => run_show(&context()?, &task_id, map, transcript).await,
        Commands::Export {
            task_id,
            format,
            title,
        } => run_export(&context()?, &task_id, format, title).await,
        Commands::Mindmap {
            path,
            format,
            title,
        } => run_mindmap(&context()?, &path, format.into(), title).await,
        Commands::Cookie { command } => run_cookie(&context()?, command).await,
        Commands::OutputDir { command } => run_output_dir(&context()?, command).await,
    }
}
