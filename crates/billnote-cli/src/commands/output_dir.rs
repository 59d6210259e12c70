use billnote_core::forms::{OutputDirForm, PickOutcome};

use super::common::AppContext;
use crate::cli::OutputDirCommands;
use crate::error::CliError;

pub async fn run_output_dir(ctx: &AppContext, command: OutputDirCommands) -> Result<(), CliError> {
    let mut form = OutputDirForm::new();
    match command {
        OutputDirCommands::Get => {
            form.load(&ctx.backend).await;
            if form.output_dir().is_empty() {
                println!("(not set)");
            } else {
                println!("{}", form.output_dir());
            }
        }
        OutputDirCommands::Pick => match form.pick(&ctx.backend).await? {
            PickOutcome::Saved(path) => println!("{path}"),
            PickOutcome::Cancelled => eprintln!("No folder selected"),
        },
        OutputDirCommands::Set { path } => {
            form.set(&ctx.backend, &path).await?;
            println!("{}", form.output_dir());
        }
    }
    Ok(())
}
