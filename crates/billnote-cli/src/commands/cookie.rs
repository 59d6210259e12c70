use billnote_core::forms::{console_snippet, downloader_providers, CookieForm, RefreshOutcome};
use billnote_core::models::Platform;
use tokio::time::{interval, MissedTickBehavior};

use super::common::{resolve_text_argument, AppContext};
use crate::cli::{CookieCommands, PlatformArg};
use crate::error::CliError;

pub async fn run_cookie(ctx: &AppContext, command: CookieCommands) -> Result<(), CliError> {
    match command {
        CookieCommands::Get { platform } => {
            let mut form = CookieForm::new(downloader_platform(platform)?);
            form.load(&ctx.backend).await;
            if form.cookie().is_empty() {
                println!("(no cookie stored for {})", form.platform());
            } else {
                println!("{}", form.cookie());
            }
            Ok(())
        }
        CookieCommands::Set { platform, cookie } => {
            let mut form = CookieForm::new(downloader_platform(platform)?);
            form.edit(resolve_text_argument(cookie.as_deref())?);
            form.save(&ctx.backend).await?;
            println!("Saved {} cookie", form.platform().label());
            Ok(())
        }
        CookieCommands::Snippet => {
            print_snippet_help(&ctx.config.api_base_url);
            Ok(())
        }
        CookieCommands::Watch { platform } => {
            watch_cookie(ctx, downloader_platform(platform)?).await
        }
    }
}

fn downloader_platform(platform: PlatformArg) -> Result<Platform, CliError> {
    let platform = Platform::from(platform);
    if downloader_providers().contains(&platform) {
        Ok(platform)
    } else {
        Err(CliError::Validation(format!(
            "{} does not use a downloader cookie",
            platform.label()
        )))
    }
}

fn print_snippet_help(api_base_url: &str) {
    eprintln!("Log in to the video site, open the browser console and paste:");
    for platform in downloader_providers() {
        if let Some(url) = platform.home_url() {
            eprintln!("  {:<10} {url}", platform.label());
        }
    }
    eprintln!();
    println!("{}", console_snippet(api_base_url));
}

/// Re-reads the stored cookie on every poll tick until interrupted.
async fn watch_cookie(ctx: &AppContext, platform: Platform) -> Result<(), CliError> {
    let mut form = CookieForm::new(platform);
    form.load(&ctx.backend).await;
    if !form.cookie().is_empty() {
        println!("{}", form.cookie());
    }
    eprintln!("Watching {} cookie, press Ctrl-C to stop", platform.label());

    let mut ticker = interval(ctx.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {
                if form.refresh(&ctx.backend).await == RefreshOutcome::Updated {
                    println!("{}", form.cookie());
                }
            }
        }
    }
}
