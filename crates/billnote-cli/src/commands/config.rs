use billnote_core::config::{normalize_api_base_url, ClientConfig, ConfigLayer};

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            downloads_dir,
            poll_interval,
            model,
            provider,
            no_activate,
        } => run_config_init(
            global_profile,
            ProfileValues {
                api_base_url,
                downloads_dir,
                poll_interval,
                model,
                provider,
            },
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

/// Values passed to `config init`.
#[derive(Debug, Default)]
pub struct ProfileValues {
    pub api_base_url: Option<String>,
    pub downloads_dir: Option<String>,
    pub poll_interval: Option<u64>,
    pub model: Option<String>,
    pub provider: Option<String>,
}

pub fn run_config_init(
    profile_name: Option<&str>,
    values: ProfileValues,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged = merge_profile(existing, values, &ConfigLayer::from_env())?;
    *config.profile_mut_or_default(&profile_name) = merged;
    if !no_activate || config.active_profile.is_none() {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Profile '{}' initialized at {}", profile_name, path.display());
    Ok(())
}

/// Explicit values win over environment values, which win over the profile.
pub fn merge_profile(
    existing: CliProfile,
    values: ProfileValues,
    env: &ConfigLayer,
) -> Result<CliProfile, CliError> {
    let api_base_url = normalize_text_option(values.api_base_url)
        .or_else(|| env.api_base_url.clone())
        .or(existing.api_base_url)
        .map(|url| normalize_api_base_url(&url))
        .transpose()
        .map_err(CliError::Config)?;
    let downloads_dir = normalize_text_option(values.downloads_dir)
        .or_else(|| env.downloads_dir.clone())
        .or(existing.downloads_dir);
    let poll_interval_secs = values
        .poll_interval
        .or(env.poll_interval_secs)
        .or(existing.poll_interval_secs)
        .filter(|secs| *secs > 0);

    let mut profile = CliProfile {
        api_base_url,
        downloads_dir,
        poll_interval_secs,
        models: existing.models,
    };
    if let (Some(model), Some(provider)) = (values.model, values.provider) {
        profile.upsert_model(&model, &provider);
    }
    Ok(profile)
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let resolved = ClientConfig::from_layer(ConfigLayer::from_env().or(profile.to_layer()))
        .map_err(CliError::Config)?;

    println!("profile:        {profile_name}");
    println!("api_base_url:   {}", resolved.api_base_url);
    println!("downloads_dir:  {}", resolved.downloads_dir.display());
    println!("poll_interval:  {}s", resolved.poll_interval.as_secs());
    if profile.models.is_empty() {
        println!("models:         (none)");
    } else {
        for (index, model) in profile.models.iter().enumerate() {
            let label = if index == 0 { "models:" } else { "" };
            println!("{label:<15} {} ({})", model.model_name, model.provider_id);
        }
    }
    Ok(())
}
