//! Profile resolution with CLI flag overrides on top of `casi-config`.

use std::time::Duration;

use casi_config::{Config, Defaults};
use casi_core::ServiceConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The active profile name: flag → config default → "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Per-invocation settings derived from config file + CLI flags.
pub struct Resolved {
    pub service: ServiceConfig,
    pub profile_name: String,
    pub output: OutputFormat,
    pub color: ColorMode,
}

/// Build the effective configuration: profile (when one exists) merged
/// with environment credentials, then CLI flag overrides on top.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = casi_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut service = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            casi_config::profile_to_service_config(profile, &profile_name, &cfg.defaults)?
        }
        None => {
            let mut service = ServiceConfig::default();
            service.credentials = casi_config::env_credentials();
            service.timeout = Duration::from_secs(cfg.defaults.timeout);
            service.cache_dir = casi_config::default_cache_dir();
            service
        }
    };

    // CLI flag overrides
    if let Some(ref raw) = global.base_url {
        service.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        service.timeout = Duration::from_secs(secs);
    }
    if let Some(ref dir) = global.cache_dir {
        service.cache_dir = dir.clone();
    }

    let output = global
        .output
        .clone()
        .unwrap_or_else(|| output_from_defaults(&cfg.defaults));
    let color = global
        .color
        .clone()
        .unwrap_or_else(|| color_from_defaults(&cfg.defaults));

    Ok(Resolved {
        service,
        profile_name,
        output,
        color,
    })
}

fn output_from_defaults(defaults: &Defaults) -> OutputFormat {
    match defaults.output.as_str() {
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "yaml" => OutputFormat::Yaml,
        "plain" => OutputFormat::Plain,
        _ => OutputFormat::Table,
    }
}

fn color_from_defaults(defaults: &Defaults) -> ColorMode {
    match defaults.color.as_str() {
        "always" => ColorMode::Always,
        "never" => ColorMode::Never,
        _ => ColorMode::Auto,
    }
}
