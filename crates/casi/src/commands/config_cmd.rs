//! Configuration command handlers.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use casi_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::SetPassword { profile } => set_password(profile),
        ConfigCommand::Path => {
            println!("{}", casi_config::config_path().display());
            Ok(())
        }
    }
}

fn require_terminal(what: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: what.into(),
            reason: "needs an interactive terminal".into(),
        })
    }
}

/// Interactively create or update the active profile.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    require_terminal("config init")?;

    let mut cfg = casi_config::load_config_or_default();
    let name = crate::config::active_profile_name(global, &cfg);
    let theme = ColorfulTheme::default();

    let base_url: String = Input::with_theme(&theme)
        .with_prompt("booking service base URL")
        .default(DEFAULT_BASE_URL.to_owned())
        .interact_text()?;

    let username: String = Input::with_theme(&theme)
        .with_prompt("username")
        .interact_text()?;

    let password = rpassword::prompt_password("password: ")?;

    let api_key: String = Input::with_theme(&theme)
        .with_prompt("x-api-key (empty for the built-in default)")
        .allow_empty(true)
        .interact_text()?;

    let profile = cfg.profiles.entry(name.clone()).or_default();
    profile.base_url = Some(base_url);
    profile.username = Some(username);
    profile.api_key = (!api_key.is_empty()).then_some(api_key);

    // Password goes to the keyring when one is available; plaintext in the
    // profile is the fallback.
    if casi_config::store_password(&name, &password).is_err() {
        let keep_plaintext = Confirm::with_theme(&theme)
            .with_prompt("no system keyring available -- store the password in the config file?")
            .default(false)
            .interact()?;
        profile.password = keep_plaintext.then_some(password);
    } else {
        profile.password = None;
    }

    cfg.default_profile = Some(name.clone());
    casi_config::save_config(&cfg)?;

    println!(
        "profile '{name}' written to {}",
        casi_config::config_path().display()
    );
    Ok(())
}

/// Print the resolved configuration with secrets redacted.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = casi_config::load_config_or_default();
    let name = crate::config::active_profile_name(global, &cfg);

    let mut redacted = cfg;
    for profile in redacted.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
        if profile.api_key.is_some() {
            profile.api_key = Some("<redacted>".into());
        }
    }

    println!("# active profile: {name}");
    print!("{}", toml::to_string_pretty(&redacted).map_err(casi_config::ConfigError::from)?);
    Ok(())
}

/// Store a password in the system keyring.
fn set_password(profile: &str) -> Result<(), CliError> {
    require_terminal("config set-password")?;

    let password = rpassword::prompt_password("password: ")?;
    casi_config::store_password(profile, &password)?;
    println!("password stored in the keyring for profile '{profile}'");
    Ok(())
}
