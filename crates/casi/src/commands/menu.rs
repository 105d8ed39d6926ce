//! Interactive menu shell.
//!
//! Runs when the tool is invoked without a subcommand: prompts for
//! credentials when none are configured, then loops over
//! stats / all data / refreshed data until exit. Errors from the core are
//! displayed and the loop continues -- nothing below the controller
//! boundary catches them.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use casi_core::{Controller, Credentials, FileStore};

use crate::cli::RangeArgs;
use crate::error::CliError;

use super::{RenderCtx, data, stats};

const MENU_ITEMS: &[&str] = &[
    "show stats (last 12 months)",
    "show all data",
    "show refreshed data",
    "exit program",
];

pub async fn run(
    controller: &Controller<FileStore>,
    profile_name: &str,
    ctx: &RenderCtx,
) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "menu".into(),
            reason: "the interactive menu needs a terminal; use a subcommand (data, refresh, stats)"
                .into(),
        });
    }

    if !controller.has_credentials() {
        let login = prompt_login()?;
        if login.remember {
            remember_login(&login, profile_name)?;
        }
        controller.login(login.into_credentials());
    }

    let theme = ColorfulTheme::default();
    let everything = RangeArgs::default();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("Select an option to retrieve or transform cruise data")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => stats::handle(controller, &everything, ctx).await,
            1 => data::handle(controller, &everything, false, ctx).await,
            2 => data::handle(controller, &everything, true, ctx).await,
            _ => return Ok(()),
        };

        // Show the failure and keep the loop alive.
        if let Err(err) = outcome {
            eprintln!("{:?}", miette::Report::new(err));
        }

        let exit = Confirm::with_theme(&theme)
            .with_prompt("exit?")
            .default(false)
            .interact()?;
        if exit {
            return Ok(());
        }
    }
}

// ── Credential prompting ─────────────────────────────────────────────

struct PromptedLogin {
    username: String,
    password: String,
    api_key: Option<String>,
    remember: bool,
}

impl PromptedLogin {
    fn into_credentials(self) -> Credentials {
        let credentials = Credentials::new(self.username, self.password);
        match self.api_key {
            Some(key) => credentials.with_api_key(key),
            None => credentials,
        }
    }
}

fn prompt_login() -> Result<PromptedLogin, CliError> {
    let theme = ColorfulTheme::default();

    let username: String = Input::with_theme(&theme)
        .with_prompt("enter username")
        .interact_text()?;

    let password = rpassword::prompt_password("enter password: ")?;

    let api_key: String = Input::with_theme(&theme)
        .with_prompt("enter x_api_key (optional)")
        .allow_empty(true)
        .interact_text()?;

    let remember = Confirm::with_theme(&theme)
        .with_prompt("remember login?")
        .default(false)
        .interact()?;

    Ok(PromptedLogin {
        username,
        password,
        api_key: (!api_key.is_empty()).then_some(api_key),
        remember,
    })
}

/// Persist the prompted login: username and API key into the profile, the
/// password into the keyring when available, plaintext otherwise.
fn remember_login(login: &PromptedLogin, profile_name: &str) -> Result<(), CliError> {
    let mut cfg = casi_config::load_config_or_default();
    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();

    profile.username = Some(login.username.clone());
    profile.api_key = login.api_key.clone();
    if casi_config::store_password(profile_name, &login.password).is_err() {
        profile.password = Some(login.password.clone());
    }

    cfg.default_profile = Some(profile_name.to_owned());
    casi_config::save_config(&cfg)?;
    Ok(())
}
