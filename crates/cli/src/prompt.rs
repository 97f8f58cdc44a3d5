//! Interactive prompts for session inputs and the exit-mode choice.

use anyhow::Context;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use dot1x::{SessionConfig, TeardownMode};

use crate::cli::Cli;

/// Resolves the session inputs, prompting for whatever the flags omitted.
/// The password prompt is masked; whitespace around names is trimmed.
pub fn resolve_session_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let theme = ColorfulTheme::default();

    let interface = match &cli.interface {
        Some(value) => value.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Network interface (e.g. eth0)")
            .interact_text()
            .context("could not read interface name")?,
    };
    let username = match &cli.username {
        Some(value) => value.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("802.1X username")
            .interact_text()
            .context("could not read username")?,
    };
    let password = match &cli.password {
        Some(value) => value.clone(),
        None => Password::with_theme(&theme)
            .with_prompt("802.1X password")
            .interact()
            .context("could not read password")?,
    };

    Ok(SessionConfig {
        interface: interface.trim().to_string(),
        username: username.trim().to_string(),
        password,
    })
}

/// Post-session choice, offered on the success path only; every other path
/// resets unconditionally.
pub fn choose_exit_mode() -> anyhow::Result<TeardownMode> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Exit and")
        .items(&[
            "reset the interface to its pre-authentication state",
            "leave the interface authenticated",
        ])
        .default(0)
        .interact()
        .context("could not read exit choice")?;

    Ok(match selection {
        1 => TeardownMode::Leave,
        _ => TeardownMode::Reset,
    })
}
