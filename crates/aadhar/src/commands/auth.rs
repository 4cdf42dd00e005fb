//! Session command handlers: login, register, logout, status.

use std::io::BufRead;

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use aadhar_api::{AadharClient, LoginInput, RegisterInput};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::{Config, session_path};
use crate::error::CliError;
use crate::output;

// ── Prompts ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use `given` or ask for it. Empty answers are allowed so that input
/// validation reports them alongside every other field.
fn value_or_prompt(given: Option<String>, prompt: &str) -> Result<String, CliError> {
    match given {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err),
    }
}

fn read_password_stdin() -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n'])))
}

fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(prompt_err)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    client: &AadharClient,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let user = value_or_prompt(args.user, "Username")?;
    let password = if args.password_stdin {
        read_password_stdin()?
    } else {
        prompt_password("Password: ")?
    };

    client.login(&LoginInput::new(user.clone(), password)).await?;
    output::status(global, &format!("Logged in as {user}"));
    Ok(())
}

pub async fn register(
    client: &AadharClient,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let user_name = value_or_prompt(args.user, "Username")?;
    let email = value_or_prompt(args.email, "Email")?;
    let aadhar = value_or_prompt(args.aadhar, "Aadhar number (12 digits)")?;

    let (password, confirm_password) = if args.password_stdin {
        let password = read_password_stdin()?;
        (password.clone(), password)
    } else {
        (
            prompt_password("Password: ")?,
            prompt_password("Confirm password: ")?,
        )
    };

    let input = RegisterInput {
        user_name,
        email,
        password,
        confirm_password,
        aadhar,
    };
    client.register(&input).await?;
    output::status(
        global,
        &format!("Registered {}. Run: aadhar login", input.user_name),
    );
    Ok(())
}

pub fn logout(client: &AadharClient, global: &GlobalOpts) -> Result<(), CliError> {
    client.logout()?;
    output::status(global, "Logout Successful!");
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusView {
    api_url: String,
    store: String,
    session_file: Option<String>,
    logged_in: bool,
}

fn detail(s: &StatusView) -> String {
    let mut lines = vec![
        format!("API:      {}", s.api_url),
        format!("Store:    {}", s.store),
    ];
    if let Some(ref path) = s.session_file {
        lines.push(format!("File:     {path}"));
    }
    lines.push(format!(
        "Session:  {}",
        if s.logged_in { "active" } else { "none" }
    ));
    lines.join("\n")
}

pub fn status(client: &AadharClient, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let view = StatusView {
        api_url: client.session().base_url().to_string(),
        store: cfg.store.to_string(),
        session_file: matches!(cfg.store, aadhar_config::StoreBackend::File)
            .then(|| session_path().display().to_string()),
        logged_in: client.is_logged_in()?,
    };

    let out = output::render_single(&global.output, &view, detail, |s| {
        s.logged_in.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
