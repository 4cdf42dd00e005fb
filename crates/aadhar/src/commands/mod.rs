//! Command dispatch: bridges CLI args -> client operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod data;
pub mod profile;
pub mod swagger;

use aadhar_api::AadharClient;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a client-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &AadharClient,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(client, args, global).await,
        Command::Register(args) => auth::register(client, args, global).await,
        Command::Logout => auth::logout(client, global),
        Command::Status => auth::status(client, cfg, global),
        Command::Data(args) => {
            require_session(client)?;
            data::handle(client, &args, cfg, global).await
        }
        Command::Profile => {
            require_session(client)?;
            profile::handle(client, global).await
        }
        Command::Swagger => swagger::handle(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Protected views need both tokens before anything is sent.
fn require_session(client: &AadharClient) -> Result<(), CliError> {
    if client.is_logged_in()? {
        Ok(())
    } else {
        Err(CliError::Unauthorized)
    }
}
