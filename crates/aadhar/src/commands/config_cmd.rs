//! Config subcommand handlers.

use dialoguer::{Input, Select};

use aadhar_config::StoreBackend;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn detail(cfg: &Config) -> String {
    let mut lines = vec![
        format!("api_url       = \"{}\"", cfg.api_url),
        format!("timeout       = {}", cfg.timeout),
        format!("page_size     = {}", cfg.page_size),
        format!("query_retries = {}", cfg.query_retries),
        format!("store         = \"{}\"", cfg.store),
        format!("profile       = \"{}\"", cfg.profile),
        format!("insecure      = {}", cfg.insecure),
    ];
    if let Some(ref ca) = cfg.ca_cert {
        lines.push(format!("ca_cert       = \"{}\"", ca.display()));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let out = output::render_single(&global.output, &cfg, detail, |c| c.api_url.clone());
            output::print_output(&out, global.quiet);
            if matches!(cfg.store, StoreBackend::File) && !global.quiet {
                eprintln!("session file: {}", config::session_path().display());
            }
            Ok(())
        }

        ConfigCommand::Init => {
            // Re-running init edits the current settings instead of resetting them.
            let defaults = config::load_config_or_default();
            eprintln!("Aadhar CLI configuration");
            eprintln!("   Config path: {}\n", config::config_path().display());

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(defaults.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let backends = [StoreBackend::File, StoreBackend::Keyring, StoreBackend::Memory];
            let labels = [
                "Session file in the data directory (default)",
                "System keyring",
                "Memory only (log in for every command)",
            ];
            let selection = Select::new()
                .with_prompt("Where should session tokens be kept?")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let page_size: u32 = Input::new()
                .with_prompt("Rows per page")
                .default(defaults.page_size)
                .interact_text()
                .map_err(prompt_err)?;

            let cfg = Config {
                api_url,
                page_size,
                store: backends.get(selection).copied().unwrap_or_default(),
                ..defaults
            };
            cfg.base_url()?;

            let path = config::save_config(&cfg)?;
            output::status(global, &format!("Config written to {}", path.display()));
            Ok(())
        }
    }
}
