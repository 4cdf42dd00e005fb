//! CLI configuration: thin wrapper around `aadhar_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --timeout, --store, --insecure) and client construction.

use aadhar_api::AadharClient;
use aadhar_config::StoreBackend;

use crate::cli::{GlobalOpts, StoreArg};
use crate::error::CliError;

pub use aadhar_config::{
    Config, config_path, load_config, load_config_or_default, save_config, session_path,
};

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::File => Self::File,
            StoreArg::Keyring => Self::Keyring,
            StoreArg::Memory => Self::Memory,
        }
    }
}

/// Config file + environment, then CLI flags on top.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;

    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if let Some(store) = global.store {
        cfg.store = store.into();
    }
    if global.insecure {
        cfg.insecure = true;
    }

    Ok(cfg)
}

/// Build the API client the resolved config describes.
pub fn build_client(cfg: &Config) -> Result<AadharClient, CliError> {
    let base_url = cfg.base_url()?;
    let store = aadhar_config::build_store(cfg);
    tracing::debug!(url = %base_url, store = %cfg.store, "building client");

    let client = AadharClient::new(base_url, store, &cfg.transport())?;
    Ok(client.with_query_retries(cfg.query_retries))
}
