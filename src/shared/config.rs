use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::shared::errors::AppError;

pub const ENV_DFX_NETWORK: &str = "DFX_NETWORK";
pub const ENV_CANISTER_ID: &str = "CANISTER_ID_ICPLAUNCHPAD_BACKEND";
pub const ENV_QUOTE_DEBOUNCE_MS: &str = "KONGSWAP_QUOTE_DEBOUNCE_MS";

/// Resolves configuration: file, then environment. CLI overrides are applied by the caller.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `path` if given (defaults otherwise) and apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Config, AppError> {
        let config = match path {
            Some(path) => Config::from_file(path)
                .map_err(|e| AppError::ConfigError(format!("{:#}", e)))?,
            None => Config::default(),
        };
        Self::apply_env(config, |key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(mut config: Config, lookup: F) -> Result<Config, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup(ENV_DFX_NETWORK) {
            debug!("{} overrides network: {}", ENV_DFX_NETWORK, network);
            config.network.dfx_network = network;
        }
        if let Some(canister_id) = lookup(ENV_CANISTER_ID) {
            debug!("{} overrides canister id: {}", ENV_CANISTER_ID, canister_id);
            config.backend.canister_id = Some(canister_id);
        }
        if let Some(ms) = lookup(ENV_QUOTE_DEBOUNCE_MS) {
            config.trading.quote_debounce_ms = ms.parse().map_err(|e| {
                AppError::ConfigError(format!("{} must be milliseconds: {}", ENV_QUOTE_DEBOUNCE_MS, e))
            })?;
        }
        Ok(config)
    }
}
