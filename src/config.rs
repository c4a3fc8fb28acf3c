use anyhow::{Context, Result};
use candid::Principal;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::shared::errors::AppError;

pub const LOCAL_HOST: &str = "http://localhost:4943";
pub const IC_HOST: &str = "https://ic0.app";
pub const DEFAULT_QUOTE_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkCfg {
    /// "local" targets a dfx replica, anything else mainnet
    pub dfx_network: String,
    pub local_host: String,
    pub ic_host: String,
}

impl Default for NetworkCfg {
    fn default() -> Self {
        Self {
            dfx_network: "ic".to_string(),
            local_host: LOCAL_HOST.to_string(),
            ic_host: IC_HOST.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendCfg {
    pub canister_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingCfg {
    pub quote_debounce_ms: u64,
}

impl Default for TradingCfg {
    fn default() -> Self {
        Self {
            quote_debounce_ms: DEFAULT_QUOTE_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkCfg,
    pub backend: BackendCfg,
    pub trading: TradingCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }

    pub fn is_local(&self) -> bool {
        self.network.dfx_network == "local"
    }

    pub fn host(&self) -> &str {
        if self.is_local() {
            &self.network.local_host
        } else {
            &self.network.ic_host
        }
    }

    pub fn quote_debounce(&self) -> Duration {
        Duration::from_millis(self.trading.quote_debounce_ms)
    }

    pub fn canister_principal(&self) -> Result<Principal, AppError> {
        let text = self.backend.canister_id.as_deref().ok_or_else(|| {
            AppError::ConfigError(
                "backend canister id is not set (CANISTER_ID_ICPLAUNCHPAD_BACKEND or --canister-id)"
                    .to_string(),
            )
        })?;
        Principal::from_text(text)
            .map_err(|e| AppError::ConfigError(format!("invalid canister id {}: {}", text, e)))
    }
}
