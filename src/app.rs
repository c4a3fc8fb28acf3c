// src/app.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::commands::{Cli, CommandExecutor, Commands};
use crate::application::swap_service::SwapService;
use crate::config::Config;
use crate::infrastructure::backend::IcAgentBackend;
use crate::shared::config::ConfigLoader;
use crate::shared::errors::AppError;
use crate::shared::utils::is_valid_principal;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub config: Config,
    pub json: bool,
}

impl AppCfg {
    /// Priority: CLI args > environment > config file > defaults
    pub fn resolve(cli: &Cli) -> Result<Self, AppError> {
        let config = ConfigLoader::load(cli.config.as_deref())?;
        Ok(Self::with_overrides(config, cli))
    }

    pub fn with_overrides(mut config: Config, cli: &Cli) -> Self {
        if let Some(network) = &cli.network {
            config.network.dfx_network = network.clone();
        }
        if let Some(canister_id) = &cli.canister_id {
            config.backend.canister_id = Some(canister_id.clone());
        }
        Self {
            config,
            json: cli.json,
        }
    }
}

pub async fn run(app_cfg: AppCfg, command: Commands) -> Result<()> {
    info!("Starting KongSwap trading client");
    info!("Configuration: {:?}", app_cfg);

    if let Some(canister_id) = &app_cfg.config.backend.canister_id {
        if !is_valid_principal(canister_id) {
            error!("❌ Invalid backend canister id: {}", canister_id);
            return Err(AppError::ConfigError(format!("invalid canister id: {}", canister_id)).into());
        }
    }

    let backend = IcAgentBackend::from_config(&app_cfg.config)
        .await
        .map_err(AppError::from)?;
    info!("✅ Connected to backend canister {}", backend.canister_id());

    let service = SwapService::connect(Arc::new(backend)).await;
    let executor = CommandExecutor::new(service, app_cfg.config.quote_debounce(), app_cfg.json);
    executor.execute(command).await?;

    Ok(())
}
