//! CLI commands and handlers
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::application::swap_service::SwapService;
use crate::application::trading_panel::{TradingPanel, SWAP_SUCCEEDED};
use crate::domain::store::{use_swap_store, SwapStore, SwapStoreHandle};
use crate::shared::errors::AppError;
use crate::view::PanelView;

#[derive(Parser, Debug)]
#[command(name = "kongswap-trading")]
#[command(version, about = "Trade tokens on KongSwap through the ICP launchpad backend")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Target network: "local" for a dfx replica, anything else for mainnet
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// Backend canister id (overrides config and environment)
    #[arg(long, global = true)]
    pub canister_id: Option<String>,

    /// Print views as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List tokens available for trading
    Tokens,

    /// Get a quote for a swap
    Quote {
        /// Symbol of the token to pay
        #[arg(long)]
        from: String,

        /// Symbol of the token to receive
        #[arg(long)]
        to: String,

        /// Amount to pay, in display units
        #[arg(long)]
        amount: String,
    },

    /// Quote and execute a swap
    Swap {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: String,
    },

    /// Interactive trading panel on stdin
    Trade,
}

/// One line of input to the interactive panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    From(String),
    To(String),
    Amount(String),
    Flip,
    Swap,
    Dismiss,
    Refresh,
    Show,
    History,
    Help,
    Quit,
}

const PANEL_HELP: &str = "commands: from SYM | to SYM | amount X | flip | swap | dismiss | refresh | show | history | quit";

impl PanelCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "from" | "in" if !rest.is_empty() => PanelCommand::From(rest.to_string()),
            "to" | "out" if !rest.is_empty() => PanelCommand::To(rest.to_string()),
            "amount" => PanelCommand::Amount(rest.to_string()),
            "flip" => PanelCommand::Flip,
            "swap" => PanelCommand::Swap,
            "dismiss" => PanelCommand::Dismiss,
            "refresh" => PanelCommand::Refresh,
            "show" | "" => PanelCommand::Show,
            "history" => PanelCommand::History,
            "help" | "?" => PanelCommand::Help,
            "quit" | "exit" | "q" => PanelCommand::Quit,
            "from" | "in" | "to" | "out" => return Err(format!("{} needs a token symbol", word)),
            _ => return Err(format!("unknown command: {}", word)),
        };
        Ok(command)
    }
}

pub struct CommandExecutor {
    service: Arc<SwapService>,
    quote_debounce: Duration,
    json: bool,
}

impl CommandExecutor {
    pub fn new(service: Arc<SwapService>, quote_debounce: Duration, json: bool) -> Self {
        Self {
            service,
            quote_debounce,
            json,
        }
    }

    /// Execute the selected command
    pub async fn execute(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Tokens => self.execute_tokens_command().await,
            Commands::Quote { from, to, amount } => {
                self.execute_quote_command(&from, &to, &amount).await
            }
            Commands::Swap { from, to, amount } => {
                self.execute_swap_command(&from, &to, &amount).await
            }
            Commands::Trade => self.execute_trade_command().await,
        }
    }

    async fn execute_tokens_command(&self) -> Result<(), AppError> {
        let snapshot = self.service.snapshot().await;
        if let Some(message) = snapshot.error {
            return Err(AppError::BackendError(message));
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.tokens)?);
        } else {
            for token in &snapshot.tokens {
                println!("{:<8} {:<28} decimals={} canister={}", token.symbol, token.name, token.decimals, token.canister_id);
            }
        }
        info!("📋 {} tokens available", snapshot.tokens.len());
        Ok(())
    }

    /// Panel with both sides and the amount filled in, quote requested right away
    async fn quoted_panel(&self, from: &str, to: &str, amount: &str) -> Result<TradingPanel, AppError> {
        if let Some(message) = self.service.error().await {
            return Err(AppError::BackendError(message));
        }

        let mut panel = TradingPanel::new(self.service.clone(), self.quote_debounce);
        panel.select_token_in(from).await;
        panel.select_token_out(to).await;
        panel.set_amount(amount).await;

        let state = panel.state().await;
        if state.token_in.is_none() {
            return Err(AppError::UnknownToken(from.to_string()));
        }
        if state.token_out.is_none() {
            return Err(AppError::UnknownToken(to.to_string()));
        }

        panel.get_quote().await;
        Ok(panel)
    }

    async fn execute_quote_command(&self, from: &str, to: &str, amount: &str) -> Result<(), AppError> {
        info!("🔍 Requesting quote: {} {} -> {}", amount, from, to);
        let panel = self.quoted_panel(from, to, amount).await?;
        if panel.state().await.quote.is_none() {
            warn!("No quote available for {} -> {}", from, to);
        }
        self.emit(&panel.render().await)
    }

    async fn execute_swap_command(&self, from: &str, to: &str, amount: &str) -> Result<(), AppError> {
        let mut panel = self.quoted_panel(from, to, amount).await?;
        if panel.state().await.quote.is_none() {
            return Err(AppError::SwapFailed(format!("no quote available for {} -> {}", from, to)));
        }

        info!("🚀 Executing swap: {} {} -> {}", amount, from, to);
        panel.execute_swap().await;
        self.emit(&panel.render().await)?;

        match panel.state().await.swap_result {
            Some(message) if message == SWAP_SUCCEEDED => Ok(()),
            Some(message) => Err(AppError::SwapFailed(message)),
            None => Err(AppError::SwapFailed("swap was not submitted".to_string())),
        }
    }

    async fn execute_trade_command(&self) -> Result<(), AppError> {
        SwapStore::provide(async {
            let store = use_swap_store()?;
            store.set_tokens(self.service.tokens().await).await;

            let mut panel = TradingPanel::new(self.service.clone(), self.quote_debounce);
            let quote_ready = panel.quote_ready();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            eprintln!("{}", PANEL_HELP);
            self.emit(&panel.render().await)?;

            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        let Some(line) = line? else { break };
                        match PanelCommand::parse(&line) {
                            Ok(command) => {
                                if !self.apply(&mut panel, &store, command).await? {
                                    break;
                                }
                            }
                            Err(message) => eprintln!("{}", message),
                        }
                    }
                    _ = quote_ready.notified() => {
                        self.emit(&panel.render().await)?;
                    }
                }
            }

            info!("👋 Leaving trading panel");
            Ok::<(), AppError>(())
        })
        .await
    }

    /// Apply one panel command. Returns `false` when the session should end.
    async fn apply(
        &self,
        panel: &mut TradingPanel,
        store: &SwapStoreHandle,
        command: PanelCommand,
    ) -> Result<bool, AppError> {
        match command {
            PanelCommand::From(symbol) => panel.select_token_in(&symbol).await,
            PanelCommand::To(symbol) => panel.select_token_out(&symbol).await,
            PanelCommand::Amount(text) => panel.set_amount(&text).await,
            PanelCommand::Flip => panel.swap_token_sides().await,
            PanelCommand::Swap => panel.execute_swap().await,
            PanelCommand::Dismiss => panel.dismiss_result().await,
            PanelCommand::Refresh => {
                self.service.fetch_tokens().await;
                store.set_tokens(self.service.tokens().await).await;
            }
            PanelCommand::Show => {}
            PanelCommand::History => {
                let history = store.state().await.swap_history;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&history)?);
                } else if history.is_empty() {
                    println!("No swaps yet");
                } else {
                    for record in &history {
                        println!(
                            "{} {} {} -> {} (min {})",
                            record.executed_at.format("%Y-%m-%d %H:%M:%S"),
                            record.amount_in.0,
                            record.token_in,
                            record.token_out,
                            record.minimum_received.0
                        );
                    }
                }
                return Ok(true);
            }
            PanelCommand::Help => {
                eprintln!("{}", PANEL_HELP);
                return Ok(true);
            }
            PanelCommand::Quit => return Ok(false),
        }

        self.emit(&panel.render().await)?;
        Ok(true)
    }

    fn emit(&self, view: &PanelView) -> Result<(), AppError> {
        if self.json {
            println!("{}", view.to_json()?);
        } else {
            println!("{}", view);
        }
        Ok(())
    }
}
