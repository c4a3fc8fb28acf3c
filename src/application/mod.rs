//! Application layer - backend hook, trading panel and CLI

pub mod commands;
pub mod swap_service;
pub mod trading_panel;

pub use commands::{Cli, CommandExecutor, Commands};
pub use swap_service::{ServiceSnapshot, SwapService};
pub use trading_panel::{PanelState, TradingPanel};
