//! KongSwap trading client for the ICP launchpad backend
//! Layered as shared / domain / infrastructure / application

pub mod app;
pub mod config;
pub mod view;

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::{SwapService, TradingPanel};
pub use domain::quote::QuoteRefresher;
pub use domain::store::{use_swap_store, SwapStore};
pub use infrastructure::{IcAgentBackend, SwapBackend};
