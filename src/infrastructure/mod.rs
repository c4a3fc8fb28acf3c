//! Infrastructure layer - external canister access

pub mod backend;

pub use backend::{IcAgentBackend, SwapBackend};
