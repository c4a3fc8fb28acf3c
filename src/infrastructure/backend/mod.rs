pub mod ic_agent_backend;

#[cfg(test)]
pub mod mock_backend;

pub use ic_agent_backend::IcAgentBackend;

use async_trait::async_trait;
use candid::{Nat, Principal};

use crate::shared::errors::BackendError;
use crate::shared::types::{RemoteResult, Token};

/// Launchpad backend canister surface used by the trading panel.
///
/// The outer `Result` carries transport and decoding failures, the inner one the
/// canister's own `Ok`/`Err` reply.
#[async_trait]
pub trait SwapBackend: Send + Sync {
    async fn get_available_tokens(&self) -> Result<RemoteResult<Vec<Token>>, BackendError>;

    async fn get_swap_quote(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError>;

    async fn swap_tokens(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
        min_amount_out: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError>;
}
