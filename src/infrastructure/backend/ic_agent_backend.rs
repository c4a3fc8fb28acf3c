use async_trait::async_trait;
use candid::{Decode, Encode, Nat, Principal};
use ic_agent::Agent;
use num_traits::ToPrimitive;
use tracing::{debug, info};

use super::SwapBackend;
use crate::config::Config;
use crate::shared::errors::BackendError;
use crate::shared::types::{RemoteResult, Token};

/// Backend canister client over `ic-agent`. Built once and shared by the caller.
pub struct IcAgentBackend {
    agent: Agent,
    canister_id: Principal,
}

impl IcAgentBackend {
    pub async fn connect(host: &str, canister_id: Principal, fetch_root_key: bool) -> Result<Self, BackendError> {
        info!("Connecting to backend canister {} via {}", canister_id, host);

        let agent = Agent::builder().with_url(host).build()?;
        if fetch_root_key {
            // local replicas are not signed by the mainnet root key
            agent.fetch_root_key().await?;
        }

        Ok(Self { agent, canister_id })
    }

    pub async fn from_config(config: &Config) -> Result<Self, BackendError> {
        let canister_id = config
            .canister_principal()
            .map_err(|e| BackendError::InvalidCanisterId(e.to_string()))?;
        Self::connect(config.host(), canister_id, config.is_local()).await
    }

    pub fn canister_id(&self) -> Principal {
        self.canister_id
    }

    async fn query(&self, method: &str, arg: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        debug!("query {}.{}", self.canister_id, method);
        let bytes = self
            .agent
            .query(&self.canister_id, method)
            .with_arg(arg)
            .call()
            .await?;
        Ok(bytes)
    }

    async fn update(&self, method: &str, arg: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        debug!("update {}.{}", self.canister_id, method);
        let bytes = self
            .agent
            .update(&self.canister_id, method)
            .with_arg(arg)
            .call_and_wait()
            .await?;
        Ok(bytes)
    }
}

/// The backend takes and returns amounts as nat64
fn to_nat64(amount: &Nat) -> Result<u64, BackendError> {
    amount
        .0
        .to_u64()
        .ok_or_else(|| BackendError::AmountOutOfRange(amount.0.to_string()))
}

#[async_trait]
impl SwapBackend for IcAgentBackend {
    async fn get_available_tokens(&self) -> Result<RemoteResult<Vec<Token>>, BackendError> {
        let bytes = self.query("get_available_tokens", Encode!()?).await?;
        let reply = Decode!(&bytes, RemoteResult<Vec<Token>>)?;
        Ok(reply)
    }

    async fn get_swap_quote(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError> {
        let amount_in = to_nat64(amount_in)?;
        let arg = Encode!(&token_in, &token_out, &amount_in)?;
        let bytes = self.query("get_swap_quote", arg).await?;
        let reply = Decode!(&bytes, RemoteResult<u64>)?;
        Ok(reply.map(Nat::from))
    }

    async fn swap_tokens(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
        min_amount_out: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError> {
        let amount_in = to_nat64(amount_in)?;
        let min_amount_out = to_nat64(min_amount_out)?;
        let arg = Encode!(&token_in, &token_out, &amount_in, &min_amount_out)?;
        let bytes = self.update("swap_tokens", arg).await?;
        let reply = Decode!(&bytes, RemoteResult<u64>)?;
        Ok(reply.map(Nat::from))
    }
}
