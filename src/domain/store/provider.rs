//! Scoped swap store shared by everything running inside a provider

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use candid::Nat;
use tokio::sync::RwLock;
use tracing::debug;

use super::reducer::{reduce, SwapAction, SwapState};
use crate::shared::errors::StoreError;
use crate::shared::types::{Pool, SwapRecord, Token};

tokio::task_local! {
    static SWAP_STORE: SwapStoreHandle;
}

/// Handle to the store in scope. Clones share the same state.
#[derive(Clone)]
pub struct SwapStoreHandle {
    state: Arc<RwLock<SwapState>>,
}

impl SwapStoreHandle {
    fn new(initial: SwapState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn dispatch(&self, action: SwapAction) {
        debug!("dispatch {:?}", action);
        let mut state = self.state.write().await;
        *state = reduce(&state, action);
    }

    /// Current snapshot
    pub async fn state(&self) -> SwapState {
        self.state.read().await.clone()
    }

    pub async fn set_tokens(&self, tokens: Vec<Token>) {
        self.dispatch(SwapAction::SetTokens(tokens)).await;
    }

    pub async fn set_pools(&self, pools: Vec<Pool>) {
        self.dispatch(SwapAction::SetPools(pools)).await;
    }

    pub async fn set_user_balances(&self, balances: BTreeMap<String, Nat>) {
        self.dispatch(SwapAction::SetUserBalances(balances)).await;
    }

    pub async fn set_selected_token_in(&self, token: Option<Token>) {
        self.dispatch(SwapAction::SetSelectedTokenIn(token)).await;
    }

    pub async fn set_selected_token_out(&self, token: Option<Token>) {
        self.dispatch(SwapAction::SetSelectedTokenOut(token)).await;
    }

    pub async fn add_swap_to_history(&self, record: SwapRecord) {
        self.dispatch(SwapAction::AddSwapToHistory(record)).await;
    }

    pub async fn reset_state(&self) {
        self.dispatch(SwapAction::ResetState).await;
    }
}

/// Provider: runs a future with a fresh store in scope
pub struct SwapStore;

impl SwapStore {
    pub async fn provide<F: Future>(future: F) -> F::Output {
        Self::provide_with(SwapState::default(), future).await
    }

    pub async fn provide_with<F: Future>(initial: SwapState, future: F) -> F::Output {
        SWAP_STORE.scope(SwapStoreHandle::new(initial), future).await
    }
}

/// Store of the enclosing provider. Errors instead of handing out an empty store.
///
/// Tasks spawned inside a provider do not inherit it.
pub fn use_swap_store() -> Result<SwapStoreHandle, StoreError> {
    SWAP_STORE
        .try_with(|store| store.clone())
        .map_err(|_| StoreError::OutsideProvider)
}
