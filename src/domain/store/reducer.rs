//! Swap state and its pure transition function

use std::collections::BTreeMap;

use candid::Nat;

use crate::shared::types::{Pool, SwapRecord, Token};

/// Number of swaps kept in history, newest first
pub const MAX_SWAP_HISTORY: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapState {
    pub tokens: Vec<Token>,
    pub pools: Vec<Pool>,
    /// Balances in integer units keyed by token symbol
    pub user_balances: BTreeMap<String, Nat>,
    pub selected_token_in: Option<Token>,
    pub selected_token_out: Option<Token>,
    pub swap_history: Vec<SwapRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwapAction {
    SetTokens(Vec<Token>),
    SetPools(Vec<Pool>),
    SetUserBalances(BTreeMap<String, Nat>),
    SetSelectedTokenIn(Option<Token>),
    SetSelectedTokenOut(Option<Token>),
    AddSwapToHistory(SwapRecord),
    ResetState,
}

pub fn reduce(state: &SwapState, action: SwapAction) -> SwapState {
    match action {
        SwapAction::SetTokens(tokens) => SwapState {
            tokens,
            ..state.clone()
        },
        SwapAction::SetPools(pools) => SwapState {
            pools,
            ..state.clone()
        },
        SwapAction::SetUserBalances(user_balances) => SwapState {
            user_balances,
            ..state.clone()
        },
        SwapAction::SetSelectedTokenIn(selected_token_in) => SwapState {
            selected_token_in,
            ..state.clone()
        },
        SwapAction::SetSelectedTokenOut(selected_token_out) => SwapState {
            selected_token_out,
            ..state.clone()
        },
        SwapAction::AddSwapToHistory(record) => {
            let mut swap_history = Vec::with_capacity(MAX_SWAP_HISTORY);
            swap_history.push(record);
            swap_history.extend(
                state
                    .swap_history
                    .iter()
                    .take(MAX_SWAP_HISTORY - 1)
                    .cloned(),
            );
            SwapState {
                swap_history,
                ..state.clone()
            }
        }
        SwapAction::ResetState => SwapState::default(),
    }
}
