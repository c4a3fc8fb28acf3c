//! Store domain - reducer-based state shared across components

mod provider;
mod reducer;

pub use provider::{use_swap_store, SwapStore, SwapStoreHandle};
pub use reducer::{reduce, SwapAction, SwapState, MAX_SWAP_HISTORY};
