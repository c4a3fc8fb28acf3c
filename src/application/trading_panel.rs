//! Trading panel - interaction state for the swap form

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, RwLock};
use tracing::{info, warn};

use crate::application::swap_service::SwapService;
use crate::domain::quote::QuoteRefresher;
use crate::domain::store::use_swap_store;
use crate::shared::types::{SwapQuote, SwapRecord, Token};
use crate::shared::utils::parse_token_amount;
use crate::view::PanelView;

pub const SWAP_SUCCEEDED: &str = "Swap executed successfully!";
pub const SWAP_FAILED: &str = "Swap failed. Please try again.";
pub const SWAP_ERRORED: &str = "Swap failed with error.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub token_in: Option<Token>,
    pub token_out: Option<Token>,
    /// Raw text as typed
    pub amount_in: String,
    pub quote: Option<SwapQuote>,
    pub swapping: bool,
    pub swap_result: Option<String>,
}

impl PanelState {
    /// Inputs for a quote request, if all three are set
    fn quote_inputs(&self) -> Option<(Token, Token, String)> {
        match (&self.token_in, &self.token_out) {
            (Some(token_in), Some(token_out)) if !self.amount_in.is_empty() => {
                Some((token_in.clone(), token_out.clone(), self.amount_in.clone()))
            }
            _ => None,
        }
    }
}

pub struct TradingPanel {
    service: Arc<SwapService>,
    state: Arc<RwLock<PanelState>>,
    refresher: QuoteRefresher,
    quote_ready: Arc<Notify>,
}

impl TradingPanel {
    pub fn new(service: Arc<SwapService>, quote_debounce: Duration) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(PanelState::default())),
            refresher: QuoteRefresher::new(quote_debounce),
            quote_ready: Arc::new(Notify::new()),
        }
    }

    /// Notified each time a quote request settles
    pub fn quote_ready(&self) -> Arc<Notify> {
        self.quote_ready.clone()
    }

    pub async fn state(&self) -> PanelState {
        self.state.read().await.clone()
    }

    pub fn quote_pending(&self) -> bool {
        self.refresher.is_pending()
    }

    async fn find_token(&self, symbol: &str) -> Option<Token> {
        self.service
            .tokens()
            .await
            .into_iter()
            .find(|token| token.symbol == symbol)
    }

    /// Select the input token by symbol; an unknown symbol clears the selection
    pub async fn select_token_in(&mut self, symbol: &str) {
        let token = self.find_token(symbol).await;
        if let Ok(store) = use_swap_store() {
            store.set_selected_token_in(token.clone()).await;
        }
        {
            let mut state = self.state.write().await;
            state.token_in = token;
            state.quote = None;
        }
        self.inputs_changed().await;
    }

    /// Select the output token by symbol; an unknown symbol clears the selection
    pub async fn select_token_out(&mut self, symbol: &str) {
        let token = self.find_token(symbol).await;
        if let Ok(store) = use_swap_store() {
            store.set_selected_token_out(token.clone()).await;
        }
        {
            let mut state = self.state.write().await;
            state.token_out = token;
            state.quote = None;
        }
        self.inputs_changed().await;
    }

    pub async fn set_amount(&mut self, amount: &str) {
        {
            let mut state = self.state.write().await;
            state.amount_in = amount.to_string();
            state.quote = None;
        }
        self.inputs_changed().await;
    }

    /// Exchange input and output tokens. Amount and quote are cleared, not carried over.
    pub async fn swap_token_sides(&mut self) {
        let (token_in, token_out) = {
            let mut state = self.state.write().await;
            let state = &mut *state;
            std::mem::swap(&mut state.token_in, &mut state.token_out);
            state.amount_in.clear();
            state.quote = None;
            (state.token_in.clone(), state.token_out.clone())
        };
        if let Ok(store) = use_swap_store() {
            store.set_selected_token_in(token_in).await;
            store.set_selected_token_out(token_out).await;
        }
        self.inputs_changed().await;
    }

    pub async fn dismiss_result(&mut self) {
        self.state.write().await.swap_result = None;
    }

    /// Reschedule the debounced quote fetch after any input change
    async fn inputs_changed(&mut self) {
        let inputs = self.state.read().await.quote_inputs();
        match inputs {
            Some((token_in, token_out, amount)) => {
                let fetch = fetch_quote(
                    self.service.clone(),
                    self.state.clone(),
                    self.quote_ready.clone(),
                    token_in,
                    token_out,
                    amount,
                );
                self.refresher.schedule(fetch);
            }
            None => {
                self.refresher.cancel();
            }
        }
    }

    /// Request a quote right away, dropping any pending debounced one
    pub async fn get_quote(&mut self) {
        self.refresher.cancel();
        let inputs = self.state.read().await.quote_inputs();
        if let Some((token_in, token_out, amount)) = inputs {
            fetch_quote(
                self.service.clone(),
                self.state.clone(),
                self.quote_ready.clone(),
                token_in,
                token_out,
                amount,
            )
            .await;
        }
    }

    /// Submit the quoted swap. Ignored unless tokens, amount and quote are set and no swap is running.
    pub async fn execute_swap(&mut self) {
        let (token_in, token_out, amount, quote) = {
            let mut state = self.state.write().await;
            let ready = match (&state.token_in, &state.token_out, &state.quote) {
                (Some(token_in), Some(token_out), Some(quote))
                    if !state.amount_in.is_empty() && !state.swapping =>
                {
                    Some((token_in.clone(), token_out.clone(), state.amount_in.clone(), quote.clone()))
                }
                _ => None,
            };
            match ready {
                Some(ready) => {
                    state.swapping = true;
                    ready
                }
                None => return,
            }
        };

        let message = match parse_token_amount(&amount, token_in.decimals) {
            Ok(amount_in) => {
                let success = self
                    .service
                    .execute_swap(
                        token_in.canister_id,
                        token_out.canister_id,
                        amount_in.clone(),
                        quote.minimum_received.clone(),
                    )
                    .await;
                if success {
                    info!("Swapped {} {} for at least {} {}", amount, token_in.symbol, quote.minimum_received.0, token_out.symbol);
                    if let Ok(store) = use_swap_store() {
                        let record = SwapRecord::new(&token_in, &token_out, amount_in, quote.minimum_received.clone());
                        store.add_swap_to_history(record).await;
                    }
                    SWAP_SUCCEEDED
                } else {
                    SWAP_FAILED
                }
            }
            Err(e) => {
                warn!("Swap failed with error: {}", e);
                SWAP_ERRORED
            }
        };

        let succeeded = message == SWAP_SUCCEEDED;
        {
            let mut state = self.state.write().await;
            state.swap_result = Some(message.to_string());
            state.swapping = false;
            if succeeded {
                state.amount_in.clear();
                state.quote = None;
            }
        }
        if succeeded {
            self.inputs_changed().await;
        }
    }

    pub async fn render(&self) -> PanelView {
        let service = self.service.snapshot().await;
        let state = self.state.read().await;
        PanelView::build(&service, &state)
    }
}

/// Convert the amount, ask for a quote and store whatever comes back.
/// No generation check: a slower earlier reply can overwrite a newer one.
async fn fetch_quote(
    service: Arc<SwapService>,
    state: Arc<RwLock<PanelState>>,
    quote_ready: Arc<Notify>,
    token_in: Token,
    token_out: Token,
    amount: String,
) {
    match parse_token_amount(&amount, token_in.decimals) {
        Ok(amount_in) => {
            let quote = service
                .get_swap_quote(token_in.canister_id, token_out.canister_id, amount_in)
                .await;
            state.write().await.quote = quote;
        }
        Err(e) => warn!("Failed to get quote: {}", e),
    }
    quote_ready.notify_one();
}
