//! Remote-data service backing the trading panel

use std::sync::Arc;

use candid::{Nat, Principal};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::infrastructure::backend::SwapBackend;
use crate::shared::types::{SwapQuote, Token};
use crate::shared::utils::live_minimum_received;

/// Price impact reported with every live quote. Not derived from pool reserves.
pub const PLACEHOLDER_PRICE_IMPACT: f64 = 0.5;

const FETCH_TOKENS_FAILED: &str = "Failed to fetch tokens";

/// Token catalog plus the loading / error flags of the most recent operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSnapshot {
    pub tokens: Vec<Token>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Proxies the backend canister. `loading` is a single flag shared by the token fetch
/// and swap execution, so overlapping operations clear each other's flag.
pub struct SwapService {
    backend: Arc<dyn SwapBackend>,
    state: RwLock<ServiceSnapshot>,
}

impl SwapService {
    pub fn new(backend: Arc<dyn SwapBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(ServiceSnapshot::default()),
        }
    }

    /// Create the service and fetch the token catalog once
    pub async fn connect(backend: Arc<dyn SwapBackend>) -> Arc<Self> {
        let service = Arc::new(Self::new(backend));
        service.fetch_tokens().await;
        service
    }

    pub async fn fetch_tokens(&self) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.backend.get_available_tokens().await;

        let mut state = self.state.write().await;
        match result {
            Ok(Ok(tokens)) => {
                info!("Fetched {} tokens", tokens.len());
                state.tokens = tokens;
            }
            Ok(Err(message)) => {
                warn!("Backend rejected token fetch: {}", message);
                state.error = Some(message);
            }
            Err(e) => {
                error!("Failed to fetch tokens: {}", e);
                let message = e.to_string();
                state.error = Some(if message.is_empty() {
                    FETCH_TOKENS_FAILED.to_string()
                } else {
                    message
                });
            }
        }
        state.loading = false;
    }

    /// Quote for `amount_in` integer units, `None` on any failure
    pub async fn get_swap_quote(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: Nat,
    ) -> Option<SwapQuote> {
        match self.backend.get_swap_quote(token_in, token_out, &amount_in).await {
            Ok(Ok(amount_out)) => Some(SwapQuote {
                minimum_received: live_minimum_received(&amount_out),
                price_impact: PLACEHOLDER_PRICE_IMPACT,
                amount_out,
            }),
            Ok(Err(message)) => {
                warn!("Failed to get swap quote: {}", message);
                None
            }
            Err(e) => {
                error!("Failed to get swap quote: {}", e);
                None
            }
        }
    }

    /// Submit the swap; `false` on any failure
    pub async fn execute_swap(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: Nat,
        amount_out_min: Nat,
    ) -> bool {
        self.set_loading(true).await;

        let result = self
            .backend
            .swap_tokens(token_in, token_out, &amount_in, &amount_out_min)
            .await;
        let success = match result {
            Ok(Ok(received)) => {
                info!("Swap executed, received {}", received);
                true
            }
            Ok(Err(message)) => {
                error!("Swap failed: {}", message);
                false
            }
            Err(e) => {
                error!("Swap failed: {}", e);
                false
            }
        };

        self.set_loading(false).await;
        success
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.loading = loading;
    }

    pub async fn snapshot(&self) -> ServiceSnapshot {
        self.state.read().await.clone()
    }

    pub async fn tokens(&self) -> Vec<Token> {
        self.state.read().await.tokens.clone()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backend::mock_backend::{icp, kong, MockBackend};
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_fetches_tokens_once() {
        let backend = Arc::new(MockBackend::new());
        let service = SwapService::connect(backend.clone()).await;

        assert_eq!(backend.token_fetches(), 1);
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.tokens.len(), 3);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_tokens_backend_error() {
        let backend = Arc::new(
            MockBackend::new().with_tokens(Some(Err("KongSwap service not initialized".to_string()))),
        );
        let service = SwapService::connect(backend).await;

        assert_eq!(
            service.error().await.as_deref(),
            Some("KongSwap service not initialized")
        );
        assert!(service.tokens().await.is_empty());
        assert!(!service.loading().await);
    }

    #[tokio::test]
    async fn test_fetch_tokens_transport_error() {
        let backend = Arc::new(MockBackend::new().with_tokens(None));
        let service = SwapService::connect(backend).await;

        let message = service.error().await.unwrap();
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_refetch_clears_previous_error() {
        let backend = Arc::new(MockBackend::new().with_tokens(None));
        let service = SwapService::connect(backend.clone()).await;
        assert!(service.error().await.is_some());

        backend.set_tokens(Some(Ok(vec![icp(), kong()])));
        service.fetch_tokens().await;
        assert!(service.error().await.is_none());
        assert_eq!(service.tokens().await, vec![icp(), kong()]);
        assert_eq!(backend.token_fetches(), 2);
    }

    #[tokio::test]
    async fn test_get_swap_quote_applies_live_slippage() {
        let backend = Arc::new(MockBackend::new());
        let service = SwapService::new(backend.clone());

        let quote = service
            .get_swap_quote(icp().canister_id, kong().canister_id, Nat::from(150_000_000u64))
            .await
            .unwrap();

        assert_eq!(quote.amount_out, Nat::from(1_000_000_000u64));
        assert_eq!(quote.minimum_received, Nat::from(950_000_000u64));
        assert_eq!(quote.price_impact, PLACEHOLDER_PRICE_IMPACT);

        let calls = backend.quote_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token_in, icp().canister_id);
        assert_eq!(calls[0].amount_in, Nat::from(150_000_000u64));
    }

    #[tokio::test]
    async fn test_get_swap_quote_failures_return_none() {
        let service = SwapService::new(Arc::new(
            MockBackend::new().with_quote(Some(Err("Pool not found".to_string()))),
        ));
        assert!(service
            .get_swap_quote(icp().canister_id, kong().canister_id, Nat::from(1u64))
            .await
            .is_none());

        let service = SwapService::new(Arc::new(MockBackend::new().with_quote(None)));
        assert!(service
            .get_swap_quote(icp().canister_id, kong().canister_id, Nat::from(1u64))
            .await
            .is_none());
        assert!(service.error().await.is_none());
    }

    #[tokio::test]
    async fn test_execute_swap() {
        let backend = Arc::new(MockBackend::new());
        let service = SwapService::new(backend.clone());

        let ok = service
            .execute_swap(
                icp().canister_id,
                kong().canister_id,
                Nat::from(150_000_000u64),
                Nat::from(950_000_000u64),
            )
            .await;
        assert!(ok);
        assert!(!service.loading().await);
        assert_eq!(backend.swap_calls()[0].min_amount_out, Nat::from(950_000_000u64));
    }

    #[tokio::test]
    async fn test_execute_swap_failures_return_false() {
        for reply in [Some(Err("Slippage exceeded".to_string())), None] {
            let service = SwapService::new(Arc::new(MockBackend::new().with_swap(reply)));
            let ok = service
                .execute_swap(icp().canister_id, kong().canister_id, Nat::from(1u64), Nat::from(0u64))
                .await;
            assert!(!ok);
            assert!(!service.loading().await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_set_during_swap() {
        let backend = Arc::new(MockBackend::new().with_latency(Duration::from_secs(1)));
        let service = Arc::new(SwapService::new(backend));

        let swapping = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .execute_swap(icp().canister_id, kong().canister_id, Nat::from(1u64), Nat::from(0u64))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(service.loading().await);

        assert!(swapping.await.unwrap());
        assert!(!service.loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_operations_share_loading_flag() {
        let backend = Arc::new(MockBackend::new().with_latency(Duration::from_secs(1)));
        let service = Arc::new(SwapService::new(backend));

        // token fetch finishes first and clears the flag while the swap is still running
        let fetch = {
            let service = service.clone();
            tokio::spawn(async move { service.fetch_tokens().await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        let swap = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .execute_swap(icp().canister_id, kong().canister_id, Nat::from(1u64), Nat::from(0u64))
                    .await
            })
        };

        fetch.await.unwrap();
        assert!(!service.loading().await);

        assert!(swap.await.unwrap());
        assert!(!service.loading().await);
    }
}
