//! In-memory backend used by tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use candid::{Nat, Principal};

use super::SwapBackend;
use crate::shared::errors::BackendError;
use crate::shared::types::{RemoteResult, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCall {
    pub token_in: Principal,
    pub token_out: Principal,
    pub amount_in: Nat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapCall {
    pub token_in: Principal,
    pub token_out: Principal,
    pub amount_in: Nat,
    pub min_amount_out: Nat,
}

pub fn icp() -> Token {
    Token::new(
        "ICP",
        "Internet Computer",
        Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap(),
        8,
    )
}

pub fn kong() -> Token {
    Token::new(
        "KONG",
        "KongSwap",
        Principal::from_slice(&[0, 0, 0, 0, 2, 0, 0, 0x3c, 1, 1]),
        8,
    )
}

pub fn ckusdt() -> Token {
    Token::new(
        "ckUSDT",
        "ckUSDT",
        Principal::from_slice(&[0, 0, 0, 0, 2, 48, 0, 0x6e, 1, 1]),
        6,
    )
}

pub struct MockBackend {
    tokens: Mutex<Option<RemoteResult<Vec<Token>>>>,
    quote: Mutex<Option<RemoteResult<Nat>>>,
    swap: Mutex<Option<RemoteResult<Nat>>>,
    latency: Duration,
    quote_latencies: Mutex<VecDeque<Duration>>,
    quote_calls: Mutex<Vec<QuoteCall>>,
    swap_calls: Mutex<Vec<SwapCall>>,
    token_fetches: Mutex<usize>,
}

impl MockBackend {
    /// Backend listing ICP, KONG and ckUSDT, quoting 10 output tokens, accepting swaps
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Some(Ok(vec![icp(), kong(), ckusdt()]))),
            quote: Mutex::new(Some(Ok(Nat::from(1_000_000_000u64)))),
            swap: Mutex::new(Some(Ok(Nat::from(990_000_000u64)))),
            latency: Duration::ZERO,
            quote_latencies: Mutex::new(VecDeque::new()),
            quote_calls: Mutex::new(Vec::new()),
            swap_calls: Mutex::new(Vec::new()),
            token_fetches: Mutex::new(0),
        }
    }

    /// `None` replies fail at the transport level
    pub fn with_tokens(self, reply: Option<RemoteResult<Vec<Token>>>) -> Self {
        *self.tokens.lock().unwrap() = reply;
        self
    }

    pub fn with_quote(self, reply: Option<RemoteResult<Nat>>) -> Self {
        *self.quote.lock().unwrap() = reply;
        self
    }

    pub fn with_swap(self, reply: Option<RemoteResult<Nat>>) -> Self {
        *self.swap.lock().unwrap() = reply;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Per-call latency for successive quotes; calls beyond the list use the shared latency
    pub fn with_quote_latencies(self, latencies: impl IntoIterator<Item = Duration>) -> Self {
        self.quote_latencies.lock().unwrap().extend(latencies);
        self
    }

    pub fn set_tokens(&self, reply: Option<RemoteResult<Vec<Token>>>) {
        *self.tokens.lock().unwrap() = reply;
    }

    pub fn set_quote(&self, reply: Option<RemoteResult<Nat>>) {
        *self.quote.lock().unwrap() = reply;
    }

    pub fn quote_calls(&self) -> Vec<QuoteCall> {
        self.quote_calls.lock().unwrap().clone()
    }

    pub fn swap_calls(&self) -> Vec<SwapCall> {
        self.swap_calls.lock().unwrap().clone()
    }

    pub fn token_fetches(&self) -> usize {
        *self.token_fetches.lock().unwrap()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn transport_error() -> BackendError {
    BackendError::Agent("connection refused".to_string())
}

#[async_trait]
impl SwapBackend for MockBackend {
    async fn get_available_tokens(&self) -> Result<RemoteResult<Vec<Token>>, BackendError> {
        *self.token_fetches.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.tokens.lock().unwrap().clone().ok_or_else(transport_error)
    }

    async fn get_swap_quote(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError> {
        self.quote_calls.lock().unwrap().push(QuoteCall {
            token_in,
            token_out,
            amount_in: amount_in.clone(),
        });
        // reply is fixed when the call arrives, not when it resolves
        let reply = self.quote.lock().unwrap().clone();
        let latency = self.quote_latencies.lock().unwrap().pop_front();
        match latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => self.simulate_latency().await,
        }
        reply.ok_or_else(transport_error)
    }

    async fn swap_tokens(
        &self,
        token_in: Principal,
        token_out: Principal,
        amount_in: &Nat,
        min_amount_out: &Nat,
    ) -> Result<RemoteResult<Nat>, BackendError> {
        self.swap_calls.lock().unwrap().push(SwapCall {
            token_in,
            token_out,
            amount_in: amount_in.clone(),
            min_amount_out: min_amount_out.clone(),
        });
        self.simulate_latency().await;
        self.swap.lock().unwrap().clone().ok_or_else(transport_error)
    }
}
