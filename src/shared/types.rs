//! Common types used across the application

use candid::{CandidType, Nat, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::utils::{calculate_price_impact, token_pair_key};

/// Tagged `Ok`/`Err` reply of the launchpad backend canister
pub type RemoteResult<T> = Result<T, String>;

/// Token as listed by `get_available_tokens`
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub canister_id: Principal,
    pub decimals: u8,
}

impl Token {
    pub fn new(symbol: &str, name: &str, canister_id: Principal, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            canister_id,
            decimals,
        }
    }

    /// Selector label, e.g. `Internet Computer (ICP)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// Quote for a proposed swap. Discarded whenever the inputs change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapQuote {
    #[serde(with = "nat_string")]
    pub amount_out: Nat,
    /// Percentage, 0.5 = 0.5%
    pub price_impact: f64,
    #[serde(with = "nat_string")]
    pub minimum_received: Nat,
}

/// Liquidity pool snapshot kept in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub token_0: String,
    pub token_1: String,
    #[serde(with = "nat_string")]
    pub reserve_0: Nat,
    #[serde(with = "nat_string")]
    pub reserve_1: Nat,
}

impl Pool {
    pub fn pair_key(&self) -> String {
        token_pair_key(&self.token_0, &self.token_1)
    }

    /// Reserves oriented as (reserve_in, reserve_out) for a swap paying `token_in`
    pub fn reserves_for(&self, token_in: &str) -> Option<(&Nat, &Nat)> {
        if token_in == self.token_0 {
            Some((&self.reserve_0, &self.reserve_1))
        } else if token_in == self.token_1 {
            Some((&self.reserve_1, &self.reserve_0))
        } else {
            None
        }
    }

    /// Price impact in percent, 0 when `token_in` is not part of this pool
    pub fn price_impact(&self, token_in: &str, amount_in: &Nat, amount_out: &Nat) -> f64 {
        match self.reserves_for(token_in) {
            Some((reserve_in, reserve_out)) => {
                calculate_price_impact(amount_in, amount_out, reserve_in, reserve_out)
            }
            None => 0.0,
        }
    }
}

/// Executed swap kept in the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub id: Uuid,
    pub token_in: String,
    pub token_out: String,
    #[serde(with = "nat_string")]
    pub amount_in: Nat,
    #[serde(with = "nat_string")]
    pub minimum_received: Nat,
    pub executed_at: DateTime<Utc>,
}

impl SwapRecord {
    pub fn new(token_in: &Token, token_out: &Token, amount_in: Nat, minimum_received: Nat) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_in: token_in.symbol.clone(),
            token_out: token_out.symbol.clone(),
            amount_in,
            minimum_received,
            executed_at: Utc::now(),
        }
    }
}

/// Serializes `Nat` as a plain decimal string (no digit grouping)
pub mod nat_string {
    use candid::Nat;
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Nat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.0.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Nat, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Nat)
            .ok_or_else(|| D::Error::custom(format!("invalid integer amount: {}", s)))
    }
}
