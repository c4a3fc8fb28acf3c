//! Utility functions and helpers

use std::fmt::Display;

use candid::{Nat, Principal};
use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::shared::errors::AmountError;

/// Slippage applied by `calculate_minimum_received` when none is given
pub const DEFAULT_SLIPPAGE_TOLERANCE: f64 = 0.05;

/// Percentage kept by the live quote path (5% slippage)
pub const LIVE_QUOTE_KEEP_PERCENT: u32 = 95;

/// Display decimals assumed when the output token is unknown
pub const FALLBACK_DECIMALS: u8 = 8;

fn scale(decimals: u8) -> f64 {
    10_f64.powi(decimals as i32)
}

fn nat_to_f64(amount: &Nat) -> f64 {
    amount.0.to_f64().unwrap_or(f64::INFINITY)
}

/// Parse a display amount ("1.5") into integer token units.
///
/// The scaled value is truncated toward zero, so float error may drop the last unit
/// (`0.29` at 8 decimals gives `28999999`). The integer is what goes over the wire.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<Nat, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(AmountError::NotANumber(trimmed.to_string()));
    }
    if value < 0.0 {
        return Err(AmountError::Negative(trimmed.to_string()));
    }

    let scaled = (value * scale(decimals)).trunc();
    BigUint::from_f64(scaled)
        .map(Nat)
        .ok_or_else(|| AmountError::NotANumber(trimmed.to_string()))
}

/// Integer digits and six fractional digits of `amount / 10^decimals`.
///
/// Amounts beyond f64 range are split exactly on the integer instead of printing `inf`;
/// their fraction is truncated rather than rounded.
fn six_digit_parts(amount: &Nat, decimals: u8) -> (String, String) {
    let value = nat_to_f64(amount) / scale(decimals);
    if value.is_finite() {
        let fixed = format!("{:.6}", value);
        return match fixed.split_once('.') {
            Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
            None => (fixed, "000000".to_string()),
        };
    }

    let divisor = BigUint::from(10u32).pow(u32::from(decimals));
    let int_part = (&amount.0 / &divisor).to_str_radix(10);
    let mut frac = if decimals == 0 {
        String::new()
    } else {
        let rem = (&amount.0 % &divisor).to_str_radix(10);
        format!("{:0>width$}", rem, width = decimals as usize)
    };
    frac.truncate(6);
    while frac.len() < 6 {
        frac.push('0');
    }
    (int_part, frac)
}

/// Format integer token units for display: en-US grouping, 2 to 6 fractional digits
pub fn format_token_amount(amount: &Nat, decimals: u8) -> String {
    let (int_part, frac_part) = six_digit_parts(amount, decimals);

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    format!("{}.{}", group_thousands(&int_part), frac)
}

/// Format integer token units with exactly six fractional digits
pub fn format_fixed_amount(amount: &Nat, decimals: u8) -> String {
    let (int_part, frac_part) = six_digit_parts(amount, decimals);
    format!("{}.{}", int_part, frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Price impact in percent: |spot - execution| / spot * 100.
/// Returns 0 when any operand is zero.
pub fn calculate_price_impact(
    amount_in: &Nat,
    amount_out: &Nat,
    reserve_in: &Nat,
    reserve_out: &Nat,
) -> f64 {
    if amount_in.0.is_zero()
        || amount_out.0.is_zero()
        || reserve_in.0.is_zero()
        || reserve_out.0.is_zero()
    {
        return 0.0;
    }

    let spot_price = nat_to_f64(reserve_out) / nat_to_f64(reserve_in);
    let execution_price = nat_to_f64(amount_out) / nat_to_f64(amount_in);

    ((spot_price - execution_price) / spot_price).abs() * 100.0
}

/// Minimum acceptable output for a slippage tolerance fraction (0.05 = 5%).
/// The tolerance is turned into a whole percentage first; the amount stays integer.
pub fn calculate_minimum_received(expected_amount: &Nat, slippage_tolerance: f64) -> Nat {
    let multiplier = ((1.0 - slippage_tolerance) * 100.0).floor().max(0.0) as u64;
    Nat(expected_amount.0.clone() * multiplier / 100u64)
}

/// Minimum received used by the live quote path: always 95% of the quote
pub fn live_minimum_received(amount_out: &Nat) -> Nat {
    Nat(amount_out.0.clone() * LIVE_QUOTE_KEEP_PERCENT / 100u32)
}

/// Check that `text` is a well-formed principal
pub fn is_valid_principal(text: &str) -> bool {
    Principal::from_text(text).is_ok()
}

/// Order-independent key for a token pair
pub fn token_pair_key(token_a: &impl Display, token_b: &impl Display) -> String {
    let mut pair = [token_a.to_string(), token_b.to_string()];
    pair.sort();
    format!("{}-{}", pair[0], pair[1])
}
