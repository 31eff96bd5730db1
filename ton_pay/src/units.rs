//! Conversion between human-facing decimal strings and integer minimal units.
//!
//! Everything goes through integer arithmetic: the decimal string is split into its
//! whole and fractional digits, never parsed as a float.

use crate::errors::{TonPayError, TonPayResult};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// nanoTON
pub const NATIVE_DECIMALS: u32 = 9;
/// micro-USDT
pub const TOKEN_DECIMALS: u32 = 6;

/// `"1.5"` with 9 decimals -> `1500000000`.
///
/// Extra fractional digits are truncated. Signs, exponents, `NaN` and empty input are rejected.
pub fn to_minimal_units(amount: &str, decimals: u32) -> TonPayResult<BigUint> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(TonPayError::invalid_amount(amount, "empty string"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(TonPayError::invalid_amount(amount, "no digits"));
    }
    if let Some(bad) = whole.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
        return Err(TonPayError::invalid_amount(amount, format!("unexpected character '{bad}'")));
    }

    let kept_fraction = &fraction[..fraction.len().min(decimals as usize)];
    if kept_fraction.len() < fraction.len() {
        log::debug!("amount {amount} truncated to {decimals} decimals");
    }
    let padding = "0".repeat(decimals as usize - kept_fraction.len());
    let digits = format!("{whole}{kept_fraction}{padding}");
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| TonPayError::invalid_amount(amount, "not a number"))
}

/// `1500000000` with 9 decimals -> `"1.5"`. Trailing zeros (and a bare dot) are stripped.
pub fn from_minimal_units(amount: &BigUint, decimals: u32) -> String {
    let divisor = BigUint::from(10u32).pow(decimals);
    let whole = amount / &divisor;
    let fraction = amount % &divisor;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction_str = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{whole}.{}", fraction_str.trim_end_matches('0'))
}

/// Minimal units as `u128`, the widest value a coins field can carry.
pub fn to_u128(amount: &BigUint, input: &str) -> TonPayResult<u128> {
    amount.to_u128().ok_or_else(|| TonPayError::invalid_amount(input, "amount is too large"))
}
