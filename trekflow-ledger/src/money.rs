//! Decimal helpers for ledger arithmetic.
//!
//! Booking records store rupee amounts as `f64`; every calculation converts
//! to `Decimal`, works at full precision, and rounds back to two decimal
//! places on the way out so stored columns always reconcile exactly.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert a stored f64 amount to Decimal for calculation.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to two decimal places, half away from zero.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert back to f64 for storage, rounded to two decimal places.
#[inline]
pub fn to_money(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}
