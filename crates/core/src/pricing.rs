//! Commission arithmetic on integer currency amounts.
//!
//! Rates are basis points (1000 = 10%). One rule covers every calculator:
//! amounts paid out to a third party round down and the platform keeps the
//! remainder. For the booking-price split that means the owner share is
//! floored; for the payment-layer commission (the platform's own cut) it
//! means the commission is rounded up.

use serde::Serialize;

use crate::types::Amount;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: i64 = 10_000;

/// How to resolve a fractional currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
}

/// Multiply `amount` by `rate_bps / 10_000`, rounding as requested.
///
/// Works in `i128` so large amounts cannot overflow. `amount` and `rate_bps`
/// are expected to be non-negative.
pub fn apply_rate(amount: Amount, rate_bps: i32, rounding: Rounding) -> Amount {
    let numerator = amount as i128 * rate_bps as i128;
    let denominator = BPS_DENOMINATOR as i128;
    let quotient = match rounding {
        Rounding::Floor => numerator / denominator,
        Rounding::Ceil => (numerator + denominator - 1) / denominator,
    };
    quotient as Amount
}

/// How a booking price is divided between the platform and the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSplit {
    pub platform_commission: Amount,
    pub owner_amount: Amount,
}

/// Split a booking price: the owner share is floored, the platform gets the
/// rest.
pub fn split_booking_price(base_price: Amount, platform_rate_bps: i32) -> PriceSplit {
    let owner_rate_bps = BPS_DENOMINATOR as i32 - platform_rate_bps;
    let owner_amount = apply_rate(base_price, owner_rate_bps, Rounding::Floor);
    PriceSplit {
        platform_commission: base_price - owner_amount,
        owner_amount,
    }
}

/// Platform commission on a settled payment, rounded up.
///
/// This is the processor-side figure, used to reconcile a gateway fee report
/// against settled payments. Booking prices are split with
/// [`split_booking_price`], which rounds the other way.
pub fn payment_commission(amount: Amount, platform_rate_bps: i32) -> Amount {
    apply_rate(amount, platform_rate_bps, Rounding::Ceil)
}
