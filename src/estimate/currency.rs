use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Dollars per credit on the provider's public plans.
pub const DEFAULT_CREDIT_PRICE: f64 = 0.0006;

/// Convert credits to dollars, rounded half-up to cents.
pub fn to_currency(credits: f64, credit_price: f64) -> f64 {
    cents(decimal(credits) * decimal(credit_price))
}

/// Round to two decimals, half-up.
pub fn round_cents(amount: f64) -> f64 {
    cents(decimal(amount))
}

// Shortest decimal that round-trips the float, so 0.0006 is exactly 6e-4.
fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn cents(amount: Decimal) -> f64 {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}
