use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole unit, halves away from zero. All display
/// rounding in the dashboard goes through this so shares and targets agree.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a currency amount to the nearest thousand.
pub fn round_to_thousand(value: Decimal) -> Decimal {
    round_whole(value / Decimal::ONE_THOUSAND) * Decimal::ONE_THOUSAND
}
