//! Prices travel as decimals on the wire and live as integer cents in the store.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::{AppError, AppResult};

/// Convert a non-negative decimal amount into cents, rounding half away from zero.
pub fn to_cents(amount: Decimal) -> AppResult<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    (amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| AppError::BadRequest("price is out of range".into()))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Sum of `quantity * price` over order lines.
pub fn lines_total<I>(lines: I) -> AppResult<i64>
where
    I: IntoIterator<Item = (i32, i64)>,
{
    lines.into_iter().try_fold(0i64, |acc, (quantity, price)| {
        price
            .checked_mul(i64::from(quantity))
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| AppError::BadRequest("order total is out of range".into()))
    })
}
