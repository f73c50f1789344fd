//! Money calculations using rust_decimal for precision
//!
//! Amounts carry two decimal places. Commissions are rounded half-to-even,
//! matching how stored totals are reproduced when summed.

use rust_decimal::prelude::*;

use super::error::{DomainError, DomainResult};

/// Decimal places kept for monetary values
pub const MONEY_SCALE: u32 = 2;

/// Largest price accepted for a service or a default price (1,000,000.00)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Normalize an amount to exactly two decimal places
pub fn to_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Commission owed for a service: price × percentage / 100
pub fn commission(price: Decimal, percentage: Decimal) -> DomainResult<Decimal> {
    price
        .checked_mul(percentage)
        .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
        .map(to_money)
        .ok_or_else(|| overflow("comision_calculada"))
}

/// Profit: income minus commissions
pub fn profit(income: Decimal, commissions: Decimal) -> DomainResult<Decimal> {
    income
        .checked_sub(commissions)
        .map(to_money)
        .ok_or_else(|| overflow("beneficios"))
}

/// Sum a sequence of amounts
pub fn total<I>(amounts: I) -> DomainResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .map(to_money)
        .ok_or_else(|| overflow("total"))
}

fn overflow(field: &str) -> DomainError {
    DomainError::validation("El importe excede el máximo representable", field)
}

/// Margin as an integer percentage: profit / income × 100
///
/// Returns 0 when there is no income.
pub fn margin_percent(profit: Decimal, income: Decimal) -> i64 {
    if income.is_zero() {
        return 0;
    }
    (profit / income * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
