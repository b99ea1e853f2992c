//! Monetary rounding and clamping utilities.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the engine is a `rust_decimal::Decimal`. Computed
//! amounts are rounded to 2 decimal places with commercial half-up
//! rounding before they are stored or compared, so that independently
//! derived figures agree to the cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on every stored monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Tolerance for integrity checks between a total and the sum of its
/// independently rounded parts. Three separate roundings can drift by
/// at most one cent.
pub const CENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to 2 decimal places, midpoints away from zero.
///
/// `2.345` becomes `2.35`, `-2.345` becomes `-2.35`. Applied to every
/// computed monetary value; raw intermediate products keep full
/// precision until this final step.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount to zero when a subtraction dips below it.
///
/// Remaining balances and outstanding debts are never stored negative;
/// over-payments settle at exactly zero.
#[must_use]
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Profit margin as a percentage of the total, rounded to 2 decimal
/// places. Returns zero for a zero or negative total instead of
/// dividing by it.
#[must_use]
pub fn margin_percent(profit: Decimal, total: Decimal) -> Decimal {
    if total > Decimal::ZERO {
        round_amount(profit / total * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    }
}

/// Returns true if two amounts agree within [`CENT_TOLERANCE`].
#[must_use]
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() <= CENT_TOLERANCE
}
