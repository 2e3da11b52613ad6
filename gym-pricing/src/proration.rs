//! Proration calculation utilities.
//!
//! Provides helpers for scaling a plan price by the share of the current
//! membership period that is still unused when a member upgrades.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{PricingError, Result};

/// Whole days from `today` until `period_end`, floored at zero.
///
/// Dates carry no time of day, so the difference is already the ceiling of
/// the fractional day count.
#[must_use]
pub fn days_remaining(period_end: NaiveDate, today: NaiveDate) -> i64 {
    (period_end - today).num_days().max(0)
}

/// Whole days covered by a period.
///
/// # Errors
///
/// Returns [`PricingError::InvalidSubscriptionState`] if `period_end` is not
/// after `period_start`.
pub fn total_days(period_start: NaiveDate, period_end: NaiveDate) -> Result<i64> {
    if period_end <= period_start {
        return Err(PricingError::InvalidSubscriptionState(format!(
            "subscription ends on {period_end}, which is not after its start {period_start}"
        )));
    }
    Ok((period_end - period_start).num_days())
}

/// Scales `amount` by `days_remaining / total_days`.
///
/// `days_remaining` is clamped to `0..=total_days`, so the result never
/// exceeds `amount`.
///
/// # Errors
///
/// Returns error if `total_days` is not positive or the multiplication
/// overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use gym_pricing::proration::prorate;
///
/// # fn example() -> gym_pricing::error::Result<()> {
/// let charge = prorate(Decimal::from(89), 16, 31)?;
/// assert_eq!(charge.round_dp(2), Decimal::new(4594, 2)); // 45.94
/// # Ok(())
/// # }
/// ```
pub fn prorate(amount: Decimal, days_remaining: i64, total_days: i64) -> Result<Decimal> {
    if total_days <= 0 {
        return Err(PricingError::InvalidSubscriptionState(format!(
            "cannot prorate over a period of {total_days} days"
        )));
    }

    let remaining = days_remaining.clamp(0, total_days);
    if remaining == total_days {
        return Ok(amount);
    }

    amount
        .checked_mul(Decimal::from(remaining))
        .and_then(|scaled| scaled.checked_div(Decimal::from(total_days)))
        .ok_or_else(|| PricingError::Overflow("overflow in proration calculation".into()))
}
