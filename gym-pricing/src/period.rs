//! Subscription period boundaries.
//!
//! # Month Rollover
//!
//! Calendar-month arithmetic clamps to the last valid day of the target month
//! when the start day does not exist there:
//!
//! | Start        | Period    | End          |
//! |--------------|-----------|--------------|
//! | `2024-01-31` | monthly   | `2024-02-29` |
//! | `2023-01-31` | monthly   | `2023-02-28` |
//! | `2024-03-31` | monthly   | `2024-04-30` |
//! | `2024-11-30` | quarterly | `2025-02-28` |
//! | `2024-02-29` | yearly    | `2025-02-28` |
//!
//! The clamp never spills into the following month, so a monthly membership
//! started on the 31st always ends inside the next calendar month.

use chrono::{Months, NaiveDate};

use crate::catalog::BillingPeriod;

/// Computes the end date of a subscription starting on `start_date`.
///
/// Monthly adds one calendar month, quarterly three, yearly twelve; see the
/// [module documentation](self) for the rollover rule. Dates past the end of
/// the supported calendar saturate to [`NaiveDate::MAX`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gym_pricing::{catalog::BillingPeriod, period::compute_end_date};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let end = compute_end_date(start, BillingPeriod::Monthly);
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
#[must_use]
pub fn compute_end_date(start_date: NaiveDate, period: BillingPeriod) -> NaiveDate {
    start_date.checked_add_months(Months::new(period.months())).unwrap_or(NaiveDate::MAX)
}
