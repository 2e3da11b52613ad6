//! Error types for the pricing engine.
//!
//! Every fallible operation in this crate returns [`Result<T>`], which uses
//! [`PricingError`] as its error type. All errors are local and synchronous:
//! nothing here performs I/O except configuration loading, and nothing is
//! retried.
//!
//! # Error Categories
//!
//! - **Configuration Errors** ([`PricingError::Configuration`], [`PricingError::ConfigParse`]):
//!   catalog gaps and malformed configuration
//! - **State Errors** ([`PricingError::InvalidSubscriptionState`]): malformed active
//!   subscription data supplied for an upgrade
//! - **Validation Errors** ([`PricingError::Validation`]): caller-level input problems
//! - **Arithmetic Errors** ([`PricingError::Overflow`]): decimal overflow
//!
//! # Examples
//!
//! ```
//! use gym_pricing::error::{PricingError, Result};
//!
//! fn require_plan(plan: Option<&str>) -> Result<&str> {
//!     plan.ok_or_else(|| PricingError::Validation("a plan must be selected".to_owned()))
//! }
//!
//! assert!(require_plan(None).is_err());
//! ```

use thiserror::Error;

/// Result type alias for pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur while pricing a subscription.
///
/// The messages are written to be shown to the person filling in the
/// subscription form.
///
/// # Error Recovery
///
/// - **Configuration errors**: fix the plan catalog or the configuration file
/// - **State errors**: the active subscription record is corrupt; repair it upstream
/// - **Validation errors**: correct the selection and recompute
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Requested plan/period combination is not priced, or a configuration
    /// value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gym_pricing::error::PricingError;
    ///
    /// let err = PricingError::Configuration("no price for elite/weekly".to_owned());
    /// assert!(err.to_string().contains("Pricing configuration error"));
    /// ```
    #[error("Pricing configuration error: {0}")]
    Configuration(String),

    /// Active subscription has a zero or negative duration.
    ///
    /// Only reachable with malformed subscription data; the upgrade is aborted
    /// without a partial result.
    #[error("Invalid subscription state: {0}")]
    InvalidSubscriptionState(String),

    /// Caller supplied an incomplete or inconsistent selection.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),
}
