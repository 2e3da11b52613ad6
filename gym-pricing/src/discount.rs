//! Discounts and their application to plan prices.
//!
//! Discount records are owned by an external collaborator that also enforces
//! validity windows and usage limits. This module only checks that a record is
//! well formed and applies it to a price.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// Largest amount accepted for prices and fixed discounts.
///
/// Keeps every intermediate product well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Identifier of a discount record in the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiscountId(String);

impl DiscountId {
    /// Creates a new discount ID after validation.
    ///
    /// # Errors
    ///
    /// Returns error if ID is empty, exceeds 64 characters, or contains characters
    /// other than ASCII alphanumerics, hyphens and underscores.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(PricingError::Validation("discount_id cannot be empty".into()));
        }
        if id.len() > 64 {
            return Err(PricingError::Validation(
                "discount_id must be 64 characters or less".into(),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(PricingError::Validation(
                "discount_id can only contain alphanumeric characters, hyphens, and underscores"
                    .into(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DiscountId {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DiscountId> for String {
    fn from(id: DiscountId) -> Self {
        id.0
    }
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage in `0..=100`.
    Percentage,
    /// `value` is an absolute currency amount.
    Fixed,
}

/// A validated discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord")]
pub struct Discount {
    id: DiscountId,
    #[serde(rename = "type")]
    kind: DiscountKind,
    value: Decimal,
}

#[derive(Deserialize)]
struct DiscountRecord {
    id: DiscountId,
    #[serde(rename = "type")]
    kind: DiscountKind,
    value: Decimal,
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = PricingError;

    fn try_from(record: DiscountRecord) -> Result<Self> {
        Self::new(record.id, record.kind, record.value)
    }
}

impl Discount {
    /// Creates a discount after range-checking its value.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] if the value is negative, a
    /// percentage exceeds 100, or a fixed amount exceeds [`MAX_AMOUNT`].
    pub fn new(id: DiscountId, kind: DiscountKind, value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "discount {} has negative value {value}",
                id.as_str()
            )));
        }
        match kind {
            DiscountKind::Percentage if value > ONE_HUNDRED => {
                return Err(PricingError::Validation(format!(
                    "discount {} percentage {value} exceeds 100",
                    id.as_str()
                )));
            }
            DiscountKind::Fixed if value > MAX_AMOUNT => {
                return Err(PricingError::Validation(format!(
                    "discount {} amount {value} exceeds {MAX_AMOUNT}",
                    id.as_str()
                )));
            }
            _ => {}
        }
        Ok(Self { id, kind, value })
    }

    /// Shorthand for a percentage discount.
    ///
    /// # Errors
    ///
    /// See [`Discount::new`].
    pub fn percentage(id: DiscountId, value: Decimal) -> Result<Self> {
        Self::new(id, DiscountKind::Percentage, value)
    }

    /// Shorthand for a fixed-amount discount.
    ///
    /// # Errors
    ///
    /// See [`Discount::new`].
    pub fn fixed(id: DiscountId, value: Decimal) -> Result<Self> {
        Self::new(id, DiscountKind::Fixed, value)
    }

    /// Discount record identifier.
    #[must_use]
    pub fn id(&self) -> &DiscountId {
        &self.id
    }

    /// Discount kind.
    #[must_use]
    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// Raw discount value.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }
}

/// Applies an optional discount to a base price.
///
/// - no discount: `base_price` unchanged
/// - percentage: `base_price - base_price * value / 100`
/// - fixed: `base_price - value`
///
/// The result is clamped at zero for every kind. Full precision is kept;
/// rounding belongs to presentation.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the arithmetic leaves `Decimal`'s
/// range, which only happens for base prices far above [`MAX_AMOUNT`].
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use gym_pricing::discount::{Discount, DiscountId, apply_discount};
///
/// # fn example() -> gym_pricing::error::Result<()> {
/// let ten_percent = Discount::percentage(DiscountId::new("SPRING10")?, Decimal::from(10))?;
/// let price = apply_discount(Decimal::from(132), Some(&ten_percent))?;
/// assert_eq!(price, Decimal::new(1188, 1)); // 118.8
/// # Ok(())
/// # }
/// ```
pub fn apply_discount(base_price: Decimal, discount: Option<&Discount>) -> Result<Decimal> {
    let Some(discount) = discount else {
        return Ok(base_price);
    };

    let discounted = match discount.kind {
        DiscountKind::Percentage => base_price
            .checked_mul(discount.value)
            .and_then(|scaled| scaled.checked_div(ONE_HUNDRED))
            .and_then(|reduction| base_price.checked_sub(reduction)),
        DiscountKind::Fixed => base_price.checked_sub(discount.value),
    };

    discounted.map(|price| price.max(Decimal::ZERO)).ok_or_else(|| {
        PricingError::Overflow(format!(
            "applying discount {} to {base_price}",
            discount.id.as_str()
        ))
    })
}

/// Checks that `amount` lies in `0..=MAX_AMOUNT`.
pub(crate) fn ensure_amount(label: &str, amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(PricingError::Configuration(format!(
            "{label} must be between 0 and {MAX_AMOUNT}, got {amount}"
        )));
    }
    Ok(amount)
}

/// Resolves discount codes typed by the customer.
///
/// Validity windows and redemption limits are the implementor's concern; a
/// code that is not currently redeemable must return `None`.
pub trait DiscountLookup {
    /// Returns the discount registered under `code`, if redeemable.
    fn find(&self, code: &str) -> Option<Discount>;
}

/// Discount codes held in memory, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscounts {
    codes: HashMap<String, Discount>,
}

impl InMemoryDiscounts {
    /// Creates an empty code table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `discount` under `code`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] if the code is blank.
    pub fn insert(&mut self, code: &str, discount: Discount) -> Result<()> {
        let key = normalize_code(code);
        if key.is_empty() {
            return Err(PricingError::Validation("discount code cannot be blank".into()));
        }
        self.codes.insert(key, discount);
        Ok(())
    }

    /// Number of registered codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no code is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl DiscountLookup for InMemoryDiscounts {
    fn find(&self, code: &str) -> Option<Discount> {
        self.codes.get(&normalize_code(code)).cloned()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
