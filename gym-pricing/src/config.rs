//! Pricing configuration.
//!
//! TOML-deserializable settings for the engine: the insurance fee, the
//! policy for same-or-lower tier "upgrades", price overrides and discount
//! codes.
//!
//! ```toml
//! insurance_fee = "50"
//! upgrade_policy = "zero_price"
//!
//! [[plans]]
//! name = "premium"
//! period = "monthly"
//! base_price = "95"
//!
//! [[discounts]]
//! code = "SPRING10"
//! id = "spring-10"
//! type = "percentage"
//! value = "10"
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{BillingPeriod, PlanCatalog, PlanCatalogEntry, PlanName},
    discount::{Discount, DiscountId, DiscountKind, InMemoryDiscounts, ensure_amount},
    error::{PricingError, Result},
};

/// Insurance fee charged to first-time members, in currency units.
pub const DEFAULT_INSURANCE_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// What to do when the target plan's tier is not above the active one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Return a zero-price, non-upgrade result.
    #[default]
    ZeroPrice,
    /// Reject the request with a validation error.
    Reject,
}

/// Root pricing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Fee added to new subscriptions of first-time members.
    #[serde(default = "default_insurance_fee")]
    pub insurance_fee: Decimal,

    /// Handling of same-or-lower tier changes.
    #[serde(default)]
    pub upgrade_policy: UpgradePolicy,

    /// Price overrides applied on top of the standard catalog.
    #[serde(default)]
    pub plans: Vec<PlanPriceConfig>,

    /// Discount codes accepted at checkout.
    #[serde(default)]
    pub discounts: Vec<DiscountCodeConfig>,
}

/// Price override for one plan/period combination.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanPriceConfig {
    /// Plan name.
    pub name: PlanName,
    /// Billing period.
    pub period: BillingPeriod,
    /// Price for one full period.
    pub base_price: Decimal,
}

/// Discount code definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeConfig {
    /// Code typed by the customer.
    pub code: String,
    /// Discount record identifier.
    pub id: String,
    /// Percentage or fixed amount.
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    /// Discount value.
    pub value: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            insurance_fee: default_insurance_fee(),
            upgrade_policy: UpgradePolicy::default(),
            plans: Vec::new(),
            discounts: Vec::new(),
        }
    }
}

fn default_insurance_fee() -> Decimal {
    DEFAULT_INSURANCE_FEE
}

impl PricingConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::ConfigParse`] if the TOML is malformed, or the
    /// validation error from [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use gym_pricing::config::{PricingConfig, UpgradePolicy};
    ///
    /// let config = PricingConfig::from_toml(r#"upgrade_policy = "reject""#).unwrap();
    /// assert_eq!(config.upgrade_policy, UpgradePolicy::Reject);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PricingError::ConfigParse(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`from_toml`](Self::from_toml) fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PricingError::ConfigParse(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] if the insurance fee is out of
    /// range, or if a price override or discount code is invalid.
    pub fn validate(&self) -> Result<()> {
        ensure_amount("insurance_fee", self.insurance_fee)?;
        self.catalog()?;
        self.discount_codes()?;
        Ok(())
    }

    /// Builds the plan catalog: the standard list with overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] if an override has an invalid price.
    pub fn catalog(&self) -> Result<PlanCatalog> {
        let mut catalog = PlanCatalog::standard();
        for plan in &self.plans {
            catalog.insert(PlanCatalogEntry::new(plan.name, plan.period, plan.base_price))?;
        }
        Ok(catalog)
    }

    /// Builds the discount code table.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] if a code is blank or its
    /// discount is malformed.
    pub fn discount_codes(&self) -> Result<InMemoryDiscounts> {
        let mut codes = InMemoryDiscounts::new();
        for entry in &self.discounts {
            DiscountId::new(entry.id.as_str())
                .and_then(|id| Discount::new(id, entry.kind, entry.value))
                .and_then(|discount| codes.insert(&entry.code, discount))
                .map_err(|e| {
                    PricingError::Configuration(format!("discount code '{}': {e}", entry.code))
                })?;
        }
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::CatalogProvider, discount::DiscountLookup};

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.insurance_fee, Decimal::from(50));
        assert_eq!(config.upgrade_policy, UpgradePolicy::ZeroPrice);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PricingConfig::from_toml("").unwrap();
        assert_eq!(config.insurance_fee, DEFAULT_INSURANCE_FEE);
        assert_eq!(config.catalog().unwrap(), PlanCatalog::standard());
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
            insurance_fee = "35.5"
            upgrade_policy = "reject"

            [[plans]]
            name = "premium"
            period = "monthly"
            base_price = "95"

            [[discounts]]
            code = "SPRING10"
            id = "spring-10"
            type = "percentage"
            value = "10"

            [[discounts]]
            code = "welcome"
            id = "welcome"
            type = "fixed"
            value = 20
        "#;

        let config = PricingConfig::from_toml(toml).unwrap();
        assert_eq!(config.insurance_fee, Decimal::new(355, 1));
        assert_eq!(config.upgrade_policy, UpgradePolicy::Reject);

        let catalog = config.catalog().unwrap();
        let premium = catalog.lookup(PlanName::Premium, BillingPeriod::Monthly).unwrap();
        assert_eq!(premium.base_price, Decimal::from(95));
        let basic = catalog.lookup(PlanName::Basic, BillingPeriod::Monthly).unwrap();
        assert_eq!(basic.base_price, Decimal::from(49));

        let codes = config.discount_codes().unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.find("spring10").unwrap().kind(), DiscountKind::Percentage);
        assert_eq!(codes.find("WELCOME").unwrap().value(), Decimal::from(20));
    }

    #[test]
    fn test_negative_insurance_fee_rejected() {
        let result = PricingConfig::from_toml(r#"insurance_fee = "-1""#);
        assert!(matches!(result, Err(PricingError::Configuration(_))));
    }

    #[test]
    fn test_invalid_discount_rejected() {
        let toml = r#"
            [[discounts]]
            code = "TOOMUCH"
            id = "too-much"
            type = "percentage"
            value = "120"
        "#;
        let err = PricingConfig::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("TOOMUCH"));
    }

    #[test]
    fn test_negative_plan_price_rejected() {
        let toml = r#"
            [[plans]]
            name = "basic"
            period = "yearly"
            base_price = "-10"
        "#;
        assert!(PricingConfig::from_toml(toml).is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let result = PricingConfig::from_toml("insurance_fee = ");
        assert!(matches!(result, Err(PricingError::ConfigParse(_))));
    }

    #[test]
    fn test_unknown_plan_name() {
        let toml = r#"
            [[plans]]
            name = "platinum"
            period = "monthly"
            base_price = "10"
        "#;
        assert!(matches!(PricingConfig::from_toml(toml), Err(PricingError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = PricingConfig::from_file("/nonexistent/gym-pricing.toml");
        assert!(matches!(result, Err(PricingError::ConfigParse(_))));
    }
}
