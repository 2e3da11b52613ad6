//! Plan catalog: membership plans, billing periods and their base prices.
//!
//! The catalog is static reference data. [`PlanCatalog::standard`] carries the
//! published price list; deployments can replace it through
//! [`PricingConfig`](crate::config::PricingConfig).

use std::{collections::HashMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    discount::ensure_amount,
    error::{PricingError, Result},
};

/// Membership plan name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanName {
    /// Entry-level gym access.
    Basic,
    /// Gym access plus classes.
    Premium,
    /// Everything, including personal training sessions.
    Elite,
}

impl PlanName {
    /// All plans in ascending tier order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Premium, Self::Elite];

    /// Returns the ordinal rank used to decide upgrade eligibility.
    #[must_use]
    pub const fn tier(self) -> Tier {
        match self {
            Self::Basic => Tier(1),
            Self::Premium => Tier(2),
            Self::Elite => Tier(3),
        }
    }

    /// Returns the lowercase identifier used in configuration and records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for PlanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanName {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "elite" => Ok(Self::Elite),
            other => Err(PricingError::Validation(format!("unknown plan '{other}'"))),
        }
    }
}

/// Ordinal rank of a plan (Basic = 1, Premium = 2, Elite = 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(u8);

impl Tier {
    /// Returns the numeric rank.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing period of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    /// One calendar month.
    Monthly,
    /// Three calendar months.
    Quarterly,
    /// Twelve calendar months.
    Yearly,
}

impl BillingPeriod {
    /// All periods, shortest first.
    pub const ALL: [Self; 3] = [Self::Monthly, Self::Quarterly, Self::Yearly];

    /// Number of calendar months covered by one period.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }

    /// Returns the lowercase identifier used in configuration and records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingPeriod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            other => Err(PricingError::Validation(format!("unknown billing period '{other}'"))),
        }
    }
}

/// One priced plan/period combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCatalogEntry {
    /// Plan name.
    pub name: PlanName,
    /// Plan rank, always `name.tier()`.
    pub tier: Tier,
    /// Billing period this price covers.
    pub period: BillingPeriod,
    /// Price for one full period, before discounts and fees.
    pub base_price: Decimal,
}

impl PlanCatalogEntry {
    /// Creates an entry whose tier is derived from the plan name.
    #[must_use]
    pub const fn new(name: PlanName, period: BillingPeriod, base_price: Decimal) -> Self {
        Self { name, tier: name.tier(), period, base_price }
    }

    /// Checks that the price lies in `0..=MAX_AMOUNT` and the tier matches
    /// the plan.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        ensure_amount(&format!("base price for {}/{}", self.name, self.period), self.base_price)?;
        if self.tier != self.name.tier() {
            return Err(PricingError::Configuration(format!(
                "{}/{} has tier {}, expected {}",
                self.name,
                self.period,
                self.tier,
                self.name.tier()
            )));
        }
        Ok(())
    }
}

/// Source of plan prices.
///
/// Implemented by [`PlanCatalog`]; callers backed by a database can implement
/// it over their own records.
pub trait CatalogProvider {
    /// Returns the entry for `(name, period)`, if that combination is sold.
    fn lookup(&self, name: PlanName, period: BillingPeriod) -> Option<&PlanCatalogEntry>;

    /// Like [`lookup`](Self::lookup) but reports a missing entry as a
    /// configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] if the combination is absent.
    fn require(&self, name: PlanName, period: BillingPeriod) -> Result<&PlanCatalogEntry> {
        self.lookup(name, period).ok_or_else(|| {
            PricingError::Configuration(format!("no price configured for {name}/{period}"))
        })
    }
}

/// In-memory plan catalog keyed by `(plan, period)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCatalog {
    entries: HashMap<(PlanName, BillingPeriod), PlanCatalogEntry>,
}

impl PlanCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the published price list.
    ///
    /// | Plan    | Monthly | Quarterly | Yearly |
    /// |---------|---------|-----------|--------|
    /// | Basic   | 49      | 132       | 470    |
    /// | Premium | 89      | 240       | 850    |
    /// | Elite   | 129     | 348       | 1240   |
    #[must_use]
    pub fn standard() -> Self {
        let prices: [(PlanName, [i64; 3]); 3] = [
            (PlanName::Basic, [49, 132, 470]),
            (PlanName::Premium, [89, 240, 850]),
            (PlanName::Elite, [129, 348, 1240]),
        ];

        let entries = prices
            .into_iter()
            .flat_map(|(name, row)| {
                BillingPeriod::ALL.into_iter().zip(row).map(move |(period, price)| {
                    ((name, period), PlanCatalogEntry::new(name, period, Decimal::from(price)))
                })
            })
            .collect();
        Self { entries }
    }

    /// Builds a catalog from `entries`; later entries replace earlier ones
    /// for the same plan and period.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] for the first invalid entry.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = PlanCatalogEntry>,
    {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Inserts or replaces an entry.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] if the base price is negative
    /// or exceeds [`MAX_AMOUNT`](crate::discount::MAX_AMOUNT).
    pub fn insert(&mut self, entry: PlanCatalogEntry) -> Result<()> {
        entry.validate()?;
        self.entries.insert((entry.name, entry.period), entry);
        Ok(())
    }

    /// Number of priced combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no combination is priced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &PlanCatalogEntry> {
        self.entries.values()
    }
}

impl CatalogProvider for PlanCatalog {
    fn lookup(&self, name: PlanName, period: BillingPeriod) -> Option<&PlanCatalogEntry> {
        self.entries.get(&(name, period))
    }
}
