//! Subscription pricing engine.
//!
//! [`PricingEngine`] turns a [`PricingRequest`] into a price. It holds only
//! immutable configuration, so every operation takes `&self`, performs no
//! I/O and returns identical output for identical input.
//!
//! # Pricing Rules
//!
//! **New subscription**: catalog price, minus discount, plus the insurance
//! fee for first-time members. Ends one period after the requested start.
//!
//! **Upgrade** (target tier above the active tier): catalog price of the
//! target, minus discount, scaled by the share of the active period that is
//! still unused. Starts on the pricing date and ends one period later. No
//! insurance fee.
//!
//! **Same or lower tier**: governed by [`UpgradePolicy`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::{
    catalog::{BillingPeriod, CatalogProvider, PlanCatalog, PlanName},
    config::{DEFAULT_INSURANCE_FEE, PricingConfig, UpgradePolicy},
    discount::{Discount, apply_discount, ensure_amount},
    error::{PricingError, Result},
    period::compute_end_date,
    proration::{days_remaining, prorate, total_days},
    request::{ActiveSubscription, PricingRequest},
    result::{OrderSummary, PriceBreakdown, PricingResult, SubscriptionDraft},
};

/// Stateless subscription pricing engine.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use gym_pricing::{
///     PricingEngine, PricingRequest,
///     catalog::{BillingPeriod, PlanCatalog, PlanName},
/// };
///
/// # fn example() -> gym_pricing::error::Result<()> {
/// let engine = PricingEngine::new(PlanCatalog::standard());
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let request =
///     PricingRequest::new(PlanName::Basic, BillingPeriod::Monthly, start).new_user(true);
///
/// let result = engine.recompute(&request, start)?;
/// assert_eq!(result.original_price, Decimal::from(49));
/// assert_eq!(result.final_price, Decimal::from(99));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PricingEngine<C = PlanCatalog> {
    catalog: C,
    insurance_fee: Decimal,
    upgrade_policy: UpgradePolicy,
}

impl PricingEngine<PlanCatalog> {
    /// Builds an engine from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration's catalog overrides are invalid.
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        Ok(Self::new(config.catalog()?)
            .with_insurance_fee(config.insurance_fee)
            .with_upgrade_policy(config.upgrade_policy))
    }
}

impl<C: CatalogProvider> PricingEngine<C> {
    /// Creates an engine with the default insurance fee and upgrade policy.
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            insurance_fee: DEFAULT_INSURANCE_FEE,
            upgrade_policy: UpgradePolicy::default(),
        }
    }

    /// Overrides the insurance fee.
    #[must_use]
    pub fn with_insurance_fee(mut self, fee: Decimal) -> Self {
        self.insurance_fee = fee;
        self
    }

    /// Overrides the same-or-lower tier policy.
    #[must_use]
    pub fn with_upgrade_policy(mut self, policy: UpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the insurance fee.
    #[must_use]
    pub fn insurance_fee(&self) -> Decimal {
        self.insurance_fee
    }

    /// Returns the same-or-lower tier policy.
    #[must_use]
    pub fn upgrade_policy(&self) -> UpgradePolicy {
        self.upgrade_policy
    }

    /// Prices a brand-new subscription.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Configuration`] if the plan/period is not in the catalog,
    ///   its price is out of range, or the insurance fee is out of range
    /// - [`PricingError::Overflow`] if the discount arithmetic overflows
    pub fn price_new_subscription(
        &self,
        plan: PlanName,
        period: BillingPeriod,
        start_date: NaiveDate,
        discount: Option<&Discount>,
        is_new_user: bool,
    ) -> Result<PricingResult> {
        self.new_subscription_breakdown(plan, period, start_date, discount, is_new_user)
            .map(|breakdown| breakdown.result())
    }

    /// Prices an upgrade from `active` to `target`, effective `today`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidSubscriptionState`] if `active` ends on or before its start
    /// - [`PricingError::Validation`] for a same-or-lower tier under [`UpgradePolicy::Reject`]
    /// - [`PricingError::Configuration`] if the target plan/period is not in the
    ///   catalog or its price is out of range
    pub fn price_upgrade(
        &self,
        active: &ActiveSubscription,
        target: PlanName,
        period: BillingPeriod,
        discount: Option<&Discount>,
        today: NaiveDate,
    ) -> Result<PricingResult> {
        self.upgrade_breakdown(active, target, period, discount, today)
            .map(|breakdown| breakdown.result())
    }

    /// Computes the full breakdown for `request` as of `today`.
    ///
    /// Requests carrying an active subscription are priced as upgrades;
    /// everything else as a new subscription.
    ///
    /// # Errors
    ///
    /// See [`price_new_subscription`](Self::price_new_subscription) and
    /// [`price_upgrade`](Self::price_upgrade).
    #[instrument(
        level = "debug",
        skip(self, request),
        fields(
            plan = %request.plan_name,
            period = %request.period,
            upgrade = request.active_subscription.is_some()
        )
    )]
    pub fn quote(&self, request: &PricingRequest, today: NaiveDate) -> Result<PriceBreakdown> {
        let breakdown = match &request.active_subscription {
            Some(active) => self.upgrade_breakdown(
                active,
                request.plan_name,
                request.period,
                request.discount.as_ref(),
                today,
            ),
            None => self.new_subscription_breakdown(
                request.plan_name,
                request.period,
                request.start_date,
                request.discount.as_ref(),
                request.is_new_user,
            ),
        }?;

        debug!(
            original_price = %breakdown.original_price,
            final_price = %breakdown.final_price,
            end_date = %breakdown.end_date,
            is_upgrade = breakdown.is_upgrade,
            "subscription priced"
        );
        Ok(breakdown)
    }

    /// Recomputes the price after any change to the form.
    ///
    /// # Errors
    ///
    /// See [`quote`](Self::quote).
    pub fn recompute(&self, request: &PricingRequest, today: NaiveDate) -> Result<PricingResult> {
        self.quote(request, today).map(|breakdown| breakdown.result())
    }

    /// Itemised order summary for `request`.
    ///
    /// # Errors
    ///
    /// See [`quote`](Self::quote).
    pub fn order_summary(
        &self,
        request: &PricingRequest,
        today: NaiveDate,
    ) -> Result<OrderSummary> {
        self.quote(request, today).map(|breakdown| breakdown.summary())
    }

    /// Subscription record to submit for `request`.
    ///
    /// # Errors
    ///
    /// See [`quote`](Self::quote).
    pub fn draft(&self, request: &PricingRequest, today: NaiveDate) -> Result<SubscriptionDraft> {
        self.quote(request, today).map(|breakdown| breakdown.draft())
    }

    /// Catalog price for `(plan, period)`, rejected if the provider hands
    /// back an entry that fails
    /// [`PlanCatalogEntry::validate`](crate::catalog::PlanCatalogEntry::validate).
    fn base_price(&self, plan: PlanName, period: BillingPeriod) -> Result<Decimal> {
        let entry = self.catalog.require(plan, period)?;
        entry.validate()?;
        Ok(entry.base_price)
    }

    fn new_subscription_breakdown(
        &self,
        plan: PlanName,
        period: BillingPeriod,
        start_date: NaiveDate,
        discount: Option<&Discount>,
        is_new_user: bool,
    ) -> Result<PriceBreakdown> {
        let original_price = self.base_price(plan, period)?;
        let discounted_price = apply_discount(original_price, discount)?;
        let insurance_fee = if is_new_user {
            ensure_amount("insurance fee", self.insurance_fee)?
        } else {
            Decimal::ZERO
        };
        let final_price = discounted_price
            .checked_add(insurance_fee)
            .ok_or_else(|| PricingError::Overflow("overflow adding insurance fee".into()))?;

        Ok(PriceBreakdown {
            plan_name: plan,
            period,
            start_date,
            end_date: compute_end_date(start_date, period),
            original_price,
            discounted_price,
            discount_id: discount.map(|d| d.id().clone()),
            prorated_price: None,
            insurance_fee,
            final_price,
            is_upgrade: false,
        })
    }

    fn upgrade_breakdown(
        &self,
        active: &ActiveSubscription,
        target: PlanName,
        period: BillingPeriod,
        discount: Option<&Discount>,
        today: NaiveDate,
    ) -> Result<PriceBreakdown> {
        let total = total_days(active.start_date, active.end_date)?;
        let end_date = compute_end_date(today, period);

        if target.tier() <= active.tier() {
            return match self.upgrade_policy {
                UpgradePolicy::ZeroPrice => {
                    debug!(
                        active_tier = %active.tier(),
                        target_tier = %target.tier(),
                        "target tier not above active tier, pricing at zero"
                    );
                    Ok(PriceBreakdown {
                        plan_name: target,
                        period,
                        start_date: today,
                        end_date,
                        original_price: Decimal::ZERO,
                        discounted_price: Decimal::ZERO,
                        discount_id: None,
                        prorated_price: None,
                        insurance_fee: Decimal::ZERO,
                        final_price: Decimal::ZERO,
                        is_upgrade: false,
                    })
                }
                UpgradePolicy::Reject => Err(PricingError::Validation(format!(
                    "cannot upgrade from {} to {}: target tier is not higher",
                    active.plan_name, target
                ))),
            };
        }

        let original_price = self.base_price(target, period)?;
        let discounted_price = apply_discount(original_price, discount)?;
        let remaining = days_remaining(active.end_date, today);
        let prorated_price = prorate(discounted_price, remaining, total)?;

        debug!(days_remaining = remaining, total_days = total, "upgrade prorated");

        Ok(PriceBreakdown {
            plan_name: target,
            period,
            start_date: today,
            end_date,
            original_price,
            discounted_price,
            discount_id: discount.map(|d| d.id().clone()),
            prorated_price: Some(prorated_price),
            insurance_fee: Decimal::ZERO,
            final_price: prorated_price,
            is_upgrade: true,
        })
    }
}
