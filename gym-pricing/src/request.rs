//! Pricing inputs.
//!
//! A [`PricingRequest`] is an immutable snapshot of the subscription form. The
//! caller builds a new one after every field change and hands it to
//! [`PricingEngine::recompute`](crate::engine::PricingEngine::recompute).
//! [`SelectionForm`] holds the raw, possibly incomplete form state and turns
//! it into a request once the required fields are filled in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{BillingPeriod, PlanName, Tier},
    discount::{Discount, DiscountLookup},
    error::{PricingError, Result},
};

/// A member's currently active plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSubscription {
    /// Plan the member is on.
    pub plan_name: PlanName,
    /// Billing period of the active subscription.
    pub period: BillingPeriod,
    /// First day of the active period.
    pub start_date: NaiveDate,
    /// Day the active period ends.
    pub end_date: NaiveDate,
    /// Amount that was charged for the active period.
    pub price: Decimal,
}

impl ActiveSubscription {
    /// Creates an active subscription record.
    #[must_use]
    pub fn new(
        plan_name: PlanName,
        period: BillingPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
        price: Decimal,
    ) -> Self {
        Self { plan_name, period, start_date, end_date, price }
    }

    /// Rank of the active plan, always derived from [`plan_name`](Self::plan_name).
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.plan_name.tier()
    }
}

/// Complete set of inputs for one pricing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Selected (target) plan.
    pub plan_name: PlanName,
    /// Selected billing period.
    pub period: BillingPeriod,
    /// Requested start of a new subscription. Upgrades start on the pricing
    /// date instead.
    pub start_date: NaiveDate,
    /// Discount to apply, already resolved from its code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// Whether the member has never held a subscription.
    #[serde(default)]
    pub is_new_user: bool,
    /// Current subscription when the request is an upgrade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_subscription: Option<ActiveSubscription>,
}

impl PricingRequest {
    /// Creates a request for a returning member with no discount.
    #[must_use]
    pub fn new(plan_name: PlanName, period: BillingPeriod, start_date: NaiveDate) -> Self {
        Self {
            plan_name,
            period,
            start_date,
            discount: None,
            is_new_user: false,
            active_subscription: None,
        }
    }

    /// Sets the discount.
    #[must_use]
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Marks the member as first-time subscriber.
    #[must_use]
    pub fn new_user(mut self, is_new_user: bool) -> Self {
        self.is_new_user = is_new_user;
        self
    }

    /// Attaches the member's active subscription, turning this into an upgrade.
    #[must_use]
    pub fn with_active_subscription(mut self, active: ActiveSubscription) -> Self {
        self.active_subscription = Some(active);
        self
    }
}

/// Raw state of the subscription form.
///
/// Every field may still be empty while the user is filling it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionForm {
    /// Chosen plan.
    pub plan_name: Option<PlanName>,
    /// Chosen billing period.
    pub period: Option<BillingPeriod>,
    /// Chosen start date.
    pub start_date: Option<NaiveDate>,
    /// Discount code as typed.
    pub discount_code: Option<String>,
    /// Whether the member has never held a subscription.
    #[serde(default)]
    pub is_new_user: bool,
    /// Member's current subscription, if any.
    pub active_subscription: Option<ActiveSubscription>,
}

impl SelectionForm {
    /// Validates the form and resolves the discount code.
    ///
    /// A blank discount code is treated as no code.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] if the plan, period or start date
    /// is missing, or if a non-blank discount code is not redeemable.
    pub fn into_request<L>(self, discounts: &L) -> Result<PricingRequest>
    where
        L: DiscountLookup + ?Sized,
    {
        let plan_name = self
            .plan_name
            .ok_or_else(|| PricingError::Validation("a plan must be selected".into()))?;
        let period = self
            .period
            .ok_or_else(|| PricingError::Validation("a billing period must be selected".into()))?;
        let start_date = self
            .start_date
            .ok_or_else(|| PricingError::Validation("a start date must be selected".into()))?;

        let discount = match self.discount_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(discounts.find(code).ok_or_else(|| {
                PricingError::Validation(format!("discount code '{code}' is not valid"))
            })?),
        };

        Ok(PricingRequest {
            plan_name,
            period,
            start_date,
            discount,
            is_new_user: self.is_new_user,
            active_subscription: self.active_subscription,
        })
    }
}
