//! Pricing outputs.
//!
//! Amounts keep full decimal precision until they leave the engine through
//! [`PricingResult::display_price`], [`SubscriptionDraft`] or
//! [`OrderSummary`], which round to cents.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{BillingPeriod, PlanName},
    discount::DiscountId,
};

/// Decimal places used for presented amounts.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Rounds an amount to cents, half away from zero.
///
/// The result always carries exactly two decimal places, so `132` renders as
/// `132.00`.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMALS);
    rounded
}

/// Outcome of one pricing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Catalog price of the selected plan and period.
    pub original_price: Decimal,
    /// Amount to charge, at full precision.
    pub final_price: Decimal,
    /// Day the new subscription ends.
    pub end_date: NaiveDate,
    /// Whether this is a prorated upgrade of an active subscription.
    pub is_upgrade: bool,
}

impl PricingResult {
    /// Final price rounded for display.
    #[must_use]
    pub fn display_price(&self) -> Decimal {
        round_currency(self.final_price)
    }
}

/// Every intermediate amount of a calculation.
///
/// Produced by [`PricingEngine::quote`](crate::engine::PricingEngine::quote);
/// [`PricingResult`], [`OrderSummary`] and [`SubscriptionDraft`] are views
/// over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Target plan.
    pub plan_name: PlanName,
    /// Target billing period.
    pub period: BillingPeriod,
    /// First day of the new subscription.
    pub start_date: NaiveDate,
    /// Last day of the new subscription.
    pub end_date: NaiveDate,
    /// Catalog price.
    pub original_price: Decimal,
    /// Price after the discount.
    pub discounted_price: Decimal,
    /// Discount that was applied, if any.
    pub discount_id: Option<DiscountId>,
    /// Prorated charge, for upgrades.
    pub prorated_price: Option<Decimal>,
    /// Insurance fee added for first-time members.
    pub insurance_fee: Decimal,
    /// Amount to charge.
    pub final_price: Decimal,
    /// Whether this is a prorated upgrade.
    pub is_upgrade: bool,
}

impl PriceBreakdown {
    /// Condenses the breakdown into the four result fields.
    #[must_use]
    pub fn result(&self) -> PricingResult {
        PricingResult {
            original_price: self.original_price,
            final_price: self.final_price,
            end_date: self.end_date,
            is_upgrade: self.is_upgrade,
        }
    }

    /// Builds the record sent to the subscription store.
    #[must_use]
    pub fn draft(&self) -> SubscriptionDraft {
        SubscriptionDraft {
            plan_name: self.plan_name,
            period: self.period,
            original_price: round_currency(self.original_price),
            price: round_currency(self.final_price),
            start_date: self.start_date,
            end_date: self.end_date,
            is_upgrade: self.is_upgrade,
            discount_id: self.discount_id.clone(),
        }
    }

    /// Itemises the calculation for the order summary.
    ///
    /// Each line is the difference between consecutive running amounts
    /// rounded to cents, so the lines always add up to `total`.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        let total = round_currency(self.final_price);
        let mut running = round_currency(self.original_price);
        let mut lines = vec![LineItem {
            kind: LineItemKind::Plan,
            description: format!("{} membership ({})", self.plan_name, self.period),
            amount: running,
        }];

        let discounted = round_currency(self.discounted_price);
        if discounted != running {
            let description = match &self.discount_id {
                Some(id) => format!("Discount {}", id.as_str()),
                None => "Discount".to_owned(),
            };
            lines.push(LineItem {
                kind: LineItemKind::Discount,
                description,
                amount: discounted - running,
            });
            running = discounted;
        }

        if let Some(prorated) = self.prorated_price {
            let prorated = round_currency(prorated);
            lines.push(LineItem {
                kind: LineItemKind::Proration,
                description: "Credit for time already paid".to_owned(),
                amount: prorated - running,
            });
            running = prorated;
        }

        if !self.insurance_fee.is_zero() {
            lines.push(LineItem {
                kind: LineItemKind::InsuranceFee,
                description: "One-time insurance fee".to_owned(),
                amount: total - running,
            });
        } else if let Some(last) = lines.last_mut() {
            // Zero unless the breakdown was assembled by hand inconsistently.
            last.amount += total - running;
        }

        OrderSummary {
            lines,
            total,
            start_date: self.start_date,
            end_date: self.end_date,
            is_upgrade: self.is_upgrade,
        }
    }
}

/// Subscription creation record handed to the persistence layer.
///
/// Prices are rounded to cents here and nowhere earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    /// Target plan.
    pub plan_name: PlanName,
    /// Billing period.
    pub period: BillingPeriod,
    /// Catalog price.
    pub original_price: Decimal,
    /// Amount charged.
    pub price: Decimal,
    /// First day of the subscription.
    pub start_date: NaiveDate,
    /// Last day of the subscription.
    pub end_date: NaiveDate,
    /// Whether the subscription replaces a lower-tier one.
    pub is_upgrade: bool,
    /// Applied discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_id: Option<DiscountId>,
}

/// Kind of an order summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// Catalog price of the plan.
    Plan,
    /// Discount reduction (negative).
    Discount,
    /// Proration adjustment for upgrades (negative or zero).
    Proration,
    /// First-time member insurance fee.
    InsuranceFee,
}

/// Single line in the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line kind.
    pub kind: LineItemKind,
    /// Human-readable description.
    pub description: String,
    /// Signed amount, rounded to cents.
    pub amount: Decimal,
}

/// Itemised price shown before the member confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Breakdown lines in display order.
    pub lines: Vec<LineItem>,
    /// Amount to charge, rounded to cents.
    pub total: Decimal,
    /// First day of the subscription.
    pub start_date: NaiveDate,
    /// Last day of the subscription.
    pub end_date: NaiveDate,
    /// Whether this is an upgrade.
    pub is_upgrade: bool,
}
