//! Gym Pricing: Subscription Pricing for Gym Memberships
//!
//! A pure-computation library that prices gym membership subscriptions:
//! tiered plans, percentage and fixed discounts, a one-time insurance fee for
//! first-time members, and prorated upgrades from an active subscription.
//!
//! # What is Gym Pricing?
//!
//! The membership front-end rebuilds its price preview every time a field on
//! the subscription form changes. This crate is the logic behind that preview:
//!
//! - **Deterministic**: the same [`PricingRequest`] always yields the same result
//! - **Decimal money**: [`rust_decimal::Decimal`] throughout, rounded to cents
//!   only when leaving the engine
//! - **Explicit errors**: catalog gaps, malformed subscriptions and incomplete
//!   forms are reported, never papered over
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Subscription form│  plan, period, date, discount code, member history
//! └────────┬─────────┘
//!          │ SelectionForm::into_request (validation, code lookup)
//! ┌────────▼─────────────────────────────────────────────┐
//! │               PricingEngine (this crate)             │
//! │  ┌──────────┐  ┌──────────┐  ┌────────┐  ┌─────────┐ │
//! │  │ catalog  │  │ discount │  │ period │  │proration│ │
//! │  └──────────┘  └──────────┘  └────────┘  └─────────┘ │
//! └────────┬─────────────────────────────────────────────┘
//!          │ PricingResult / OrderSummary / SubscriptionDraft
//! ┌────────▼─────────┐
//! │ Subscription store│  persistence and payment, outside this crate
//! └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Price a New Membership
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use gym_pricing::{
//!     PricingEngine, PricingRequest,
//!     catalog::{BillingPeriod, PlanCatalog, PlanName},
//! };
//!
//! # fn example() -> gym_pricing::error::Result<()> {
//! let engine = PricingEngine::new(PlanCatalog::standard());
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! let request = PricingRequest::new(PlanName::Basic, BillingPeriod::Monthly, start)
//!     .new_user(true);
//! let result = engine.recompute(&request, start)?;
//!
//! assert_eq!(result.final_price, Decimal::from(99)); // 49 + 50 insurance
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Price an Upgrade
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use gym_pricing::{
//!     ActiveSubscription, PricingEngine, PricingRequest,
//!     catalog::{BillingPeriod, PlanCatalog, PlanName},
//! };
//!
//! # fn example() -> gym_pricing::error::Result<()> {
//! let engine = PricingEngine::new(PlanCatalog::standard());
//! let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
//!
//! let active = ActiveSubscription::new(
//!     PlanName::Basic,
//!     BillingPeriod::Monthly,
//!     day(1, 1),
//!     day(2, 1),
//!     Decimal::from(49),
//! );
//! let request = PricingRequest::new(PlanName::Premium, BillingPeriod::Monthly, day(1, 16))
//!     .with_active_subscription(active);
//!
//! let result = engine.recompute(&request, day(1, 16))?;
//! assert!(result.is_upgrade);
//! assert_eq!(result.display_price(), Decimal::new(4594, 2)); // 89 * 16 / 31
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Validate a Form and Build the Subscription Record
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gym_pricing::{
//!     PricingEngine, SelectionForm,
//!     catalog::{BillingPeriod, PlanName},
//!     config::PricingConfig,
//! };
//!
//! # fn example() -> gym_pricing::error::Result<()> {
//! let config = PricingConfig::from_toml(
//!     r#"
//!     [[discounts]]
//!     code = "SPRING10"
//!     id = "spring-10"
//!     type = "percentage"
//!     value = "10"
//!     "#,
//! )?;
//! let engine = PricingEngine::from_config(&config)?;
//! let codes = config.discount_codes()?;
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!
//! let form = SelectionForm {
//!     plan_name: Some(PlanName::Basic),
//!     period: Some(BillingPeriod::Quarterly),
//!     start_date: Some(today),
//!     discount_code: Some("spring10".to_owned()),
//!     ..SelectionForm::default()
//! };
//! let draft = engine.draft(&form.into_request(&codes)?, today)?;
//! assert_eq!(draft.price.to_string(), "118.80");
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`catalog`]: plans, tiers, billing periods and base prices
//! - [`discount`]: discount records, code lookup and [`apply_discount`]
//! - [`period`]: subscription end dates and the month-rollover rule
//! - [`proration`]: day counting and prorated charges
//! - [`request`]: pricing inputs and form validation
//! - [`result`]: pricing outputs, order summary and presentation rounding
//! - [`engine`]: [`PricingEngine`], the single entry point
//! - [`config`]: TOML configuration
//! - [`error`]: error taxonomy
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PricingError>`](error::Result).
//! A calculation either fully succeeds or fails; there are no partial results.

pub mod catalog;
pub mod config;
pub mod discount;
pub mod engine;
pub mod error;
pub mod period;
pub mod proration;
pub mod request;
pub mod result;

pub use discount::apply_discount;
pub use engine::PricingEngine;
pub use error::{PricingError, Result};
pub use period::compute_end_date;
pub use request::{ActiveSubscription, PricingRequest, SelectionForm};
pub use result::{OrderSummary, PricingResult, SubscriptionDraft};
