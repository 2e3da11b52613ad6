//! End-to-end pricing scenarios for the membership subscription form.

use chrono::NaiveDate;
use gym_pricing::{
    ActiveSubscription, PricingEngine, PricingError, PricingRequest, SelectionForm,
    apply_discount,
    catalog::{BillingPeriod, PlanCatalog, PlanName},
    compute_end_date,
    config::{PricingConfig, UpgradePolicy},
    discount::{Discount, DiscountId},
    result::LineItemKind,
};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn engine() -> PricingEngine {
    PricingEngine::new(PlanCatalog::standard())
}

fn basic_january() -> ActiveSubscription {
    ActiveSubscription::new(
        PlanName::Basic,
        BillingPeriod::Monthly,
        date(2024, 1, 1),
        date(2024, 2, 1),
        Decimal::from(49),
    )
}

#[test]
fn test_new_member_basic_monthly() {
    let start = date(2024, 1, 1);
    let result = engine()
        .price_new_subscription(PlanName::Basic, BillingPeriod::Monthly, start, None, true)
        .expect("basic monthly is priced");

    assert_eq!(result.original_price, Decimal::from(49));
    assert_eq!(result.final_price, Decimal::from(99));
    assert!(!result.is_upgrade);
}

#[test]
fn test_percentage_discount_on_quarterly_price() {
    let discount =
        Discount::percentage(DiscountId::new("TEN").unwrap(), Decimal::from(10)).unwrap();
    assert_eq!(apply_discount(Decimal::from(132), Some(&discount)).unwrap(), Decimal::new(1188, 1));
}

#[test]
fn test_mid_period_upgrade_basic_to_premium() {
    let result = engine()
        .price_upgrade(
            &basic_january(),
            PlanName::Premium,
            BillingPeriod::Monthly,
            None,
            date(2024, 1, 16),
        )
        .expect("upgrade is priced");

    assert!(result.is_upgrade);
    assert_eq!(result.original_price, Decimal::from(89));
    assert_eq!(result.display_price(), Decimal::new(4594, 2));
    assert_eq!(result.end_date, date(2024, 2, 16));
}

#[test]
fn test_downgrade_is_zero_price() {
    let active = ActiveSubscription::new(
        PlanName::Premium,
        BillingPeriod::Monthly,
        date(2024, 1, 1),
        date(2024, 2, 1),
        Decimal::from(89),
    );
    let result = engine()
        .price_upgrade(&active, PlanName::Basic, BillingPeriod::Monthly, None, date(2024, 1, 16))
        .expect("downgrade yields a zero result");

    assert_eq!(result.final_price, Decimal::ZERO);
    assert!(!result.is_upgrade);
}

#[test]
fn test_jan_31_monthly_end_date() {
    assert_eq!(compute_end_date(date(2024, 1, 31), BillingPeriod::Monthly), date(2024, 2, 29));
}

#[test]
fn test_form_to_draft_with_config() {
    let config = PricingConfig::from_toml(
        r#"
        insurance_fee = "50"

        [[discounts]]
        code = "WELCOME20"
        id = "welcome-20"
        type = "fixed"
        value = "20"
        "#,
    )
    .expect("valid config");
    let engine = PricingEngine::from_config(&config).expect("valid catalog");
    let codes = config.discount_codes().expect("valid codes");

    let form = SelectionForm {
        plan_name: Some(PlanName::Elite),
        period: Some(BillingPeriod::Monthly),
        start_date: Some(date(2024, 5, 31)),
        discount_code: Some("welcome20".into()),
        is_new_user: true,
        active_subscription: None,
    };
    let request = form.into_request(&codes).expect("complete form");
    let draft = engine.draft(&request, date(2024, 5, 20)).expect("priced");

    assert_eq!(draft.original_price.to_string(), "129.00");
    assert_eq!(draft.price.to_string(), "159.00");
    assert_eq!(draft.start_date, date(2024, 5, 31));
    assert_eq!(draft.end_date, date(2024, 6, 30));
    assert_eq!(draft.discount_id.as_ref().map(DiscountId::as_str), Some("welcome-20"));

    let json = serde_json::to_value(&draft).expect("serializable");
    assert_eq!(json["plan_name"], "elite");
    assert_eq!(json["price"], "159.00");
    assert_eq!(json["is_upgrade"], false);
}

#[test]
fn test_order_summary_for_upgrade() {
    let discount =
        Discount::percentage(DiscountId::new("HALF").unwrap(), Decimal::from(50)).unwrap();
    let request = PricingRequest::new(PlanName::Elite, BillingPeriod::Monthly, date(2024, 1, 16))
        .with_discount(discount)
        .with_active_subscription(basic_january());

    let summary = engine().order_summary(&request, date(2024, 1, 16)).expect("priced");

    let kinds: Vec<_> = summary.lines.iter().map(|line| line.kind).collect();
    assert_eq!(kinds, vec![LineItemKind::Plan, LineItemKind::Discount, LineItemKind::Proration]);
    assert_eq!(summary.lines[0].amount, Decimal::from(129));
    assert_eq!(summary.lines[1].amount, Decimal::new(-6450, 2));
    // 64.5 * 16 / 31 = 33.290...
    assert_eq!(summary.total, Decimal::new(3329, 2));
    assert!(summary.is_upgrade);
}

#[test]
fn test_order_summary_adds_up_with_half_cent_discount() {
    let discount =
        Discount::percentage(DiscountId::new("EIGHTH").unwrap(), Decimal::new(125, 1)).unwrap();
    let request = PricingRequest::new(PlanName::Basic, BillingPeriod::Monthly, date(2024, 1, 1))
        .with_discount(discount)
        .new_user(true);

    let summary = engine().order_summary(&request, date(2024, 1, 1)).expect("priced");

    let amounts: Vec<_> = summary.lines.iter().map(|line| line.amount).collect();
    assert_eq!(amounts, vec![Decimal::from(49), Decimal::new(-612, 2), Decimal::from(50)]);
    assert_eq!(summary.total, Decimal::new(9288, 2));
    assert_eq!(amounts.into_iter().sum::<Decimal>(), summary.total);
}

#[test]
fn test_reject_policy_end_to_end() {
    let config = PricingConfig::from_toml(r#"upgrade_policy = "reject""#).expect("valid config");
    let engine = PricingEngine::from_config(&config).expect("valid catalog");
    assert_eq!(engine.upgrade_policy(), UpgradePolicy::Reject);

    let request = PricingRequest::new(PlanName::Basic, BillingPeriod::Monthly, date(2024, 1, 16))
        .with_active_subscription(basic_january());
    let err = engine.recompute(&request, date(2024, 1, 16)).unwrap_err();
    assert!(matches!(err, PricingError::Validation(_)));
}

#[test]
fn test_malformed_active_subscription_aborts() {
    let mut active = basic_january();
    active.end_date = date(2023, 12, 1);
    let request = PricingRequest::new(PlanName::Elite, BillingPeriod::Yearly, date(2024, 1, 16))
        .with_active_subscription(active);

    let err = engine().recompute(&request, date(2024, 1, 16)).unwrap_err();
    assert!(matches!(err, PricingError::InvalidSubscriptionState(_)));
}
