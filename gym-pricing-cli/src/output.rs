//! Output formatting for quotes and the price list.

use std::fmt::Write as _;

use clap::ValueEnum;
use gym_pricing::{
    OrderSummary, SubscriptionDraft,
    catalog::{BillingPeriod, CatalogProvider, PlanName},
    result::round_currency,
};
use serde::Serialize;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Renders serializable data as pretty JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Renders the subscription record as text.
pub fn draft_text(draft: &SubscriptionDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {} ({})", "Plan:", draft.plan_name, draft.period);
    let _ = writeln!(out, "{:<10} {}", "Start:", draft.start_date);
    let _ = writeln!(out, "{:<10} {}", "End:", draft.end_date);
    let _ = writeln!(out, "{:<10} {}", "Upgrade:", if draft.is_upgrade { "yes" } else { "no" });
    if let Some(id) = &draft.discount_id {
        let _ = writeln!(out, "{:<10} {}", "Discount:", id.as_str());
    }
    let _ = writeln!(out, "{:<10} {:>10}", "Original:", draft.original_price);
    let _ = write!(out, "{:<10} {:>10}", "Price:", draft.price);
    out
}

/// Renders the order summary as text.
pub fn summary_text(summary: &OrderSummary) -> String {
    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(out, "{:<36} {:>10}", line.description, line.amount);
    }
    let _ = writeln!(out, "{}", "-".repeat(47));
    let _ = write!(out, "{:<36} {:>10}", "Total", summary.total);
    out
}

#[derive(Serialize)]
struct PriceRow {
    plan: PlanName,
    tier: u8,
    period: BillingPeriod,
    base_price: rust_decimal::Decimal,
}

fn price_rows(catalog: &impl CatalogProvider) -> Vec<PriceRow> {
    PlanName::ALL
        .into_iter()
        .flat_map(|plan| BillingPeriod::ALL.into_iter().map(move |period| (plan, period)))
        .filter_map(|(plan, period)| catalog.lookup(plan, period))
        .map(|entry| PriceRow {
            plan: entry.name,
            tier: entry.tier.get(),
            period: entry.period,
            base_price: round_currency(entry.base_price),
        })
        .collect()
}

/// Renders the price list in the requested format.
pub fn catalog(
    catalog: &impl CatalogProvider,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    let rows = price_rows(catalog);
    match format {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Text => {
            let mut out = format!("{:<10} {:>4} {:<10} {:>10}", "PLAN", "TIER", "PERIOD", "PRICE");
            for row in rows {
                let _ = write!(
                    out,
                    "\n{:<10} {:>4} {:<10} {:>10}",
                    row.plan, row.tier, row.period, row.base_price
                );
            }
            Ok(out)
        }
    }
}
