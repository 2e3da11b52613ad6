//! Gym Pricing CLI
//!
//! Command-line front-end for the subscription pricing engine.
//!
//! # Usage
//!
//! ```bash
//! gym-pricing catalog
//! gym-pricing quote --plan basic --period monthly --start-date 2024-01-01 --new-user
//! gym-pricing quote --plan premium --period monthly --start-date 2024-01-16 \
//!     --active-plan basic --active-start 2024-01-01 --active-end 2024-02-01 \
//!     --today 2024-01-16 --summary
//! gym-pricing --config pricing.toml --format json quote --plan elite --period yearly \
//!     --start-date 2024-06-01 --discount-code SPRING10
//! ```

use std::{path::PathBuf, process::ExitCode};

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use gym_pricing::{
    ActiveSubscription, PricingEngine, SelectionForm,
    catalog::{BillingPeriod, CatalogProvider, PlanName},
    config::PricingConfig,
};
use rust_decimal::Decimal;
use tracing::{error, info};

mod error;
mod observability;
mod output;

use error::Result;
use observability::{LogFormat, init_observability};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "gym-pricing")]
#[command(version)]
#[command(about = "Price gym membership subscriptions", long_about = None)]
struct Cli {
    /// Pricing configuration file (TOML)
    #[arg(long, short, env = "GYM_PRICING_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plan price list
    Catalog,
    /// Price a new subscription or an upgrade
    Quote(QuoteArgs),
}

#[derive(Args)]
struct QuoteArgs {
    /// Target plan (basic, premium, elite)
    #[arg(long)]
    plan: Option<PlanName>,

    /// Billing period (monthly, quarterly, yearly)
    #[arg(long)]
    period: Option<BillingPeriod>,

    /// Subscription start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Discount code
    #[arg(long)]
    discount_code: Option<String>,

    /// Member has never held a subscription
    #[arg(long)]
    new_user: bool,

    /// Pricing date, defaults to the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the itemised order summary instead of the subscription record
    #[arg(long)]
    summary: bool,

    #[command(flatten)]
    active: ActiveArgs,
}

#[derive(Args)]
struct ActiveArgs {
    /// Plan of the member's active subscription
    #[arg(long, requires_all = ["active_start", "active_end"])]
    active_plan: Option<PlanName>,

    /// Billing period of the active subscription
    #[arg(long, default_value = "monthly")]
    active_period: BillingPeriod,

    /// Start date of the active subscription
    #[arg(long, requires = "active_plan")]
    active_start: Option<NaiveDate>,

    /// End date of the active subscription
    #[arg(long, requires = "active_plan")]
    active_end: Option<NaiveDate>,

    /// Price paid for the active subscription, defaults to its catalog price
    #[arg(long, requires = "active_plan")]
    active_price: Option<Decimal>,
}

impl ActiveArgs {
    fn into_subscription(
        self,
        catalog: &impl CatalogProvider,
    ) -> gym_pricing::Result<Option<ActiveSubscription>> {
        let (Some(plan), Some(start), Some(end)) =
            (self.active_plan, self.active_start, self.active_end)
        else {
            return Ok(None);
        };
        let price = match self.active_price {
            Some(price) => price,
            None => catalog.require(plan, self.active_period)?.base_price,
        };
        Ok(Some(ActiveSubscription::new(plan, self.active_period, start, end, price)))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env(), cli.verbose);

    match run(cli) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "pricing failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading pricing configuration");
            PricingConfig::from_file(path)?
        }
        None => PricingConfig::default(),
    };
    let engine = PricingEngine::from_config(&config)?;

    match cli.command {
        Command::Catalog => Ok(output::catalog(engine.catalog(), cli.format)?),
        Command::Quote(args) => quote(&engine, &config, args, cli.format),
    }
}

fn quote(
    engine: &PricingEngine,
    config: &PricingConfig,
    args: QuoteArgs,
    format: OutputFormat,
) -> Result<String> {
    let codes = config.discount_codes()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let form = SelectionForm {
        plan_name: args.plan,
        period: args.period,
        start_date: args.start_date,
        discount_code: args.discount_code,
        is_new_user: args.new_user,
        active_subscription: args.active.into_subscription(engine.catalog())?,
    };
    let request = form.into_request(&codes)?;

    let rendered = match (args.summary, format) {
        (true, OutputFormat::Text) => output::summary_text(&engine.order_summary(&request, today)?),
        (true, OutputFormat::Json) => output::to_json(&engine.order_summary(&request, today)?)?,
        (false, OutputFormat::Text) => output::draft_text(&engine.draft(&request, today)?),
        (false, OutputFormat::Json) => output::to_json(&engine.draft(&request, today)?)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use gym_pricing::PricingError;

    use super::*;
    use crate::error::CliError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gym-pricing").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_quote_new_member() {
        let cli = parse(&[
            "quote",
            "--plan",
            "basic",
            "--period",
            "monthly",
            "--start-date",
            "2024-01-01",
            "--new-user",
            "--today",
            "2024-01-01",
        ]);
        let rendered = run(cli).unwrap();
        assert!(rendered.contains("99.00"));
    }

    #[test]
    fn test_quote_upgrade_json() {
        let cli = parse(&[
            "--format",
            "json",
            "quote",
            "--plan",
            "premium",
            "--period",
            "monthly",
            "--start-date",
            "2024-01-16",
            "--active-plan",
            "basic",
            "--active-start",
            "2024-01-01",
            "--active-end",
            "2024-02-01",
            "--today",
            "2024-01-16",
        ]);
        let json: serde_json::Value = serde_json::from_str(&run(cli).unwrap()).unwrap();
        assert_eq!(json["price"], "45.94");
        assert_eq!(json["is_upgrade"], true);
    }

    #[test]
    fn test_quote_missing_plan_is_validation_error() {
        let cli = parse(&["quote", "--period", "monthly", "--start-date", "2024-01-01"]);
        assert!(matches!(run(cli), Err(CliError::Pricing(PricingError::Validation(_)))));
    }

    #[test]
    fn test_active_plan_requires_dates() {
        let result = Cli::try_parse_from([
            "gym-pricing",
            "quote",
            "--plan",
            "elite",
            "--active-plan",
            "basic",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_flag_counts() {
        assert_eq!(parse(&["catalog"]).verbose, 0);
        assert_eq!(parse(&["-vv", "catalog"]).verbose, 2);
        assert_eq!(parse(&["catalog", "--verbose"]).verbose, 1);
    }

    #[test]
    fn test_catalog_command() {
        let rendered = run(parse(&["catalog"])).unwrap();
        assert!(rendered.contains("elite"));
    }
}
