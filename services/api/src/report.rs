use chrono::{Local, NaiveDate};
use clap::Args;
use retail_compliance::config::AppConfig;
use retail_compliance::error::AppError;
use retail_compliance::workflows::forecast::{ComplianceForecastResult, StoreRiskForecast};
use retail_compliance::workflows::obligations::{obligation_status, ObligationStatus};
use retail_compliance::workflows::register::SiteRegisterImporter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ForecastArgs {
    /// CSV site register to forecast
    #[arg(long)]
    pub(crate) sites: PathBuf,
    /// Evaluation date for the forecast (defaults to APP_FORECAST_DATE, then today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the forecast as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LifecycleArgs {
    /// Date the last fire risk assessment was completed (YYYY-MM-DD); omit if never completed
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) completed: Option<NaiveDate>,
    /// Evaluation date (defaults to APP_FORECAST_DATE, then today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_forecast_report(args: ForecastArgs) -> Result<(), AppError> {
    let ForecastArgs { sites, today, json } = args;

    let config = AppConfig::load()?;
    let register = SiteRegisterImporter::from_path(&sites)?;
    let result = register.forecast(today.or(config.forecast.reference_date));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in render_forecast(&result) {
            println!("{line}");
        }
    }

    Ok(())
}

pub(crate) fn run_lifecycle_check(args: LifecycleArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let today = args
        .today
        .or(config.forecast.reference_date)
        .unwrap_or_else(|| Local::now().date_naive());

    let status = obligation_status(args.completed, today);
    println!("{}", describe_obligation(&status, today));
    Ok(())
}

pub(crate) fn render_forecast(result: &ComplianceForecastResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Compliance risk forecast (evaluated {})",
            result.reference_date
        ),
        format!(
            "Sites: {} | High {} | Medium {} | Low {} | Average score {}",
            result.stores.len(),
            result.high_risk_count,
            result.medium_risk_count,
            result.low_risk_count,
            result.avg_risk_score
        ),
    ];

    if result.stores.is_empty() {
        lines.push("No sites in register".to_string());
        return lines;
    }

    lines.push(String::new());
    for store in &result.stores {
        lines.push(store_headline(store));
        for driver in &store.drivers {
            lines.push(format!("    * {driver}"));
        }
    }

    lines
}

fn store_headline(store: &StoreRiskForecast) -> String {
    let location = match (store.site_code.as_deref(), store.region.as_deref()) {
        (Some(code), Some(region)) => format!(" ({code}, {region})"),
        (Some(code), None) => format!(" ({code})"),
        (None, Some(region)) => format!(" ({region})"),
        (None, None) => String::new(),
    };
    let fra = match store.fra_due_date {
        Some(due) => format!("FRA {} (renewal {due})", store.fra_status.label()),
        None => format!("FRA {}", store.fra_status.label()),
    };
    let audit = match store.latest_audit_score {
        Some(score) => format!("audit {score:.0}%"),
        None => "no audit score".to_string(),
    };

    format!(
        "- [{} {}] {}{} | {} | {} | {} open incidents, {} overdue actions",
        store.risk_band.label(),
        store.risk_score,
        store.site_name,
        location,
        fra,
        audit,
        store.open_incidents,
        store.overdue_actions
    )
}

pub(crate) fn describe_obligation(status: &ObligationStatus, today: NaiveDate) -> String {
    match (status.next_due, status.days_until_due) {
        (Some(next_due), Some(days)) if days < 0 => format!(
            "Fire risk assessment: {} (renewal was due {next_due}, {} day(s) ago; evaluated {today})",
            status.state.label(),
            -days
        ),
        (Some(next_due), Some(days)) => format!(
            "Fire risk assessment: {} (renewal due {next_due}, in {days} day(s); evaluated {today})",
            status.state.label()
        ),
        _ => format!(
            "Fire risk assessment: {} (no completion on record; evaluated {today})",
            status.state.label()
        ),
    }
}
