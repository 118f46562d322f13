use super::domain::{
    ComplianceForecastResult, RiskBand, SiteComplianceRecord, SiteId, StoreRiskForecast,
};
use super::rules::{evaluate_rules, RiskAdjustment, SiteSignals, BASE_SCORE};
use crate::workflows::obligations::obligation_status;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

pub const MAX_DRIVERS: usize = 4;
pub const MAX_RISK_SCORE: u8 = 99;

/// Forecast every site against one reference date and summarise the estate.
///
/// `reference_date` defaults to the local current date, read once for the whole run.
/// Sites missing from either lookup map are treated as having a zero count.
pub fn compute_forecast(
    sites: &[SiteComplianceRecord],
    open_incidents: &HashMap<SiteId, u32>,
    overdue_actions: &HashMap<SiteId, u32>,
    reference_date: Option<NaiveDate>,
) -> ComplianceForecastResult {
    let today = reference_date.unwrap_or_else(|| Local::now().date_naive());

    let mut stores: Vec<StoreRiskForecast> = sites
        .iter()
        .map(|site| {
            forecast_site(
                site,
                open_incidents.get(&site.id).copied().unwrap_or(0),
                overdue_actions.get(&site.id).copied().unwrap_or(0),
                today,
            )
        })
        .collect();

    // `sort_by` is stable, so equal scores keep their input order.
    stores.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));

    let count_band = |band: RiskBand| stores.iter().filter(|store| store.risk_band == band).count();
    let high_risk_count = count_band(RiskBand::High);
    let medium_risk_count = count_band(RiskBand::Medium);
    let low_risk_count = count_band(RiskBand::Low);
    let avg_risk_score = average_score(&stores);

    debug!(
        %today,
        sites = stores.len(),
        high_risk_count,
        medium_risk_count,
        low_risk_count,
        avg_risk_score,
        "compliance forecast computed"
    );

    ComplianceForecastResult {
        reference_date: today,
        high_risk_count,
        medium_risk_count,
        low_risk_count,
        avg_risk_score,
        stores,
    }
}

pub fn forecast_site(
    site: &SiteComplianceRecord,
    open_incidents: u32,
    overdue_actions: u32,
    today: NaiveDate,
) -> StoreRiskForecast {
    let obligation = obligation_status(site.obligation_last_completed_date, today);
    let signals = SiteSignals::gather(site, &obligation, open_incidents, overdue_actions, today);
    let adjustments = evaluate_rules(&signals);

    let risk_score = clamp_score(&adjustments);
    let drivers = adjustments
        .iter()
        .filter_map(|adjustment| adjustment.driver.clone())
        .take(MAX_DRIVERS)
        .collect();

    StoreRiskForecast {
        site_id: site.id.clone(),
        site_name: site.name.clone(),
        site_code: site.code.clone(),
        region: site.region.clone(),
        risk_score,
        probability: risk_score,
        risk_band: RiskBand::from_score(risk_score),
        open_incidents,
        overdue_actions,
        fra_status: obligation.state,
        fra_due_date: obligation.next_due,
        latest_audit_score: signals.latest_audit_score,
        planned_date: site.planned_visit_date,
        drivers,
    }
}

fn clamp_score(adjustments: &[RiskAdjustment]) -> u8 {
    let total = adjustments
        .iter()
        .fold(BASE_SCORE, |acc, adjustment| acc + adjustment.delta);
    total.clamp(0.0, f64::from(MAX_RISK_SCORE)).round() as u8
}

fn average_score(stores: &[StoreRiskForecast]) -> u8 {
    if stores.is_empty() {
        return 0;
    }

    let total: u32 = stores.iter().map(|store| u32::from(store.risk_score)).sum();
    (f64::from(total) / stores.len() as f64).round() as u8
}
