//! Site risk forecasting.
//!
//! Each site is scored by a fixed-order rule table over its audit, fire risk
//! assessment, corrective-action, incident and visit signals. The resulting
//! adjustments are folded into a score clamped to `0..=99`, banded, and
//! explained by the first few driver texts in rule order.

mod domain;
mod engine;
mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditRound, ComplianceForecastResult, RiskBand, SiteComplianceRecord, SiteId,
    StoreRiskForecast,
};
pub use engine::{compute_forecast, forecast_site, MAX_DRIVERS, MAX_RISK_SCORE};
pub use rules::{evaluate_rules, RiskAdjustment, SiteSignals};
