use super::domain::SiteComplianceRecord;
use crate::workflows::obligations::{LifecycleState, ObligationStatus};
use chrono::NaiveDate;

pub(crate) const BASE_SCORE: f64 = 15.0;
pub(crate) const AUDIT_PASS_MARK: f64 = 80.0;
const AUDIT_COMFORT_MARK: f64 = 85.0;
const PLANNED_VISIT_WINDOW_DAYS: i64 = 14;
const RECENT_AUDIT_WINDOW_DAYS: i64 = 30;

/// Signals for one site, gathered once against a single reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSignals {
    pub latest_audit_score: Option<f64>,
    pub lifecycle: LifecycleState,
    pub overdue_actions: u32,
    pub open_incidents: u32,
    pub days_until_visit: Option<i64>,
    pub days_since_audit: Option<i64>,
}

impl SiteSignals {
    pub fn gather(
        site: &SiteComplianceRecord,
        obligation: &ObligationStatus,
        open_incidents: u32,
        overdue_actions: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            latest_audit_score: site.latest_audit_score(),
            lifecycle: obligation.state,
            overdue_actions,
            open_incidents,
            days_until_visit: site
                .planned_visit_date
                .map(|planned| (planned - today).num_days()),
            days_since_audit: site
                .most_recent_audit_date()
                .map(|audited| (today - audited).num_days()),
        }
    }
}

/// Contribution of a single rule to a site's risk score.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAdjustment {
    pub delta: f64,
    pub driver: Option<String>,
}

impl RiskAdjustment {
    fn new(delta: f64, driver: impl Into<String>) -> Self {
        Self {
            delta,
            driver: Some(driver.into()),
        }
    }
}

pub(crate) type RiskRule = fn(&SiteSignals) -> Option<RiskAdjustment>;

/// Evaluation order is significant: drivers are reported in this order and truncated.
pub(crate) const RISK_RULES: [RiskRule; 6] = [
    audit_score_rule,
    obligation_rule,
    overdue_actions_rule,
    open_incidents_rule,
    planned_visit_rule,
    recent_strong_audit_rule,
];

pub fn evaluate_rules(signals: &SiteSignals) -> Vec<RiskAdjustment> {
    RISK_RULES
        .iter()
        .filter_map(|rule| rule(signals))
        .collect()
}

pub(crate) fn audit_score_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    match signals.latest_audit_score {
        None => Some(RiskAdjustment::new(25.0, "No recent audit score recorded")),
        Some(score) if score < AUDIT_PASS_MARK => {
            let shortfall = ((AUDIT_PASS_MARK - score) * 0.7).min(18.0);
            Some(RiskAdjustment::new(
                28.0 + shortfall,
                format!(
                    "Latest audit score {}% is below the {}% pass mark",
                    format_pct(score),
                    AUDIT_PASS_MARK
                ),
            ))
        }
        Some(score) if score < AUDIT_COMFORT_MARK => Some(RiskAdjustment::new(
            8.0,
            format!(
                "Latest audit score {}% is only narrowly above the {}% pass mark",
                format_pct(score),
                AUDIT_PASS_MARK
            ),
        )),
        Some(_) => None,
    }
}

pub(crate) fn obligation_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    match signals.lifecycle {
        LifecycleState::Overdue => Some(RiskAdjustment::new(30.0, "obligation is overdue")),
        LifecycleState::Required => {
            Some(RiskAdjustment::new(24.0, "no in-date obligation recorded"))
        }
        LifecycleState::Due => Some(RiskAdjustment::new(
            12.0,
            "obligation expires within 30 days",
        )),
        LifecycleState::UpToDate => None,
    }
}

pub(crate) fn overdue_actions_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    let count = signals.overdue_actions;
    if count == 0 {
        return None;
    }

    Some(RiskAdjustment::new(
        (f64::from(count) * 7.0).min(28.0),
        format!("{count} overdue action{}", plural(count)),
    ))
}

pub(crate) fn open_incidents_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    let count = signals.open_incidents;
    if count == 0 {
        return None;
    }

    Some(RiskAdjustment::new(
        (f64::from(count) * 6.0).min(24.0),
        format!("{count} open incident{}", plural(count)),
    ))
}

pub(crate) fn planned_visit_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    let days = signals.days_until_visit?;
    if !(0..=PLANNED_VISIT_WINDOW_DAYS).contains(&days) {
        return None;
    }

    Some(RiskAdjustment::new(
        -10.0,
        "planned compliance visit scheduled within 14 days",
    ))
}

/// Recency comes from the latest dated round, which need not be the round the score came from.
pub(crate) fn recent_strong_audit_rule(signals: &SiteSignals) -> Option<RiskAdjustment> {
    let score = signals.latest_audit_score?;
    let days = signals.days_since_audit?;
    if score < AUDIT_PASS_MARK || !(0..=RECENT_AUDIT_WINDOW_DAYS).contains(&days) {
        return None;
    }

    Some(RiskAdjustment::new(-8.0, "strong recent audit completion"))
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn format_pct(score: f64) -> String {
    let rounded = (score * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

#[cfg(test)]
pub(crate) fn format_pct_for_tests(score: f64) -> String {
    format_pct(score)
}
