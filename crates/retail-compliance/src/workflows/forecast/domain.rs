use crate::workflows::dates::deserialize_lenient_date;
use crate::workflows::obligations::LifecycleState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One audit round as recorded against a site. Either half may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AuditRound {
    pub date: Option<NaiveDate>,
    pub score_pct: Option<f64>,
}

impl AuditRound {
    /// A round only carries a usable score when both its date and score are present.
    pub fn scored(&self) -> Option<(NaiveDate, f64)> {
        match (self.date, self.score_pct) {
            (Some(date), Some(score)) => Some((date, score)),
            _ => None,
        }
    }
}

/// Snapshot of everything the forecast needs to know about a single site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteComplianceRecord {
    pub id: SiteId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub latest_audit_date_1: Option<NaiveDate>,
    #[serde(default)]
    pub latest_audit_score_pct_1: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub latest_audit_date_2: Option<NaiveDate>,
    #[serde(default)]
    pub latest_audit_score_pct_2: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub obligation_last_completed_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub planned_visit_date: Option<NaiveDate>,
}

impl SiteComplianceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SiteId::new(id),
            name: name.into(),
            code: None,
            region: None,
            latest_audit_date_1: None,
            latest_audit_score_pct_1: None,
            latest_audit_date_2: None,
            latest_audit_score_pct_2: None,
            obligation_last_completed_date: None,
            planned_visit_date: None,
        }
    }

    pub fn audit_rounds(&self) -> [AuditRound; 2] {
        [
            AuditRound {
                date: self.latest_audit_date_1,
                score_pct: self.latest_audit_score_pct_1,
            },
            AuditRound {
                date: self.latest_audit_date_2,
                score_pct: self.latest_audit_score_pct_2,
            },
        ]
    }

    /// Score of the most recently dated round that has both a date and a score.
    ///
    /// When both rounds share a date the first round wins.
    pub fn latest_audit_score(&self) -> Option<f64> {
        self.audit_rounds()
            .iter()
            .filter_map(AuditRound::scored)
            .fold(None, |latest: Option<(NaiveDate, f64)>, candidate| match latest {
                Some((date, _)) if candidate.0 <= date => latest,
                _ => Some(candidate),
            })
            .map(|(_, score)| score)
    }

    /// Latest audit date across both rounds, whether or not the round was scored.
    pub fn most_recent_audit_date(&self) -> Option<NaiveDate> {
        self.audit_rounds()
            .iter()
            .filter_map(|round| round.date)
            .max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const HIGH_THRESHOLD: u8 = 70;
    pub const MEDIUM_THRESHOLD: u8 = 45;

    pub const fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Forecast for one site. `risk_score` and `probability` always carry the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRiskForecast {
    pub site_id: SiteId,
    pub site_name: String,
    pub site_code: Option<String>,
    pub region: Option<String>,
    pub risk_score: u8,
    pub probability: u8,
    pub risk_band: RiskBand,
    pub open_incidents: u32,
    pub overdue_actions: u32,
    pub fra_status: LifecycleState,
    pub fra_due_date: Option<NaiveDate>,
    pub latest_audit_score: Option<f64>,
    pub planned_date: Option<NaiveDate>,
    pub drivers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceForecastResult {
    pub reference_date: NaiveDate,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub avg_risk_score: u8,
    pub stores: Vec<StoreRiskForecast>,
}
