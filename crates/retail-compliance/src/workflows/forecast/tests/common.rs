use crate::workflows::forecast::{SiteComplianceRecord, SiteId};
use chrono::{Duration, Months, NaiveDate};
use std::collections::HashMap;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Fixed evaluation date; 15 July so that "one month later" is 31 days away.
pub(super) fn today() -> NaiveDate {
    date(2025, 7, 15)
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn days_ahead(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub(super) fn months_ago(months: u32) -> NaiveDate {
    today()
        .checked_sub_months(Months::new(months))
        .expect("valid month offset")
}

pub(super) fn bare_site(id: &str) -> SiteComplianceRecord {
    SiteComplianceRecord::new(id, format!("Store {id}"))
}

/// Site with a comfortable audit long ago and an in-date assessment, so it carries only the base score.
pub(super) fn baseline_site(id: &str) -> SiteComplianceRecord {
    let mut site = bare_site(id);
    site.latest_audit_date_1 = Some(days_ago(120));
    site.latest_audit_score_pct_1 = Some(95.0);
    site.obligation_last_completed_date = Some(months_ago(6));
    site
}

pub(super) fn counts(entries: &[(&str, u32)]) -> HashMap<SiteId, u32> {
    entries
        .iter()
        .map(|(id, count)| (SiteId::new(*id), *count))
        .collect()
}

pub(super) fn no_counts() -> HashMap<SiteId, u32> {
    HashMap::new()
}
