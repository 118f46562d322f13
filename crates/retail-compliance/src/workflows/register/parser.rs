use crate::workflows::dates::parse_calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::debug;

/// One register row after trimming, before it is promoted to a site record.
#[derive(Debug)]
pub(crate) struct RegisterRow {
    pub(crate) site_id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) code: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) audit_date_1: Option<NaiveDate>,
    pub(crate) audit_score_1: Option<f64>,
    pub(crate) audit_date_2: Option<NaiveDate>,
    pub(crate) audit_score_2: Option<f64>,
    pub(crate) fra_completed: Option<NaiveDate>,
    pub(crate) planned_visit: Option<NaiveDate>,
    pub(crate) open_incidents: u32,
    pub(crate) overdue_actions: u32,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RegisterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawRegisterRow>().enumerate() {
        let raw = record?;
        // Header is line 1.
        let line = index + 2;

        rows.push(RegisterRow {
            site_id: raw.site_id,
            name: raw.name,
            code: raw.code,
            region: raw.region,
            audit_date_1: date_cell(raw.audit_date_1.as_deref(), "Audit 1 Date", line),
            audit_score_1: score_cell(raw.audit_score_1.as_deref(), "Audit 1 Score", line),
            audit_date_2: date_cell(raw.audit_date_2.as_deref(), "Audit 2 Date", line),
            audit_score_2: score_cell(raw.audit_score_2.as_deref(), "Audit 2 Score", line),
            fra_completed: date_cell(raw.fra_completed.as_deref(), "FRA Completed", line),
            planned_visit: date_cell(raw.planned_visit.as_deref(), "Planned Visit", line),
            open_incidents: count_cell(raw.open_incidents.as_deref()),
            overdue_actions: count_cell(raw.overdue_actions.as_deref()),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRegisterRow {
    #[serde(rename = "Site ID", default, deserialize_with = "empty_string_as_none")]
    site_id: Option<String>,
    #[serde(rename = "Site Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Site Code", default, deserialize_with = "empty_string_as_none")]
    code: Option<String>,
    #[serde(rename = "Region", default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(
        rename = "Audit 1 Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    audit_date_1: Option<String>,
    #[serde(
        rename = "Audit 1 Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    audit_score_1: Option<String>,
    #[serde(
        rename = "Audit 2 Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    audit_date_2: Option<String>,
    #[serde(
        rename = "Audit 2 Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    audit_score_2: Option<String>,
    #[serde(
        rename = "FRA Completed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    fra_completed: Option<String>,
    #[serde(
        rename = "Planned Visit",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    planned_visit: Option<String>,
    #[serde(
        rename = "Open Incidents",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    open_incidents: Option<String>,
    #[serde(
        rename = "Overdue Actions",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    overdue_actions: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn date_cell(value: Option<&str>, column: &str, line: usize) -> Option<NaiveDate> {
    let raw = value?;
    let parsed = parse_calendar_date(raw);
    if parsed.is_none() {
        debug!(line, column, value = raw, "ignoring unparseable date");
    }
    parsed
}

fn score_cell(value: Option<&str>, column: &str, line: usize) -> Option<f64> {
    let raw = value?;
    let parsed = parse_score(raw);
    if parsed.is_none() {
        debug!(line, column, value = raw, "ignoring unparseable audit score");
    }
    parsed
}

fn parse_score(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}

fn count_cell(value: Option<&str>) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) fn parse_score_for_tests(value: &str) -> Option<f64> {
    parse_score(value)
}

#[cfg(test)]
pub(crate) fn count_for_tests(value: &str) -> u32 {
    count_cell(Some(value))
}
