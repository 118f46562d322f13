//! CSV site register import.
//!
//! The register is the loosely-typed export the compliance team maintains by hand.
//! Rows are coerced into [`SiteComplianceRecord`]s here so the forecast never sees
//! malformed data: unparseable dates and scores become absent values, unparseable
//! counts become zero.

mod parser;

use crate::workflows::forecast::{
    compute_forecast, ComplianceForecastResult, SiteComplianceRecord, SiteId,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use parser::RegisterRow;

#[derive(Debug, thiserror::Error)]
pub enum SiteRegisterImportError {
    #[error("failed to read site register: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid site register CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Sites plus the per-site counts carried alongside them in the register.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteRegister {
    pub sites: Vec<SiteComplianceRecord>,
    pub open_incidents: HashMap<SiteId, u32>,
    pub overdue_actions: HashMap<SiteId, u32>,
}

impl SiteRegister {
    pub fn forecast(&self, reference_date: Option<NaiveDate>) -> ComplianceForecastResult {
        compute_forecast(
            &self.sites,
            &self.open_incidents,
            &self.overdue_actions,
            reference_date,
        )
    }

    /// Appends sites from another source. Ids already in the register keep their first record.
    pub fn merge_sites<I>(&mut self, sites: I)
    where
        I: IntoIterator<Item = SiteComplianceRecord>,
    {
        let mut seen: HashSet<SiteId> = self.sites.iter().map(|site| site.id.clone()).collect();
        for site in sites {
            if !seen.insert(site.id.clone()) {
                warn!(site_id = %site.id, "skipping duplicate site record");
                continue;
            }
            self.sites.push(site);
        }
    }
}

pub struct SiteRegisterImporter;

impl SiteRegisterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SiteRegister, SiteRegisterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SiteRegister, SiteRegisterImportError> {
        let mut register = SiteRegister::default();
        let mut seen: HashSet<SiteId> = HashSet::new();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let line = index + 2;
            let Some(raw_id) = row.site_id.clone() else {
                warn!(line, "skipping register row without a site id");
                continue;
            };

            let id = SiteId::new(raw_id);
            if !seen.insert(id.clone()) {
                warn!(line, site_id = %id, "skipping duplicate register row");
                continue;
            }

            apply_row(id, row, &mut register);
        }

        Ok(register)
    }
}

fn apply_row(id: SiteId, row: RegisterRow, register: &mut SiteRegister) {
    if row.open_incidents > 0 {
        register.open_incidents.insert(id.clone(), row.open_incidents);
    }
    if row.overdue_actions > 0 {
        register.overdue_actions.insert(id.clone(), row.overdue_actions);
    }

    let name = row.name.unwrap_or_else(|| id.0.clone());
    register.sites.push(SiteComplianceRecord {
        id,
        name,
        code: row.code,
        region: row.region,
        latest_audit_date_1: row.audit_date_1,
        latest_audit_score_pct_1: row.audit_score_1,
        latest_audit_date_2: row.audit_date_2,
        latest_audit_score_pct_2: row.audit_score_2,
        obligation_last_completed_date: row.fra_completed,
        planned_visit_date: row.planned_visit,
    });
}
