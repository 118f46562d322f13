use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Renewal status of a periodic compliance obligation on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Required,
    Overdue,
    Due,
    UpToDate,
}

impl LifecycleState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Overdue => "Overdue",
            Self::Due => "Due",
            Self::UpToDate => "Up to date",
        }
    }
}

/// Renewal cycle for an obligation and the window before renewal in which it counts as due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObligationSchedule {
    pub renewal_months: u32,
    pub due_window_days: i64,
}

impl ObligationSchedule {
    pub const FIRE_RISK_ASSESSMENT: Self = Self {
        renewal_months: 12,
        due_window_days: 30,
    };

    pub fn next_due(&self, last_completed: NaiveDate) -> Option<NaiveDate> {
        last_completed.checked_add_months(Months::new(self.renewal_months))
    }

    pub fn status(&self, last_completed: Option<NaiveDate>, today: NaiveDate) -> ObligationStatus {
        let Some(completed_on) = last_completed else {
            return ObligationStatus {
                state: LifecycleState::Required,
                next_due: None,
                days_until_due: None,
            };
        };

        // Only unreachable near the end of chrono's calendar range.
        let Some(next_due) = self.next_due(completed_on) else {
            return ObligationStatus {
                state: LifecycleState::UpToDate,
                next_due: None,
                days_until_due: None,
            };
        };

        let days_until_due = (next_due - today).num_days();
        let state = if days_until_due < 0 {
            LifecycleState::Overdue
        } else if days_until_due <= self.due_window_days {
            LifecycleState::Due
        } else {
            LifecycleState::UpToDate
        };

        ObligationStatus {
            state,
            next_due: Some(next_due),
            days_until_due: Some(days_until_due),
        }
    }
}

/// Lifecycle state together with the renewal date it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObligationStatus {
    pub state: LifecycleState,
    pub next_due: Option<NaiveDate>,
    pub days_until_due: Option<i64>,
}

/// Fire risk assessment status for a site, evaluated against `today`.
pub fn obligation_status(last_completed: Option<NaiveDate>, today: NaiveDate) -> ObligationStatus {
    ObligationSchedule::FIRE_RISK_ASSESSMENT.status(last_completed, today)
}

pub fn resolve_lifecycle_state(
    last_completed: Option<NaiveDate>,
    today: NaiveDate,
) -> LifecycleState {
    obligation_status(last_completed, today).state
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn missing_completion_is_required() {
        assert_eq!(
            resolve_lifecycle_state(None, date(2025, 6, 1)),
            LifecycleState::Required
        );
        let status = obligation_status(None, date(1999, 1, 1));
        assert!(status.next_due.is_none());
        assert!(status.days_until_due.is_none());
    }

    #[test]
    fn completion_today_is_up_to_date() {
        let today = date(2025, 3, 10);
        let status = obligation_status(Some(today), today);
        assert_eq!(status.state, LifecycleState::UpToDate);
        assert_eq!(status.next_due, Some(date(2026, 3, 10)));
        assert_eq!(status.days_until_due, Some(365));
    }

    #[test]
    fn due_window_is_inclusive_at_both_ends() {
        let completed = date(2024, 5, 15);
        let next_due = date(2025, 5, 15);

        assert_eq!(
            resolve_lifecycle_state(Some(completed), next_due),
            LifecycleState::Due
        );
        assert_eq!(
            resolve_lifecycle_state(Some(completed), next_due - Duration::days(30)),
            LifecycleState::Due
        );
        assert_eq!(
            resolve_lifecycle_state(Some(completed), next_due - Duration::days(31)),
            LifecycleState::UpToDate
        );
        assert_eq!(
            resolve_lifecycle_state(Some(completed), next_due + Duration::days(1)),
            LifecycleState::Overdue
        );
    }

    #[test]
    fn renewal_uses_calendar_months() {
        assert_eq!(
            ObligationSchedule::FIRE_RISK_ASSESSMENT.next_due(date(2025, 1, 31)),
            Some(date(2026, 1, 31))
        );
        // Leap day clamps to the end of February.
        assert_eq!(
            ObligationSchedule::FIRE_RISK_ASSESSMENT.next_due(date(2024, 2, 29)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn leap_day_completion_becomes_overdue_on_first_of_march() {
        let completed = date(2024, 2, 29);
        assert_eq!(
            resolve_lifecycle_state(Some(completed), date(2025, 2, 28)),
            LifecycleState::Due
        );
        assert_eq!(
            resolve_lifecycle_state(Some(completed), date(2025, 3, 1)),
            LifecycleState::Overdue
        );
    }

    #[test]
    fn completion_after_reference_date_is_up_to_date() {
        assert_eq!(
            resolve_lifecycle_state(Some(date(2025, 8, 1)), date(2025, 1, 1)),
            LifecycleState::UpToDate
        );
    }

    #[test]
    fn states_serialize_in_snake_case() {
        let encoded = serde_json::to_string(&LifecycleState::UpToDate).expect("serializes");
        assert_eq!(encoded, "\"up_to_date\"");
        assert_eq!(LifecycleState::Required.label(), "Required");
    }
}
