use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Open,
    Closed,
}

impl TimesheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::Open => "open",
            TimesheetStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown timesheet status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TimesheetStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TimesheetStatus::Open),
            "closed" => Ok(TimesheetStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A user's fourteen-day period starting on a Monday.
///
/// `total_hours` is a cached aggregate of the entries' hours and is refreshed
/// by every entry mutation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Timesheet {
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TimesheetStatus,
    pub total_hours: f64,
    pub created_at: i64,
    pub last_modified_at: i64,
}

impl Timesheet {
    /// Inclusive on both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn is_open(&self) -> bool {
        self.status == TimesheetStatus::Open
    }
}

/// Opens (or fetches) the timesheet covering `date`; today when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct OpenTimesheetRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TimesheetsResponse {
    pub timesheets: Vec<Timesheet>,
}
