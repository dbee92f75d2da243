use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::timesheet::TimesheetStatus;

/// Filters for the project time report. A timesheet id wins over the date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct ProjectTimeReportQuery {
    pub timesheet_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ProjectTimeReport {
    pub timesheets: Vec<TimesheetReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TimesheetReport {
    pub timesheet_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TimesheetStatus,
    pub total_hours: f64,
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ProjectSummary {
    pub project_code: String,
    pub project_name: String,
    pub total_hours: f64,
    pub entries: Vec<TimeEntryDetail>,
    pub daily_totals: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TimeEntryDetail {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub hours: f64,
    pub work_type_code: String,
    pub work_type_name: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub hours: f64,
}
