use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Hours booked against a project and work type on one day of a timesheet
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub timesheet_id: i64,
    pub created_by: i64,
    pub project_code: String,
    pub work_type_code: String,
    pub entry_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub hours: f64,
    pub notes: String,
    pub created_at: i64,
    pub last_modified_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTimeEntryRequest {
    pub timesheet_id: i64,
    pub project_code: String,
    pub work_type_code: String,
    pub entry_date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

/// Replaces every editable field of an entry. The owning timesheet is fixed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTimeEntryRequest {
    pub project_code: String,
    pub work_type_code: String,
    pub entry_date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TimeEntriesResponse {
    pub entries: Vec<TimeEntry>,
}
