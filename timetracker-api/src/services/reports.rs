use crate::database::time_entries::{self as entries_db, ReportRow};
use crate::database::timesheets as timesheets_db;
use crate::database::AsyncDbConnection;
use crate::services::timesheets::load_owned;
use crate::services::validation::round_hours;
use crate::services::ServiceResult;
use chrono::NaiveDate;
use shared_types::{
    DailyTotal, ProjectSummary, ProjectTimeReport, ProjectTimeReportQuery, TimeEntryDetail,
    Timesheet, TimesheetReport, ValidationErrors,
};
use std::collections::BTreeMap;

/// Hours per project for one timesheet, or for every timesheet of the user
/// overlapping the optional date range.
pub async fn project_time_report(
    conn: &AsyncDbConnection,
    user_id: i64,
    query: ProjectTimeReportQuery,
) -> ServiceResult<ProjectTimeReport> {
    let timesheets = match query.timesheet_id {
        Some(id) => vec![load_owned(conn, user_id, id).await?],
        None => {
            if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
                if start > end {
                    let mut errors = ValidationErrors::new();
                    errors.add("end_date", "End date must not be before start date");
                    return Err(errors.into());
                }
            }
            timesheets_db::list_for_user(conn.clone(), user_id, query.start_date, query.end_date)
                .await?
        }
    };

    let mut reports = Vec::with_capacity(timesheets.len());
    for timesheet in timesheets {
        let rows = entries_db::list_report_rows(conn.clone(), timesheet.id).await?;
        reports.push(timesheet_report(timesheet, rows));
    }

    Ok(ProjectTimeReport {
        timesheets: reports,
    })
}

fn timesheet_report(timesheet: Timesheet, rows: Vec<ReportRow>) -> TimesheetReport {
    TimesheetReport {
        timesheet_id: timesheet.id,
        start_date: timesheet.start_date,
        end_date: timesheet.end_date,
        status: timesheet.status,
        total_hours: timesheet.total_hours,
        projects: summarize_projects(rows),
    }
}

/// Groups rows by project code. The output is ordered by code and each
/// project's daily totals by date.
fn summarize_projects(rows: Vec<ReportRow>) -> Vec<ProjectSummary> {
    let mut grouped: BTreeMap<String, (String, Vec<ReportRow>)> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.entry.project_code.clone())
            .or_insert_with(|| (row.project_name.clone(), Vec::new()))
            .1
            .push(row);
    }

    grouped
        .into_iter()
        .map(|(project_code, (project_name, rows))| {
            let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            let mut total = 0.0;
            let mut entries = Vec::with_capacity(rows.len());

            for row in rows {
                total += row.entry.hours;
                *daily.entry(row.entry.entry_date).or_default() += row.entry.hours;
                entries.push(TimeEntryDetail {
                    id: row.entry.id,
                    entry_date: row.entry.entry_date,
                    hours: row.entry.hours,
                    work_type_code: row.entry.work_type_code,
                    work_type_name: row.work_type_name,
                    notes: row.entry.notes,
                });
            }

            ProjectSummary {
                project_code,
                project_name,
                total_hours: round_hours(total),
                entries,
                daily_totals: daily
                    .into_iter()
                    .map(|(date, hours)| DailyTotal {
                        date,
                        hours: round_hours(hours),
                    })
                    .collect(),
            }
        })
        .collect()
}
