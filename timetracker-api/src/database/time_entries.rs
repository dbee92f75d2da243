use crate::database::timesheets::{fetch_status, refresh_total_hours, status_column};
use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use shared_types::{TimeEntry, TimesheetStatus};

const ENTRY_COLUMNS: &str = "id, timesheet_id, created_by, project_code, work_type_code, entry_date,
     start_time, end_time, hours, notes, created_at, last_modified_at";

/// Editable part of an entry, already normalized by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub project_code: String,
    pub work_type_code: String,
    pub entry_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub hours: f64,
    pub notes: String,
}

/// Entry joined with the display names used by reports
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub entry: TimeEntry,
    pub project_name: String,
    pub work_type_name: String,
}

/// Outcome of an entry write. Writes only happen while the owning
/// timesheet is open, checked in the same transaction as the write.
#[derive(Debug)]
pub enum EntryWrite<T> {
    Written(T),
    /// The entry (or, for inserts, the timesheet) does not exist
    Missing,
    TimesheetClosed,
}

/// Inserts the entry and refreshes the owning timesheet's total atomically
pub async fn insert_entry(
    conn: AsyncDbConnection,
    timesheet_id: i64,
    created_by: i64,
    fields: &EntryFields,
) -> Result<EntryWrite<TimeEntry>> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match fetch_status(&tx, timesheet_id)? {
        None => return Ok(EntryWrite::Missing),
        Some(TimesheetStatus::Closed) => return Ok(EntryWrite::TimesheetClosed),
        Some(TimesheetStatus::Open) => {}
    }

    let id: i64 = tx.query_row(
        "INSERT INTO time_entries
         (timesheet_id, created_by, project_code, work_type_code, entry_date, start_time,
          end_time, hours, notes, created_at, last_modified_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         RETURNING id",
        params![
            timesheet_id,
            created_by,
            fields.project_code,
            fields.work_type_code,
            fields.entry_date,
            fields.start_time,
            fields.end_time,
            fields.hours,
            fields.notes,
            now,
        ],
        |row| row.get(0),
    )?;
    refresh_total_hours(&tx, timesheet_id, now)?;
    tx.commit()?;

    Ok(EntryWrite::Written(TimeEntry {
        id,
        timesheet_id,
        created_by,
        project_code: fields.project_code.clone(),
        work_type_code: fields.work_type_code.clone(),
        entry_date: fields.entry_date,
        start_time: fields.start_time,
        end_time: fields.end_time,
        hours: fields.hours,
        notes: fields.notes.clone(),
        created_at: now,
        last_modified_at: now,
    }))
}

/// Rewrites the entry's fields and refreshes the owning timesheet's total atomically
pub async fn update_entry(
    conn: AsyncDbConnection,
    id: i64,
    fields: &EntryFields,
) -> Result<EntryWrite<TimeEntry>> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let timesheet_id = match owning_timesheet(&tx, id)? {
        None => return Ok(EntryWrite::Missing),
        Some((_, TimesheetStatus::Closed)) => return Ok(EntryWrite::TimesheetClosed),
        Some((timesheet_id, TimesheetStatus::Open)) => timesheet_id,
    };

    tx.execute(
        "UPDATE time_entries
         SET project_code = ?1, work_type_code = ?2, entry_date = ?3, start_time = ?4,
             end_time = ?5, hours = ?6, notes = ?7, last_modified_at = ?8
         WHERE id = ?9",
        params![
            fields.project_code,
            fields.work_type_code,
            fields.entry_date,
            fields.start_time,
            fields.end_time,
            fields.hours,
            fields.notes,
            now,
            id,
        ],
    )?;
    refresh_total_hours(&tx, timesheet_id, now)?;
    let entry = fetch_entry(&tx, id)?;
    tx.commit()?;

    Ok(entry.map_or(EntryWrite::Missing, EntryWrite::Written))
}

/// Deletes the entry and refreshes the owning timesheet's total atomically
pub async fn delete_entry(conn: AsyncDbConnection, id: i64) -> Result<EntryWrite<()>> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let timesheet_id = match owning_timesheet(&tx, id)? {
        None => return Ok(EntryWrite::Missing),
        Some((_, TimesheetStatus::Closed)) => return Ok(EntryWrite::TimesheetClosed),
        Some((timesheet_id, TimesheetStatus::Open)) => timesheet_id,
    };

    tx.execute("DELETE FROM time_entries WHERE id = ?1", params![id])?;
    refresh_total_hours(&tx, timesheet_id, now)?;
    tx.commit()?;

    Ok(EntryWrite::Written(()))
}

/// Timesheet id and status of the entry's timesheet
fn owning_timesheet(
    conn: &Connection,
    entry_id: i64,
) -> rusqlite::Result<Option<(i64, TimesheetStatus)>> {
    conn.query_row(
        "SELECT t.id, t.status
         FROM time_entries e
         JOIN timesheets t ON t.id = e.timesheet_id
         WHERE e.id = ?1",
        params![entry_id],
        |row| Ok((row.get(0)?, status_column(row, 1)?)),
    )
    .optional()
}

pub async fn get_entry(conn: AsyncDbConnection, id: i64) -> Result<Option<TimeEntry>> {
    let conn = conn.lock().await?;
    Ok(fetch_entry(&conn, id)?)
}

/// Ordered by date, then start time (entries without one first)
pub async fn list_for_timesheet(
    conn: AsyncDbConnection,
    timesheet_id: i64,
) -> Result<Vec<TimeEntry>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM time_entries
         WHERE timesheet_id = ?1
         ORDER BY entry_date, start_time, id",
        ENTRY_COLUMNS
    ))?;

    let rows = stmt.query_map(params![timesheet_id], map_row_to_entry)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }

    Ok(entries)
}

pub async fn list_report_rows(
    conn: AsyncDbConnection,
    timesheet_id: i64,
) -> Result<Vec<ReportRow>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT e.id, e.timesheet_id, e.created_by, e.project_code, e.work_type_code, e.entry_date,
                e.start_time, e.end_time, e.hours, e.notes, e.created_at, e.last_modified_at,
                p.name, w.name
         FROM time_entries e
         JOIN projects p ON p.code = e.project_code
         JOIN work_types w ON w.code = e.work_type_code
         WHERE e.timesheet_id = ?1
         ORDER BY e.project_code, e.entry_date, e.start_time, e.id",
    )?;

    let rows = stmt.query_map(params![timesheet_id], |row| {
        Ok(ReportRow {
            entry: map_row_to_entry(row)?,
            project_name: row.get(12)?,
            work_type_name: row.get(13)?,
        })
    })?;

    let mut report_rows = Vec::new();
    for row in rows {
        report_rows.push(row?);
    }

    Ok(report_rows)
}

fn fetch_entry(conn: &Connection, id: i64) -> rusqlite::Result<Option<TimeEntry>> {
    conn.query_row(
        &format!("SELECT {} FROM time_entries WHERE id = ?1", ENTRY_COLUMNS),
        params![id],
        map_row_to_entry,
    )
    .optional()
}

fn map_row_to_entry(row: &Row) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get(0)?,
        timesheet_id: row.get(1)?,
        created_by: row.get(2)?,
        project_code: row.get(3)?,
        work_type_code: row.get(4)?,
        entry_date: row.get(5)?,
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        hours: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        last_modified_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{create_user, test_db};
    use crate::database::timesheets;

    fn fields(day: u32, hours: f64) -> EntryFields {
        EntryFields {
            project_code: "INTERNAL".to_string(),
            work_type_code: "DEV".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            start_time: None,
            end_time: None,
            hours,
            notes: String::new(),
        }
    }

    async fn total_hours(conn: &AsyncDbConnection, timesheet_id: i64) -> f64 {
        timesheets::get_timesheet(conn.clone(), timesheet_id)
            .await
            .unwrap()
            .unwrap()
            .total_hours
    }

    async fn open_sheet(conn: &AsyncDbConnection, user: i64) -> i64 {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
        match timesheets::find_or_insert(conn.clone(), user, start, start, end)
            .await
            .unwrap()
        {
            timesheets::PeriodLookup::Created(sheet) => sheet.id,
            other => panic!("expected a new timesheet, got {:?}", other),
        }
    }

    fn written<T: std::fmt::Debug>(write: EntryWrite<T>) -> T {
        match write {
            EntryWrite::Written(value) => value,
            other => panic!("expected a write, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_entry_mutations_keep_total_in_sync() {
        let (_dir, conn) = test_db();
        let user = create_user(&conn, "entries@example.com").await;
        let sheet = open_sheet(&conn, user).await;

        let first = written(insert_entry(conn.clone(), sheet, user, &fields(6, 7.5)).await.unwrap());
        written(insert_entry(conn.clone(), sheet, user, &fields(5, 1.25)).await.unwrap());

        assert_eq!(total_hours(&conn, sheet).await, 8.75);

        let updated = written(update_entry(conn.clone(), first.id, &fields(6, 4.0)).await.unwrap());
        assert_eq!(updated.hours, 4.0);
        assert_eq!(total_hours(&conn, sheet).await, 5.25);

        written(delete_entry(conn.clone(), first.id).await.unwrap());
        assert!(matches!(
            delete_entry(conn.clone(), first.id).await.unwrap(),
            EntryWrite::Missing
        ));
        assert_eq!(total_hours(&conn, sheet).await, 1.25);

        let remaining = list_for_timesheet(conn.clone(), sheet).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].entry_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[tokio::test]
    async fn test_writes_refused_once_timesheet_closed() {
        let (_dir, conn) = test_db();
        let user = create_user(&conn, "closed@example.com").await;
        let sheet = open_sheet(&conn, user).await;
        let entry = written(insert_entry(conn.clone(), sheet, user, &fields(6, 2.0)).await.unwrap());

        timesheets::close_timesheet(conn.clone(), sheet).await.unwrap();

        assert!(matches!(
            insert_entry(conn.clone(), sheet, user, &fields(7, 1.0)).await.unwrap(),
            EntryWrite::TimesheetClosed
        ));
        assert!(matches!(
            update_entry(conn.clone(), entry.id, &fields(7, 1.0)).await.unwrap(),
            EntryWrite::TimesheetClosed
        ));
        assert!(matches!(
            delete_entry(conn.clone(), entry.id).await.unwrap(),
            EntryWrite::TimesheetClosed
        ));
        assert!(matches!(
            insert_entry(conn.clone(), 999, user, &fields(7, 1.0)).await.unwrap(),
            EntryWrite::Missing
        ));

        assert_eq!(list_for_timesheet(conn.clone(), sheet).await.unwrap(), vec![entry]);
        assert_eq!(total_hours(&conn, sheet).await, 2.0);
    }
}
