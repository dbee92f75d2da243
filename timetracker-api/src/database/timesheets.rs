use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use shared_types::{Timesheet, TimesheetStatus};

const TIMESHEET_COLUMNS: &str =
    "id, user_id, start_date, end_date, status, total_hours, created_at, last_modified_at";

/// How the timesheet for a date was resolved
#[derive(Debug)]
pub enum PeriodLookup {
    /// An existing timesheet of the user already contains the date
    Covering(Timesheet),
    Created(Timesheet),
    /// The date is uncovered but `[start, end]` overlaps another timesheet
    Overlaps,
}

/// Returns the user's timesheet containing `date`, or inserts an open one
/// for `[start_date, end_date]` when that range overlaps none of theirs.
/// Runs in one immediate transaction so concurrent callers serialize.
pub async fn find_or_insert(
    conn: AsyncDbConnection,
    user_id: i64,
    date: NaiveDate,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<PeriodLookup> {
    let mut conn = conn.lock().await?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if let Some(existing) = find_covering(&tx, user_id, date)? {
        return Ok(PeriodLookup::Covering(existing));
    }
    if overlapping_exists(&tx, user_id, start_date, end_date)? {
        return Ok(PeriodLookup::Overlaps);
    }
    let timesheet = insert_timesheet(&tx, user_id, start_date, end_date)?;
    tx.commit()?;

    Ok(PeriodLookup::Created(timesheet))
}

pub async fn get_timesheet(conn: AsyncDbConnection, id: i64) -> Result<Option<Timesheet>> {
    let conn = conn.lock().await?;
    Ok(fetch_timesheet(&conn, id)?)
}

fn insert_timesheet(
    conn: &Connection,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> rusqlite::Result<Timesheet> {
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO timesheets (user_id, start_date, end_date, status, total_hours, created_at, last_modified_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
         RETURNING id",
        params![
            user_id,
            start_date,
            end_date,
            TimesheetStatus::Open.as_str(),
            now
        ],
        |row| row.get(0),
    )?;

    Ok(Timesheet {
        id,
        user_id,
        start_date,
        end_date,
        status: TimesheetStatus::Open,
        total_hours: 0.0,
        created_at: now,
        last_modified_at: now,
    })
}

fn find_covering(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> rusqlite::Result<Option<Timesheet>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM timesheets
             WHERE user_id = ?1 AND start_date <= ?2 AND end_date >= ?2
             ORDER BY start_date
             LIMIT 1",
            TIMESHEET_COLUMNS
        ),
        params![user_id, date],
        map_row_to_timesheet,
    )
    .optional()
}

/// Whether any of the user's timesheets shares at least one day with `[start, end]`
fn overlapping_exists(
    conn: &Connection,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM timesheets
         WHERE user_id = ?1 AND start_date <= ?3 AND end_date >= ?2",
        params![user_id, start_date, end_date],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Newest period first. Bounds keep only timesheets overlapping the range.
pub async fn list_for_user(
    conn: AsyncDbConnection,
    user_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Timesheet>> {
    let conn = conn.lock().await?;

    let mut query = format!("SELECT {} FROM timesheets WHERE user_id = ?", TIMESHEET_COLUMNS);
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    if let Some(from) = from {
        query.push_str(" AND end_date >= ?");
        params.push(Box::new(from));
    }
    if let Some(to) = to {
        query.push_str(" AND start_date <= ?");
        params.push(Box::new(to));
    }
    query.push_str(" ORDER BY start_date DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&query)?;
    let rows = stmt.query_map(params_refs.as_slice(), map_row_to_timesheet)?;

    let mut timesheets = Vec::new();
    for row in rows {
        timesheets.push(row?);
    }

    Ok(timesheets)
}

/// Recomputes the total and marks the timesheet closed in one transaction
pub async fn close_timesheet(conn: AsyncDbConnection, id: i64) -> Result<Option<Timesheet>> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    refresh_total_hours(&tx, id, now)?;
    tx.execute(
        "UPDATE timesheets SET status = ?1 WHERE id = ?2",
        params![TimesheetStatus::Closed.as_str(), id],
    )?;
    let timesheet = fetch_timesheet(&tx, id)?;
    tx.commit()?;

    Ok(timesheet)
}

/// Sets the cached total to the sum of the entries' hours and bumps the
/// modification time. Callers run it inside the transaction that changed
/// the entries.
pub(crate) fn refresh_total_hours(
    conn: &Connection,
    timesheet_id: i64,
    now: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE timesheets
         SET total_hours = (
                 SELECT ROUND(COALESCE(SUM(hours), 0), 2)
                 FROM time_entries
                 WHERE timesheet_id = ?1
             ),
             last_modified_at = ?2
         WHERE id = ?1",
        params![timesheet_id, now],
    )?;
    Ok(())
}

fn fetch_timesheet(conn: &Connection, id: i64) -> rusqlite::Result<Option<Timesheet>> {
    conn.query_row(
        &format!("SELECT {} FROM timesheets WHERE id = ?1", TIMESHEET_COLUMNS),
        params![id],
        map_row_to_timesheet,
    )
    .optional()
}

/// Status of the timesheet, read inside the caller's transaction
pub(crate) fn fetch_status(
    conn: &Connection,
    id: i64,
) -> rusqlite::Result<Option<TimesheetStatus>> {
    conn.query_row(
        "SELECT status FROM timesheets WHERE id = ?1",
        params![id],
        |row| status_column(row, 0),
    )
    .optional()
}

pub(crate) fn status_column(row: &Row, idx: usize) -> rusqlite::Result<TimesheetStatus> {
    let status: String = row.get(idx)?;
    status
        .parse::<TimesheetStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_row_to_timesheet(row: &Row) -> rusqlite::Result<Timesheet> {
    let status = status_column(row, 4)?;

    Ok(Timesheet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        status,
        total_hours: row.get(5)?,
        created_at: row.get(6)?,
        last_modified_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{create_user, test_db};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn created(
        conn: &AsyncDbConnection,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Timesheet {
        match find_or_insert(conn.clone(), user_id, start, start, end).await.unwrap() {
            PeriodLookup::Created(timesheet) => timesheet,
            other => panic!("expected a new timesheet, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_or_insert_resolves_covering_and_overlap() {
        let (_dir, conn) = test_db();
        let user = create_user(&conn, "sheets@example.com").await;
        let other = create_user(&conn, "other@example.com").await;

        let sheet = created(&conn, user, date(2026, 1, 5), date(2026, 1, 18)).await;
        assert_eq!(sheet.status, TimesheetStatus::Open);

        match find_or_insert(conn.clone(), user, date(2026, 1, 18), date(2026, 1, 12), date(2026, 1, 25))
            .await
            .unwrap()
        {
            PeriodLookup::Covering(found) => assert_eq!(found.id, sheet.id),
            other => panic!("expected the covering timesheet, got {:?}", other),
        }

        // 2026-01-19 is uncovered but a window starting 2026-01-12 overlaps
        assert!(matches!(
            find_or_insert(conn.clone(), user, date(2026, 1, 19), date(2026, 1, 12), date(2026, 1, 25))
                .await
                .unwrap(),
            PeriodLookup::Overlaps
        ));

        // Another user's periods are independent
        created(&conn, other, date(2026, 1, 5), date(2026, 1, 18)).await;
    }

    #[tokio::test]
    async fn test_fetch_status_follows_close() {
        let (_dir, conn) = test_db();
        let user = create_user(&conn, "status@example.com").await;
        let sheet = created(&conn, user, date(2026, 1, 5), date(2026, 1, 18)).await;

        close_timesheet(conn.clone(), sheet.id).await.unwrap();

        let db = conn.lock().await.unwrap();
        assert_eq!(fetch_status(&db, sheet.id).unwrap(), Some(TimesheetStatus::Closed));
        assert_eq!(fetch_status(&db, 999).unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_for_user_orders_newest_first_and_filters_range() {
        let (_dir, conn) = test_db();
        let user = create_user(&conn, "list@example.com").await;

        created(&conn, user, date(2026, 1, 5), date(2026, 1, 18)).await;
        created(&conn, user, date(2026, 2, 2), date(2026, 2, 15)).await;

        let all = list_for_user(conn.clone(), user, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].start_date, date(2026, 2, 2));

        let january = list_for_user(conn.clone(), user, None, Some(date(2026, 1, 31)))
            .await
            .unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].start_date, date(2026, 1, 5));
    }
}
