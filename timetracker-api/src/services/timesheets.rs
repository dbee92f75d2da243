use crate::database::timesheets::{self as db, PeriodLookup};
use crate::database::AsyncDbConnection;
use crate::helpers::period::period_for;
use crate::services::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use shared_types::Timesheet;
use tracing::info;

/// Returns the user's timesheet covering `date`, creating the Monday-aligned
/// fourteen-day period when none does.
///
/// A new period is refused when it would overlap an existing timesheet of
/// the user, since a date may belong to at most one of them.
pub async fn get_or_create_for_date(
    conn: &AsyncDbConnection,
    user_id: i64,
    date: NaiveDate,
) -> ServiceResult<Timesheet> {
    let (start, end) = period_for(date);
    match db::find_or_insert(conn.clone(), user_id, date, start, end).await? {
        PeriodLookup::Covering(existing) => Ok(existing),
        PeriodLookup::Overlaps => Err(ServiceError::business_rule(
            "A timesheet already exists for this period",
        )),
        PeriodLookup::Created(timesheet) => {
            info!(
                timesheet_id = timesheet.id,
                user_id, "Opened timesheet {} to {}", start, end
            );
            Ok(timesheet)
        }
    }
}

pub async fn get(conn: &AsyncDbConnection, user_id: i64, id: i64) -> ServiceResult<Timesheet> {
    load_owned(conn, user_id, id).await
}

pub async fn list_for_user(conn: &AsyncDbConnection, user_id: i64) -> ServiceResult<Vec<Timesheet>> {
    Ok(db::list_for_user(conn.clone(), user_id, None, None).await?)
}

pub async fn close(conn: &AsyncDbConnection, user_id: i64, id: i64) -> ServiceResult<Timesheet> {
    let timesheet = load_owned(conn, user_id, id).await?;
    if !timesheet.is_open() {
        return Err(ServiceError::business_rule("Timesheet is already closed"));
    }

    let closed = db::close_timesheet(conn.clone(), id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Timesheet not found"))?;

    info!(
        timesheet_id = id,
        user_id, "Closed timesheet with {} hours", closed.total_hours
    );
    Ok(closed)
}

/// Loads a timesheet and checks that `user_id` owns it
pub(crate) async fn load_owned(
    conn: &AsyncDbConnection,
    user_id: i64,
    id: i64,
) -> ServiceResult<Timesheet> {
    let timesheet = db::get_timesheet(conn.clone(), id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Timesheet not found"))?;

    if timesheet.user_id != user_id {
        return Err(ServiceError::unauthorized());
    }

    Ok(timesheet)
}
