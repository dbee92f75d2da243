use crate::database::catalog::{self as catalog_db, CatalogTable};
use crate::database::time_entries::{self as db, EntryFields, EntryWrite};
use crate::database::AsyncDbConnection;
use crate::services::timesheets::load_owned;
use crate::services::validation::{self, MAX_TEXT_LEN};
use crate::services::{ServiceError, ServiceResult};
use chrono::{NaiveDate, NaiveTime};
use shared_types::{
    normalize_code, CreateTimeEntryRequest, TimeEntry, Timesheet, UpdateTimeEntryRequest,
    ValidationErrors,
};
use tracing::info;

/// Request fields shared by create and update
struct EntryInput {
    project_code: String,
    work_type_code: String,
    entry_date: NaiveDate,
    hours: f64,
    notes: Option<String>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
}

impl From<UpdateTimeEntryRequest> for EntryInput {
    fn from(request: UpdateTimeEntryRequest) -> Self {
        EntryInput {
            project_code: request.project_code,
            work_type_code: request.work_type_code,
            entry_date: request.entry_date,
            hours: request.hours,
            notes: request.notes,
            start_time: request.start_time,
            end_time: request.end_time,
        }
    }
}

const CLOSED_ON_ADD: &str = "Cannot add entries to closed timesheet";
const CLOSED_ON_MODIFY: &str = "Cannot modify entries of a closed timesheet";
const CLOSED_ON_DELETE: &str = "Cannot delete entries of a closed timesheet";
const ENTRY_NOT_FOUND: &str = "Time entry not found";

pub async fn create(
    conn: &AsyncDbConnection,
    user_id: i64,
    request: CreateTimeEntryRequest,
) -> ServiceResult<TimeEntry> {
    let timesheet_id = request.timesheet_id;
    let input = EntryInput {
        project_code: request.project_code,
        work_type_code: request.work_type_code,
        entry_date: request.entry_date,
        hours: request.hours,
        notes: request.notes,
        start_time: request.start_time,
        end_time: request.end_time,
    };

    let fields = validate_input(conn, input, true).await?;

    let timesheet = match load_owned(conn, user_id, timesheet_id).await {
        Ok(timesheet) => timesheet,
        Err(ServiceError::NotFound(_)) => return Err(ServiceError::not_found("Invalid timesheet")),
        Err(ServiceError::Unauthorized(_)) => {
            return Err(ServiceError::Unauthorized("Invalid timesheet".to_string()))
        }
        Err(e) => return Err(e),
    };
    if !timesheet.is_open() {
        return Err(ServiceError::business_rule(CLOSED_ON_ADD));
    }
    ensure_in_period(&timesheet, fields.entry_date)?;

    let entry = written(
        db::insert_entry(conn.clone(), timesheet.id, user_id, &fields).await?,
        CLOSED_ON_ADD,
    )?;
    info!(
        entry_id = entry.id,
        timesheet_id = timesheet.id,
        "Added {} hours on {}",
        entry.hours,
        entry.entry_date
    );
    Ok(entry)
}

pub async fn update(
    conn: &AsyncDbConnection,
    user_id: i64,
    id: i64,
    request: UpdateTimeEntryRequest,
) -> ServiceResult<TimeEntry> {
    let (_, timesheet) = load_entry_owned(conn, user_id, id).await?;

    let fields = validate_input(conn, request.into(), false).await?;

    if !timesheet.is_open() {
        return Err(ServiceError::business_rule(CLOSED_ON_MODIFY));
    }
    ensure_in_period(&timesheet, fields.entry_date)?;

    let entry = written(
        db::update_entry(conn.clone(), id, &fields).await?,
        CLOSED_ON_MODIFY,
    )?;
    info!(entry_id = id, timesheet_id = timesheet.id, "Updated time entry");
    Ok(entry)
}

pub async fn delete(conn: &AsyncDbConnection, user_id: i64, id: i64) -> ServiceResult<()> {
    let (_, timesheet) = load_entry_owned(conn, user_id, id).await?;

    if !timesheet.is_open() {
        return Err(ServiceError::business_rule(CLOSED_ON_DELETE));
    }

    written(db::delete_entry(conn.clone(), id).await?, CLOSED_ON_DELETE)?;
    info!(entry_id = id, timesheet_id = timesheet.id, "Deleted time entry");
    Ok(())
}

pub async fn list_for_timesheet(
    conn: &AsyncDbConnection,
    user_id: i64,
    timesheet_id: i64,
) -> ServiceResult<Vec<TimeEntry>> {
    let timesheet = load_owned(conn, user_id, timesheet_id).await?;
    Ok(db::list_for_timesheet(conn.clone(), timesheet.id).await?)
}

/// The entry together with its timesheet, which must belong to `user_id`
async fn load_entry_owned(
    conn: &AsyncDbConnection,
    user_id: i64,
    id: i64,
) -> ServiceResult<(TimeEntry, Timesheet)> {
    let entry = db::get_entry(conn.clone(), id)
        .await?
        .ok_or_else(|| ServiceError::not_found(ENTRY_NOT_FOUND))?;
    let timesheet = load_owned(conn, user_id, entry.timesheet_id).await?;
    Ok((entry, timesheet))
}

/// The timesheet may close between the service's checks and the write;
/// the database re-checks inside the write transaction.
fn written<T>(write: EntryWrite<T>, closed_message: &str) -> ServiceResult<T> {
    match write {
        EntryWrite::Written(value) => Ok(value),
        EntryWrite::Missing => Err(ServiceError::not_found(ENTRY_NOT_FOUND)),
        EntryWrite::TimesheetClosed => Err(ServiceError::business_rule(closed_message)),
    }
}

fn ensure_in_period(timesheet: &Timesheet, date: NaiveDate) -> ServiceResult<()> {
    if timesheet.contains_date(date) {
        Ok(())
    } else {
        Err(ServiceError::business_rule(
            "Entry date must be within timesheet period",
        ))
    }
}

/// Field checks plus catalog lookups. Every problem is collected before
/// failing so the caller sees them all at once. Codes must always exist;
/// `require_active` additionally rejects deactivated ones.
async fn validate_input(
    conn: &AsyncDbConnection,
    input: EntryInput,
    require_active: bool,
) -> ServiceResult<EntryFields> {
    let mut errors = ValidationErrors::new();

    // Range applies to the value that gets stored
    let hours = validation::round_hours(input.hours);
    if !validation::is_valid_hours(hours) {
        errors.add("hours", "Hours must be greater than 0 and at most 24");
    }

    let notes = input.notes.unwrap_or_default().trim().to_string();
    validation::max_length(&mut errors, "notes", &notes, MAX_TEXT_LEN, "Notes");

    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if end <= start {
            errors.add("end_time", "End time must be after start time");
        }
    }

    let project_code = normalize_code(&input.project_code);
    check_code(
        conn,
        &mut errors,
        CatalogTable::Projects,
        "project_code",
        &project_code,
        require_active,
    )
    .await?;

    let work_type_code = normalize_code(&input.work_type_code);
    check_code(
        conn,
        &mut errors,
        CatalogTable::WorkTypes,
        "work_type_code",
        &work_type_code,
        require_active,
    )
    .await?;

    errors.into_result()?;

    Ok(EntryFields {
        project_code,
        work_type_code,
        entry_date: input.entry_date,
        start_time: input.start_time,
        end_time: input.end_time,
        hours,
        notes,
    })
}

/// A code must name an existing row, and an active one when `require_active`
async fn check_code(
    conn: &AsyncDbConnection,
    errors: &mut ValidationErrors,
    table: CatalogTable,
    field: &str,
    code: &str,
    require_active: bool,
) -> ServiceResult<()> {
    let label = table.label();

    if code.is_empty() {
        errors.add(field, format!("{} code is required", label));
        return Ok(());
    }

    match catalog_db::get_item(conn.clone(), table, code).await? {
        None => errors.add(field, format!("Invalid {} code", label.to_lowercase())),
        Some(item) if require_active && !item.is_active => {
            errors.add(field, format!("{} is inactive", label))
        }
        Some(_) => {}
    }

    Ok(())
}
