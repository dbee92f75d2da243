use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{OpenTimesheetRequest, TimesheetsResponse, ValidationErrors};
use std::sync::Arc;

use super::{current_user, ApiError, ApiResult};
use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::{timesheets, ServiceError};

pub async fn list_timesheets(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let timesheets = timesheets::list_for_user(&db.async_connection, user_id).await?;

    Ok(HttpResponse::Ok().json(TimesheetsResponse { timesheets }))
}

/// Returns the timesheet covering the requested date, opening a new period
/// if needed. The body is optional; without a date it uses today (UTC).
pub async fn open_timesheet(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Bytes,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let request = parse_open_request(&body)?;
    let date = request
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let timesheet = timesheets::get_or_create_for_date(&db.async_connection, user_id, date).await?;
    Ok(HttpResponse::Ok().json(timesheet))
}

pub async fn get_timesheet(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<i64>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let timesheet = timesheets::get(&db.async_connection, user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(timesheet))
}

pub async fn close_timesheet(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<i64>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let timesheet = timesheets::close(&db.async_connection, user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(timesheet))
}

/// An empty body means "today"; anything else must be a valid request
fn parse_open_request(body: &[u8]) -> Result<OpenTimesheetRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(OpenTimesheetRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("date", format!("Invalid request body: {}", e));
        ServiceError::from(errors).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_open_request() {
        assert_eq!(parse_open_request(b"").unwrap().date, None);
        assert_eq!(parse_open_request(b" \n").unwrap().date, None);
        assert_eq!(parse_open_request(b"{}").unwrap().date, None);
        assert_eq!(
            parse_open_request(br#"{"date":"2026-01-08"}"#).unwrap().date,
            NaiveDate::from_ymd_opt(2026, 1, 8)
        );
        assert!(matches!(
            parse_open_request(br#"{"date":"yesterday"}"#),
            Err(ApiError::Service(ServiceError::Validation(_)))
        ));
    }
}
