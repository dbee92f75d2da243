use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{CreateTimeEntryRequest, TimeEntriesResponse, UpdateTimeEntryRequest};
use std::sync::Arc;

use super::{current_user, ApiResult};
use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::time_entries;

pub async fn list_entries(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<i64>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let entries =
        time_entries::list_for_timesheet(&db.async_connection, user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TimeEntriesResponse { entries }))
}

pub async fn create_entry(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    request: web::Json<CreateTimeEntryRequest>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let entry = time_entries::create(&db.async_connection, user_id, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(entry))
}

pub async fn update_entry(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<i64>,
    request: web::Json<UpdateTimeEntryRequest>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let entry = time_entries::update(
        &db.async_connection,
        user_id,
        path.into_inner(),
        request.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(entry))
}

pub async fn delete_entry(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<i64>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    time_entries::delete(&db.async_connection, user_id, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
