use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::ProjectTimeReportQuery;
use std::sync::Arc;

use super::{current_user, ApiResult};
use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::reports;

pub async fn project_time(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    query: web::Query<ProjectTimeReportQuery>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let report =
        reports::project_time_report(&db.async_connection, user_id, query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(report))
}
