pub mod account;
pub mod catalog;
pub mod entries;
pub mod reports;
pub mod timesheets;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use shared_types::ErrorResponse;
use std::sync::Arc;

use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::ServiceError;

/// Failure of an HTTP handler, rendered as an [`ErrorResponse`] body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Service(ServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Unauthorized(_)) => StatusCode::FORBIDDEN,
            ApiError::Service(ServiceError::BusinessRule(_)) => StatusCode::CONFLICT,
            ApiError::Service(ServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Service(ServiceError::Validation(errors)) => ErrorResponse {
                error: self.to_string(),
                validation_errors: errors.clone(),
            },
            ApiError::Service(ServiceError::Internal(e)) => {
                tracing::error!("Request failed: {:#}", e);
                ErrorResponse::new("Internal server error")
            }
            _ => ErrorResponse::new(self.to_string()),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type ApiResult = Result<HttpResponse, ApiError>;

/// Bearer token from the `Authorization` header
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Id of the logged-in user, or `Unauthenticated` when the request carries
/// no live session
pub async fn current_user(req: &HttpRequest, sessions: &SessionStore) -> Result<i64, ApiError> {
    let token = bearer_token(req).ok_or(ApiError::Unauthenticated)?;
    sessions
        .get_user_id(token)
        .await
        .ok_or(ApiError::Unauthenticated)
}

pub async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Registers every route. Expects `Arc<Database>`, `Arc<SessionStore>` and
/// `AuthConfig` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/account/register", web::post().to(account::register))
        .route("/api/account/login", web::post().to(account::login))
        .route("/api/account/logout", web::post().to(account::logout))
        .route("/api/account/me", web::get().to(account::me))
        .route("/api/timesheets", web::get().to(timesheets::list_timesheets))
        .route("/api/timesheets", web::post().to(timesheets::open_timesheet))
        .route("/api/timesheets/{id}", web::get().to(timesheets::get_timesheet))
        .route("/api/timesheets/{id}/close", web::post().to(timesheets::close_timesheet))
        .route("/api/timesheets/{id}/entries", web::get().to(entries::list_entries))
        .route("/api/entries", web::post().to(entries::create_entry))
        .route("/api/entries/{id}", web::put().to(entries::update_entry))
        .route("/api/entries/{id}", web::delete().to(entries::delete_entry))
        .route("/api/projects", web::get().to(catalog::list_projects))
        .route("/api/projects", web::post().to(catalog::create_project))
        .route("/api/projects/{code}", web::get().to(catalog::get_project))
        .route("/api/projects/{code}", web::put().to(catalog::update_project))
        .route("/api/work-types", web::get().to(catalog::list_work_types))
        .route("/api/work-types", web::post().to(catalog::create_work_type))
        .route("/api/work-types/{code}", web::get().to(catalog::get_work_type))
        .route("/api/work-types/{code}", web::put().to(catalog::update_work_type))
        .route("/api/reports/project-time", web::get().to(reports::project_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;
    use shared_types::ValidationErrors;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc123"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        assert_eq!(bearer_token(&TestRequest::default().to_http_request()), None);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                ServiceError::from(ValidationErrors::new()).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ServiceError::not_found("x").into(), StatusCode::NOT_FOUND),
            (ServiceError::unauthorized().into(), StatusCode::FORBIDDEN),
            (ServiceError::business_rule("x").into(), StatusCode::CONFLICT),
            (
                ServiceError::Internal(anyhow::anyhow!("boom")).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{}", error);
        }
    }

    #[actix_web::test]
    async fn test_error_body_carries_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("hours", "Hours must be greater than 0 and at most 24");
        let response = ApiError::from(ServiceError::from(errors)).error_response();

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["validation_errors"]["hours"][0],
            "Hours must be greater than 0 and at most 24"
        );
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::from(ServiceError::Internal(anyhow::anyhow!("disk on fire")))
            .error_response();

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("validation_errors").is_none());
    }
}
