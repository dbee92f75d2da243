use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{LoginRequest, LoginResponse, RegisterUserRequest};
use std::sync::Arc;

use super::{bearer_token, current_user, ApiError, ApiResult};
use crate::config::AuthConfig;
use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::users;

pub async fn register(
    db: web::Data<Arc<Database>>,
    auth: web::Data<AuthConfig>,
    request: web::Json<RegisterUserRequest>,
) -> ApiResult {
    let user = users::register(&db.async_connection, request.into_inner(), auth.bcrypt_cost).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn login(
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    request: web::Json<LoginRequest>,
) -> ApiResult {
    let user = users::login(&db.async_connection, request.into_inner()).await?;
    let token = sessions.create_session(user.id).await;

    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

pub async fn logout(req: HttpRequest, sessions: web::Data<Arc<SessionStore>>) -> ApiResult {
    let token = bearer_token(&req).ok_or(ApiError::Unauthenticated)?;
    if !sessions.end_session(token).await {
        return Err(ApiError::Unauthenticated);
    }

    Ok(HttpResponse::NoContent().finish())
}

pub async fn me(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
) -> ApiResult {
    let user_id = current_user(&req, &sessions).await?;
    let user = users::get_user(&db.async_connection, user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}
