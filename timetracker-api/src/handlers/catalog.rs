use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use shared_types::{CatalogItemsResponse, CreateCatalogItemRequest, UpdateCatalogItemRequest};
use std::sync::Arc;

use super::{current_user, ApiResult};
use crate::database::catalog::CatalogTable;
use crate::database::Database;
use crate::helpers::sessions::SessionStore;
use crate::services::catalog;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub active_only: bool,
}

async fn list(
    table: CatalogTable,
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    params: web::Query<ListParams>,
) -> ApiResult {
    current_user(&req, &sessions).await?;
    let items = catalog::list(&db.async_connection, table, params.active_only).await?;

    Ok(HttpResponse::Ok().json(CatalogItemsResponse { items }))
}

async fn create(
    table: CatalogTable,
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    request: web::Json<CreateCatalogItemRequest>,
) -> ApiResult {
    current_user(&req, &sessions).await?;
    let item = catalog::create(&db.async_connection, table, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(item))
}

async fn get(
    table: CatalogTable,
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> ApiResult {
    current_user(&req, &sessions).await?;
    let item = catalog::get(&db.async_connection, table, &path).await?;

    Ok(HttpResponse::Ok().json(item))
}

async fn update(
    table: CatalogTable,
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
    request: web::Json<UpdateCatalogItemRequest>,
) -> ApiResult {
    current_user(&req, &sessions).await?;
    let item = catalog::update(&db.async_connection, table, &path, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(item))
}

pub async fn list_projects(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    params: web::Query<ListParams>,
) -> ApiResult {
    list(CatalogTable::Projects, req, db, sessions, params).await
}

pub async fn create_project(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    request: web::Json<CreateCatalogItemRequest>,
) -> ApiResult {
    create(CatalogTable::Projects, req, db, sessions, request).await
}

pub async fn get_project(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> ApiResult {
    get(CatalogTable::Projects, req, db, sessions, path).await
}

pub async fn update_project(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
    request: web::Json<UpdateCatalogItemRequest>,
) -> ApiResult {
    update(CatalogTable::Projects, req, db, sessions, path, request).await
}

pub async fn list_work_types(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    params: web::Query<ListParams>,
) -> ApiResult {
    list(CatalogTable::WorkTypes, req, db, sessions, params).await
}

pub async fn create_work_type(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    request: web::Json<CreateCatalogItemRequest>,
) -> ApiResult {
    create(CatalogTable::WorkTypes, req, db, sessions, request).await
}

pub async fn get_work_type(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> ApiResult {
    get(CatalogTable::WorkTypes, req, db, sessions, path).await
}

pub async fn update_work_type(
    req: HttpRequest,
    db: web::Data<Arc<Database>>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
    request: web::Json<UpdateCatalogItemRequest>,
) -> ApiResult {
    update(CatalogTable::WorkTypes, req, db, sessions, path, request).await
}
