use crate::database::catalog::{self as db, CatalogTable};
use crate::database::AsyncDbConnection;
use crate::services::validation::{self, MAX_CATALOG_NAME_LEN, MAX_CODE_LEN, MAX_TEXT_LEN};
use crate::services::{ServiceError, ServiceResult};
use shared_types::{
    normalize_code, CatalogItem, CreateCatalogItemRequest, UpdateCatalogItemRequest,
    ValidationErrors,
};
use tracing::info;

pub async fn create(
    conn: &AsyncDbConnection,
    table: CatalogTable,
    request: CreateCatalogItemRequest,
) -> ServiceResult<CatalogItem> {
    let mut errors = ValidationErrors::new();
    let code = normalize_code(&request.code);
    if validation::require(&mut errors, "code", &code, "Code is required") {
        validation::max_length(&mut errors, "code", &code, MAX_CODE_LEN, "Code");
    }
    validate_details(&mut errors, &request.name, &request.description);
    errors.into_result()?;

    if db::get_item(conn.clone(), table, &code).await?.is_some() {
        return Err(ServiceError::business_rule(format!(
            "{} code already exists",
            table.label()
        )));
    }

    let item = CatalogItem {
        code,
        name: request.name.trim().to_string(),
        description: request.description.trim().to_string(),
        is_active: request.is_active,
        created_at: chrono::Utc::now().timestamp(),
    };
    db::insert_item(conn.clone(), table, &item).await?;

    info!("Created {} {}", table.label().to_lowercase(), item.code);
    Ok(item)
}

pub async fn update(
    conn: &AsyncDbConnection,
    table: CatalogTable,
    code: &str,
    request: UpdateCatalogItemRequest,
) -> ServiceResult<CatalogItem> {
    let mut errors = ValidationErrors::new();
    validate_details(&mut errors, &request.name, &request.description);
    errors.into_result()?;

    let code = normalize_code(code);
    let updated = db::update_item(
        conn.clone(),
        table,
        &code,
        request.name.trim(),
        request.description.trim(),
        request.is_active,
    )
    .await?;
    if !updated {
        return Err(not_found(table));
    }

    info!(
        is_active = request.is_active,
        "Updated {} {}",
        table.label().to_lowercase(),
        code
    );
    get(conn, table, &code).await
}

pub async fn get(
    conn: &AsyncDbConnection,
    table: CatalogTable,
    code: &str,
) -> ServiceResult<CatalogItem> {
    db::get_item(conn.clone(), table, &normalize_code(code))
        .await?
        .ok_or_else(|| not_found(table))
}

pub async fn list(
    conn: &AsyncDbConnection,
    table: CatalogTable,
    active_only: bool,
) -> ServiceResult<Vec<CatalogItem>> {
    Ok(db::list_items(conn.clone(), table, active_only).await?)
}

fn validate_details(errors: &mut ValidationErrors, name: &str, description: &str) {
    if validation::require(errors, "name", name, "Name is required") {
        validation::max_length(errors, "name", name.trim(), MAX_CATALOG_NAME_LEN, "Name");
    }
    validation::max_length(
        errors,
        "description",
        description.trim(),
        MAX_TEXT_LEN,
        "Description",
    );
}

fn not_found(table: CatalogTable) -> ServiceError {
    ServiceError::not_found(format!("{} not found", table.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::test_db;

    fn create_request(code: &str, name: &str) -> CreateCatalogItemRequest {
        CreateCatalogItemRequest {
            code: code.to_string(),
            name: name.to_string(),
            description: String::new(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_seeded_catalogs() {
        let (_dir, conn) = test_db();

        let projects = list(&conn, CatalogTable::Projects, false).await.unwrap();
        let codes: Vec<&str> = projects.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["INTERNAL", "PROJECT-A", "TRAINING"]);

        let work_types = list(&conn, CatalogTable::WorkTypes, true).await.unwrap();
        assert_eq!(work_types.len(), 6);
        assert_eq!(work_types[0].code, "ADMIN");
    }

    #[tokio::test]
    async fn test_create_and_duplicate() {
        let (_dir, conn) = test_db();

        let item = create(&conn, CatalogTable::Projects, create_request(" acme ", " Acme Corp "))
            .await
            .unwrap();
        assert_eq!(item.code, "ACME");
        assert_eq!(item.name, "Acme Corp");
        assert_eq!(get(&conn, CatalogTable::Projects, "acme").await.unwrap(), item);

        let err = create(&conn, CatalogTable::Projects, create_request("ACME", "Again"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Project code already exists");

        // Same code is free in the other table
        create(&conn, CatalogTable::WorkTypes, create_request("acme", "Acme work"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (_dir, conn) = test_db();

        let mut request = create_request("", " ");
        request.description = "d".repeat(MAX_TEXT_LEN + 1);
        match create(&conn, CatalogTable::WorkTypes, request).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.messages("code"), ["Code is required".to_string()]);
                assert_eq!(errors.messages("name"), ["Name is required".to_string()]);
                assert!(errors.has("description"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        let long_code = "C".repeat(MAX_CODE_LEN + 1);
        assert!(matches!(
            create(&conn, CatalogTable::WorkTypes, create_request(&long_code, "Long")).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_active_filter() {
        let (_dir, conn) = test_db();

        let updated = update(
            &conn,
            CatalogTable::Projects,
            "training",
            UpdateCatalogItemRequest {
                name: "Training & onboarding".to_string(),
                description: "Courses".to_string(),
                is_active: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.code, "TRAINING");
        assert_eq!(updated.name, "Training & onboarding");
        assert!(!updated.is_active);

        let active = list(&conn, CatalogTable::Projects, true).await.unwrap();
        assert!(active.iter().all(|p| p.code != "TRAINING"));
        assert_eq!(list(&conn, CatalogTable::Projects, false).await.unwrap().len(), 3);

        let err = update(
            &conn,
            CatalogTable::WorkTypes,
            "NOPE",
            UpdateCatalogItemRequest {
                name: "Nope".to_string(),
                description: String::new(),
                is_active: true,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Work type not found");
    }
}
