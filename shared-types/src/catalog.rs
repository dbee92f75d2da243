use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Row of a code-keyed reference table (projects and work types share the shape)
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
pub struct CatalogItem {
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: i64,
}

pub type Project = CatalogItem;
pub type WorkType = CatalogItem;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCatalogItemRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Update addressed by code; the code itself is immutable
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateCatalogItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CatalogItemsResponse {
    pub items: Vec<CatalogItem>,
}

fn default_active() -> bool {
    true
}

/// Codes are compared and stored trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateCatalogItemRequest =
            serde_json::from_str(r#"{"code":"ops","name":"Operations"}"#).unwrap();
        assert!(req.is_active);
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  project-a "), "PROJECT-A");
    }
}
