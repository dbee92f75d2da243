use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Field name to the messages raised against it
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(())` when nothing was recorded, otherwise hands the map back as the error.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "ValidationErrors::is_empty")]
    pub validation_errors: ValidationErrors,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            validation_errors: ValidationErrors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("hours", "Hours must be greater than 0 and at most 24");
        errors.add("project_code", "Project code is required");
        errors.add("hours", "second");

        assert_eq!(errors.messages("hours").len(), 2);
        assert!(errors.has("project_code"));
        assert!(errors.messages("notes").is_empty());
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_error_response_omits_empty_validation_errors() {
        let json = serde_json::to_value(ErrorResponse::new("Timesheet not found")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Timesheet not found" }));
    }
}
