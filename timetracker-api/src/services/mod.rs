//! Business rules of the time tracker. Every operation reports expected
//! failures through [`ServiceError`] rather than panicking.

pub mod catalog;
pub mod reports;
pub mod time_entries;
pub mod timesheets;
pub mod users;
pub mod validation;

use shared_types::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Field-level problems with the request
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    /// The caller does not own the resource
    #[error("{0}")]
    Unauthorized(String),
    /// The request is well formed but breaks a rule (closed timesheet, duplicate code, ...)
    #[error("{0}")]
    BusinessRule(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn unauthorized() -> Self {
        ServiceError::Unauthorized("Unauthorized access".to_string())
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        ServiceError::BusinessRule(message.into())
    }
}
