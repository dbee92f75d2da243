use crate::database::users as db;
use crate::database::AsyncDbConnection;
use crate::services::validation::{self, MAX_EMAIL_LEN, MAX_PERSON_NAME_LEN};
use crate::services::{ServiceError, ServiceResult};
use anyhow::Context;
use shared_types::{LoginRequest, RegisterUserRequest, User, ValidationErrors};
use tracing::{info, warn};

const INVALID_LOGIN: &str = "Invalid email or password";

pub async fn register(
    conn: &AsyncDbConnection,
    request: RegisterUserRequest,
    bcrypt_cost: u32,
) -> ServiceResult<User> {
    validate_registration(&request)?;

    let email = request.email.to_lowercase();
    if db::email_exists(conn.clone(), &email).await? {
        return Err(ServiceError::business_rule("Email already exists"));
    }

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt_cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")?;

    let user = db::insert_user(
        conn.clone(),
        &email,
        &password_hash,
        request.first_name.trim(),
        request.last_name.trim(),
    )
    .await?;

    info!(user_id = user.id, "Registered user {}", user.email);
    Ok(user)
}

pub async fn login(conn: &AsyncDbConnection, request: LoginRequest) -> ServiceResult<User> {
    let email = request.email.trim().to_lowercase();

    let Some(credentials) = db::get_credentials_by_email(conn.clone(), &email).await? else {
        warn!("Login rejected for unknown email");
        return Err(ServiceError::business_rule(INVALID_LOGIN));
    };

    let password = request.password;
    let hash = credentials.password_hash;
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task failed")?
        .context("Stored password hash is malformed")?;

    if !matches {
        warn!(user_id = credentials.user.id, "Login rejected: wrong password");
        return Err(ServiceError::business_rule(INVALID_LOGIN));
    }

    if !credentials.user.is_active {
        warn!(user_id = credentials.user.id, "Login rejected: inactive account");
        return Err(ServiceError::business_rule("Account is inactive"));
    }

    info!(user_id = credentials.user.id, "User logged in");
    Ok(credentials.user)
}

pub async fn get_user(conn: &AsyncDbConnection, id: i64) -> ServiceResult<User> {
    db::get_user(conn.clone(), id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

fn validate_registration(request: &RegisterUserRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if validation::require(&mut errors, "email", &request.email, "Email is required") {
        if !validation::is_valid_email(&request.email) {
            errors.add("email", "Email format is invalid");
        }
        validation::max_length(&mut errors, "email", &request.email, MAX_EMAIL_LEN, "Email");
    }

    if validation::require(&mut errors, "password", &request.password, "Password is required")
        && !validation::is_valid_password(&request.password)
    {
        errors.add(
            "password",
            "Password must be at least 8 characters, contain uppercase, lowercase, number, and special character",
        );
    }

    for (field, value, label) in [
        ("first_name", &request.first_name, "First name"),
        ("last_name", &request.last_name, "Last name"),
    ] {
        if validation::require(&mut errors, field, value, &format!("{} is required", label)) {
            validation::max_length(&mut errors, field, value.trim(), MAX_PERSON_NAME_LEN, label);
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{deactivate_user, test_db};

    // Lowest cost bcrypt accepts; keeps the tests fast
    const TEST_COST: u32 = 4;

    fn registration(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            password: "Secret#123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (_dir, conn) = test_db();

        let user = register(&conn, registration("Ada@Example.com"), TEST_COST)
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_active);
        assert_eq!(user.display_name(), "Ada Lovelace");

        let logged_in = login(&conn, login_request("ADA@example.com", "Secret#123"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        assert_eq!(get_user(&conn, user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_case_insensitively() {
        let (_dir, conn) = test_db();
        register(&conn, registration("ada@example.com"), TEST_COST)
            .await
            .unwrap();

        let err = register(&conn, registration("ADA@example.com"), TEST_COST)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(msg) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_register_reports_every_invalid_field() {
        let (_dir, conn) = test_db();
        let request = RegisterUserRequest {
            email: "not-an-email".to_string(),
            password: "weak".to_string(),
            first_name: " ".to_string(),
            last_name: String::new(),
        };

        match register(&conn, request, TEST_COST).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.messages("email"), ["Email format is invalid".to_string()]);
                assert!(errors.has("password"));
                assert_eq!(errors.messages("first_name"), ["First name is required".to_string()]);
                assert_eq!(errors.messages("last_name"), ["Last name is required".to_string()]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (_dir, conn) = test_db();
        let user = register(&conn, registration("ada@example.com"), TEST_COST)
            .await
            .unwrap();

        let wrong_password = login(&conn, login_request("ada@example.com", "Wrong#123"))
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), INVALID_LOGIN);

        let unknown = login(&conn, login_request("bob@example.com", "Secret#123"))
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), INVALID_LOGIN);

        deactivate_user(&conn, user.id).await;
        let inactive = login(&conn, login_request("ada@example.com", "Secret#123"))
            .await
            .unwrap_err();
        assert_eq!(inactive.to_string(), "Account is inactive");
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            get_user(&conn, 999).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
