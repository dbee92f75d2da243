use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Registered account. The password hash stays inside the API crate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request to register a new account
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned on successful login. `token` goes into `Authorization: Bearer`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
