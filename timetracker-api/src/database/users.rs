use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use shared_types::User;

/// User row together with the stored credential
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

pub async fn insert_user(
    conn: AsyncDbConnection,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO users (email, password_hash, first_name, last_name, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)
         RETURNING id",
        params![email, password_hash, first_name, last_name, now],
        |row| row.get(0),
    )?;

    Ok(User {
        id,
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        is_active: true,
        created_at: now,
    })
}

pub async fn email_exists(conn: AsyncDbConnection, email: &str) -> Result<bool> {
    let conn = conn.lock().await?;

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

pub async fn get_user(conn: AsyncDbConnection, id: i64) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            "SELECT id, email, first_name, last_name, is_active, created_at
             FROM users
             WHERE id = ?1",
            params![id],
            map_row_to_user,
        )
        .optional()?;

    Ok(user)
}

pub async fn get_credentials_by_email(
    conn: AsyncDbConnection,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let conn = conn.lock().await?;

    let credentials = conn
        .query_row(
            "SELECT id, email, first_name, last_name, is_active, created_at, password_hash
             FROM users
             WHERE email = ?1",
            params![email],
            |row| {
                Ok(UserCredentials {
                    user: map_row_to_user(row)?,
                    password_hash: row.get(6)?,
                })
            },
        )
        .optional()?;

    Ok(credentials)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}
