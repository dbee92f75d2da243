pub mod catalog;
pub mod migrations;
pub mod time_entries;
pub mod timesheets;
pub mod users;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type PooledDbConnection = PooledConnection<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> anyhow::Result<PooledDbConnection> {
        self.pool
            .get()
            .map_err(|e| anyhow::anyhow!("Failed to get DB connection from pool: {}", e))
    }
}

pub struct Database {
    pub async_connection: AsyncDbConnection,
}

impl Database {
    /// Create a new database connection and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Migrate on a plain connection before the pool opens
        {
            let mut conn = Connection::open(db_path)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            migrations::run_migrations(&mut conn)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Database {
            async_connection: AsyncDbConnection::new(pool),
        })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let conn = self.async_connection.lock().await?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tempfile::TempDir;

    /// Fresh migrated database in a temporary directory. Keep the `TempDir`
    /// alive for as long as the connection is used.
    pub fn test_db() -> (TempDir, AsyncDbConnection) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("timetracker.db")).unwrap();
        (dir, db.async_connection)
    }

    pub async fn create_user(conn: &AsyncDbConnection, email: &str) -> i64 {
        super::users::insert_user(conn.clone(), email, "not-a-real-hash", "Test", "User")
            .await
            .unwrap()
            .id
    }

    pub async fn deactivate_user(conn: &AsyncDbConnection, user_id: i64) {
        let conn = conn.lock().await.unwrap();
        conn.execute("UPDATE users SET is_active = 0 WHERE id = ?1", [user_id])
            .unwrap();
    }
}
