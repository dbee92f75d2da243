use rusqlite::Connection;

/// Timestamp of the seeded reference rows (2026-01-01T00:00:00Z)
const SEED_CREATED_AT: i64 = 1_767_225_600;

const DEFAULT_PROJECTS: &[(&str, &str, &str)] = &[
    ("INTERNAL", "Internal Tasks", "Internal company tasks"),
    ("PROJECT-A", "Project Alpha", "Main product development"),
    ("TRAINING", "Training & Development", "Learning and training activities"),
];

const DEFAULT_WORK_TYPES: &[(&str, &str, &str)] = &[
    ("ADMIN", "Administration", "Administrative tasks"),
    ("DEV", "Development", "Software development work"),
    ("MEET", "Meetings", "Meetings and discussions"),
    ("SUPPORT", "Support", "Customer support"),
    ("TEST", "Testing", "Quality assurance and testing"),
    ("TRAIN", "Training", "Training and learning"),
];

/// Run all database migrations
pub fn run_migrations(conn: &mut Connection) -> anyhow::Result<()> {
    let tx = conn.transaction()?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(500) NOT NULL,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            code VARCHAR(50) PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            description VARCHAR(1000) NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS work_types (
            code VARCHAR(50) PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            description VARCHAR(1000) NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS timesheets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            status VARCHAR NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
            total_hours REAL NOT NULL DEFAULT 0,
            created_at BIGINT NOT NULL,
            last_modified_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        )",
        [],
    )?;

    // One timesheet per user per period start
    tx.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_timesheets_user_start
            ON timesheets(user_id, start_date)",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS time_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timesheet_id INTEGER NOT NULL,
            created_by INTEGER NOT NULL,
            project_code VARCHAR(50) NOT NULL,
            work_type_code VARCHAR(50) NOT NULL,
            entry_date DATE NOT NULL,
            start_time VARCHAR,
            end_time VARCHAR,
            hours REAL NOT NULL CHECK (hours > 0 AND hours <= 24),
            notes VARCHAR(1000) NOT NULL DEFAULT '',
            created_at BIGINT NOT NULL,
            last_modified_at BIGINT NOT NULL,
            FOREIGN KEY (timesheet_id) REFERENCES timesheets (id) ON DELETE CASCADE,
            FOREIGN KEY (created_by) REFERENCES users (id),
            FOREIGN KEY (project_code) REFERENCES projects (code) ON DELETE RESTRICT,
            FOREIGN KEY (work_type_code) REFERENCES work_types (code) ON DELETE RESTRICT
        )",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_time_entries_timesheet
            ON time_entries(timesheet_id, entry_date)",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_time_entries_project
            ON time_entries(project_code)",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_time_entries_work_type
            ON time_entries(work_type_code)",
        [],
    )?;

    seed_catalog(&tx, "projects", DEFAULT_PROJECTS)?;
    seed_catalog(&tx, "work_types", DEFAULT_WORK_TYPES)?;

    tx.commit()?;
    tracing::debug!("Database migrations applied");

    Ok(())
}

fn seed_catalog(
    conn: &Connection,
    table: &str,
    rows: &[(&str, &str, &str)],
) -> anyhow::Result<()> {
    let sql = format!(
        "INSERT OR IGNORE INTO {} (code, name, description, is_active, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
        table
    );
    let mut stmt = conn.prepare(&sql)?;
    for (code, name, description) in rows {
        stmt.execute(rusqlite::params![code, name, description, SEED_CREATED_AT])?;
    }
    Ok(())
}
