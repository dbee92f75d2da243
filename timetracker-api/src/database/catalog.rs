use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use shared_types::CatalogItem;

/// The two code-keyed reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTable {
    Projects,
    WorkTypes,
}

impl CatalogTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogTable::Projects => "projects",
            CatalogTable::WorkTypes => "work_types",
        }
    }

    /// Human label used in messages ("Project code is required")
    pub fn label(&self) -> &'static str {
        match self {
            CatalogTable::Projects => "Project",
            CatalogTable::WorkTypes => "Work type",
        }
    }
}

pub async fn insert_item(
    conn: AsyncDbConnection,
    table: CatalogTable,
    item: &CatalogItem,
) -> Result<()> {
    let conn = conn.lock().await?;

    conn.execute(
        &format!(
            "INSERT INTO {} (code, name, description, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            table.table_name()
        ),
        params![
            item.code,
            item.name,
            item.description,
            item.is_active,
            item.created_at
        ],
    )?;

    Ok(())
}

/// Returns `false` when no row has the code
pub async fn update_item(
    conn: AsyncDbConnection,
    table: CatalogTable,
    code: &str,
    name: &str,
    description: &str,
    is_active: bool,
) -> Result<bool> {
    let conn = conn.lock().await?;

    let rows = conn.execute(
        &format!(
            "UPDATE {} SET name = ?1, description = ?2, is_active = ?3 WHERE code = ?4",
            table.table_name()
        ),
        params![name, description, is_active, code],
    )?;

    Ok(rows > 0)
}

pub async fn get_item(
    conn: AsyncDbConnection,
    table: CatalogTable,
    code: &str,
) -> Result<Option<CatalogItem>> {
    let conn = conn.lock().await?;

    let item = conn
        .query_row(
            &format!(
                "SELECT code, name, description, is_active, created_at FROM {} WHERE code = ?1",
                table.table_name()
            ),
            params![code],
            map_row_to_item,
        )
        .optional()?;

    Ok(item)
}

pub async fn list_items(
    conn: AsyncDbConnection,
    table: CatalogTable,
    active_only: bool,
) -> Result<Vec<CatalogItem>> {
    let conn = conn.lock().await?;

    let mut query = format!(
        "SELECT code, name, description, is_active, created_at FROM {}",
        table.table_name()
    );
    if active_only {
        query.push_str(" WHERE is_active = 1");
    }
    query.push_str(" ORDER BY code");

    let mut stmt = conn.prepare(&query)?;
    let rows = stmt.query_map([], map_row_to_item)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }

    Ok(items)
}

fn map_row_to_item(row: &Row) -> rusqlite::Result<CatalogItem> {
    Ok(CatalogItem {
        code: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_active: row.get(3)?,
        created_at: row.get(4)?,
    })
}
