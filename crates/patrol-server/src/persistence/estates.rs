//! Estate persistence operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use patrol_core::EstateRecord;
use sqlx::SqlitePool;

/// Insert an estate, or reuse the existing one with the same dimensions and
/// refresh its `created_at`.
///
/// Returns the id of the stored estate, which differs from `id` when an estate
/// of the same size already existed.
pub async fn upsert_estate(pool: &SqlitePool, id: &str, length: u32, width: u32) -> Result<String> {
    let stored_id: String = sqlx::query_scalar(
        r#"
        INSERT INTO estates (id, length, width, created_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(length, width) DO UPDATE SET
            created_at = excluded.created_at
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(i64::from(length))
    .bind(i64::from(width))
    .bind(Utc::now().to_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(stored_id)
}

/// Load one estate by ID.
pub async fn get_estate(pool: &SqlitePool, id: &str) -> Result<Option<EstateRecord>> {
    let row = sqlx::query_as::<_, EstateRow>(
        "SELECT id, length, width, created_at FROM estates WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(EstateRecord::try_from).transpose()
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct EstateRow {
    id: String,
    length: i64,
    width: i64,
    created_at: String,
}

impl TryFrom<EstateRow> for EstateRecord {
    type Error = anyhow::Error;

    fn try_from(row: EstateRow) -> Result<Self> {
        let length = u32::try_from(row.length)
            .with_context(|| format!("estate {} has invalid length {}", row.id, row.length))?;
        let width = u32::try_from(row.width)
            .with_context(|| format!("estate {} has invalid width {}", row.id, row.width))?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(EstateRecord {
            id: row.id,
            length,
            width,
            created_at,
        })
    }
}
