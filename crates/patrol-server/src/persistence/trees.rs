//! Tree persistence operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use patrol_core::TreeRecord;
use sqlx::SqlitePool;

/// Check whether a tree already stands at `(x, y)` on the estate.
pub async fn tree_exists(pool: &SqlitePool, estate_id: &str, x: u32, y: u32) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM trees WHERE estate_id = ?1 AND x = ?2 AND y = ?3)",
    )
    .bind(estate_id)
    .bind(i64::from(x))
    .bind(i64::from(y))
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Insert a tree.
///
/// Returns `false` when the unique `(estate_id, x, y)` index rejects the row,
/// which covers a concurrent insert racing past [`tree_exists`].
pub async fn insert_tree(pool: &SqlitePool, tree: &TreeRecord) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO trees (id, estate_id, x, y, height, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&tree.id)
    .bind(&tree.estate_id)
    .bind(i64::from(tree.x))
    .bind(i64::from(tree.y))
    .bind(i64::from(tree.height))
    .bind(tree.created_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Load every tree planted on an estate.
pub async fn load_trees(pool: &SqlitePool, estate_id: &str) -> Result<Vec<TreeRecord>> {
    let rows = sqlx::query_as::<_, TreeRow>(
        "SELECT id, estate_id, x, y, height, created_at FROM trees WHERE estate_id = ?1",
    )
    .bind(estate_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct TreeRow {
    id: String,
    estate_id: String,
    x: i64,
    y: i64,
    height: i64,
    created_at: String,
}

impl TryFrom<TreeRow> for TreeRecord {
    type Error = anyhow::Error;

    fn try_from(row: TreeRow) -> Result<Self> {
        let column = |name: &str, value: i64| {
            u32::try_from(value)
                .with_context(|| format!("tree {} has invalid {} {}", row.id, name, value))
        };
        let x = column("x", row.x)?;
        let y = column("y", row.y)?;
        let height = column("height", row.height)?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(TreeRecord {
            id: row.id,
            estate_id: row.estate_id,
            x,
            y,
            height,
            created_at,
        })
    }
}
