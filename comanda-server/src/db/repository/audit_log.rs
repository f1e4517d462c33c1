//! Audit log repository — append-only, rows are never updated or deleted

use sqlx::SqlitePool;

/// New audit entry, written by the audit worker
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub timestamp: i64,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub establishment_id: String,
    pub operator_id: Option<String>,
    pub details: Option<String>,
}

pub async fn insert(pool: &SqlitePool, entry: &NewAuditLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (timestamp, action, resource_type, resource_id, \
         establishment_id, operator_id, details) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.timestamp)
    .bind(&entry.action)
    .bind(&entry.resource_type)
    .bind(&entry.resource_id)
    .bind(&entry.establishment_id)
    .bind(&entry.operator_id)
    .bind(&entry.details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count_by_action(
    pool: &SqlitePool,
    establishment_id: &str,
    action: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM audit_log WHERE establishment_id = ? AND action = ?",
    )
    .bind(establishment_id)
    .bind(action)
    .fetch_one(pool)
    .await
}
