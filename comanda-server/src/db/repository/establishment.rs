//! Establishment repository

use sqlx::{SqliteConnection, SqlitePool};

use crate::db::models::Establishment;

pub async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Establishment>, sqlx::Error> {
    sqlx::query_as::<_, Establishment>("SELECT * FROM establishment WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Seed helper — establishment administration lives in the back-office
/// service; the server only needs this for provisioning and tests.
pub async fn insert(
    conn: &mut SqliteConnection,
    est: &Establishment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO establishment (id, name, active, has_kitchen, online_ordering, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&est.id)
    .bind(&est.name)
    .bind(est.active)
    .bind(est.has_kitchen)
    .bind(est.online_ordering)
    .bind(est.created_at)
    .execute(conn)
    .await?;
    Ok(())
}
