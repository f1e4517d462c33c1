//! Payment repository — append-only ledger, rows are never updated

use sqlx::{SqliteConnection, SqlitePool};

use crate::db::models::PaymentRow;

pub async fn insert(conn: &mut SqliteConnection, payment: &PaymentRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO payment (id, order_id, method, amount, received_by, received_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(&payment.method)
    .bind(payment.amount)
    .bind(&payment.received_by)
    .bind(payment.received_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn list_by_order(
    pool: &SqlitePool,
    order_id: &str,
) -> Result<Vec<PaymentRow>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRow>(
        "SELECT * FROM payment WHERE order_id = ? ORDER BY received_at, rowid",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn count_by_order(pool: &SqlitePool, order_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payment WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(pool)
        .await
}
