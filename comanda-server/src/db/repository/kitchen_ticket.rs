//! Kitchen ticket repository
//!
//! Ticket numbers are sequential per establishment; allocation happens
//! inside the order-creation transaction and the unique index backstops
//! concurrent allocations. Status updates are predicated on the current
//! status so a raced transition fails instead of clobbering.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::db::models::KitchenTicketRow;

#[derive(Debug, Clone, Default)]
pub struct TicketListFilter {
    pub status: Option<String>,
    pub from_millis: Option<i64>,
    pub to_millis: Option<i64>,
    pub limit: Option<i64>,
}

/// Next sequential ticket number for the establishment. Must run inside the
/// same transaction as the insert.
pub async fn next_ticket_number(
    conn: &mut SqliteConnection,
    establishment_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(ticket_number), 0) + 1 FROM kitchen_ticket WHERE establishment_id = ?",
    )
    .bind(establishment_id)
    .fetch_one(conn)
    .await
}

pub async fn insert(
    conn: &mut SqliteConnection,
    ticket: &KitchenTicketRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO kitchen_ticket (id, order_id, establishment_id, ticket_number, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&ticket.id)
    .bind(&ticket.order_id)
    .bind(&ticket.establishment_id)
    .bind(ticket.ticket_number)
    .bind(&ticket.status)
    .bind(ticket.created_at)
    .bind(ticket.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: &str,
    ticket_id: &str,
) -> Result<Option<KitchenTicketRow>, sqlx::Error> {
    sqlx::query_as::<_, KitchenTicketRow>(
        "SELECT * FROM kitchen_ticket WHERE id = ? AND establishment_id = ?",
    )
    .bind(ticket_id)
    .bind(establishment_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_order(
    pool: &SqlitePool,
    order_id: &str,
) -> Result<Option<KitchenTicketRow>, sqlx::Error> {
    sqlx::query_as::<_, KitchenTicketRow>("SELECT * FROM kitchen_ticket WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &SqlitePool,
    establishment_id: &str,
    filter: &TicketListFilter,
) -> Result<Vec<KitchenTicketRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM kitchen_ticket WHERE establishment_id = ");
    qb.push_bind(establishment_id);

    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(from) = filter.from_millis {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to_millis {
        qb.push(" AND created_at < ").push_bind(to);
    }

    qb.push(" ORDER BY ticket_number");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    qb.build_query_as::<KitchenTicketRow>().fetch_all(pool).await
}

/// Transition predicated on the current status — zero rows affected means
/// the ticket moved concurrently (or vanished) and the caller must re-read.
pub async fn update_status_cas(
    conn: &mut SqliteConnection,
    ticket_id: &str,
    from_status: &str,
    to_status: &str,
    updated_at: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE kitchen_ticket SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(to_status)
    .bind(updated_at)
    .bind(ticket_id)
    .bind(from_status)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn count_by_status(
    pool: &SqlitePool,
    establishment_id: &str,
    status: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM kitchen_ticket WHERE establishment_id = ? AND status = ?",
    )
    .bind(establishment_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

/// Delivered tickets whose last status change falls in `[from, to)`
pub async fn count_delivered_between(
    pool: &SqlitePool,
    establishment_id: &str,
    from_millis: i64,
    to_millis: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM kitchen_ticket WHERE establishment_id = ? AND status = 'DELIVERED' \
         AND updated_at >= ? AND updated_at < ?",
    )
    .bind(establishment_id)
    .bind(from_millis)
    .bind(to_millis)
    .fetch_one(pool)
    .await
}

/// `(created_at, updated_at)` of the most recently delivered tickets,
/// newest first — input for the average preparation time.
pub async fn recent_delivered_times(
    pool: &SqlitePool,
    establishment_id: &str,
    limit: i64,
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT created_at, updated_at FROM kitchen_ticket \
         WHERE establishment_id = ? AND status = 'DELIVERED' \
         ORDER BY updated_at DESC LIMIT ?",
    )
    .bind(establishment_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
