//! Order repository
//!
//! The paid_amount update carries a compare-and-swap predicate on the value
//! the caller previously read: two concurrent settlements on one order
//! cannot silently lose an update — the loser sees zero rows affected and
//! rolls its transaction back.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::db::models::{OrderItemRow, OrderRow};

/// List filter. Date range is half-open `[from, to)` in Unix millis,
/// converted from business-timezone dates at the API layer.
#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub from_millis: Option<i64>,
    pub to_millis: Option<i64>,
    /// Matches order code or customer name, case-insensitive substring
    pub search: Option<String>,
}

pub async fn insert(conn: &mut SqliteConnection, order: &OrderRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO orders (id, establishment_id, code, customer_name, status, \
         payment_status, total_amount, paid_amount, created_by, created_at, closed_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.establishment_id)
    .bind(&order.code)
    .bind(&order.customer_name)
    .bind(&order.status)
    .bind(&order.payment_status)
    .bind(order.total_amount)
    .bind(order.paid_amount)
    .bind(&order.created_by)
    .bind(order.created_at)
    .bind(order.closed_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    item: &OrderItemRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, product_name, quantity, unit_price, note) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(&item.note)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: &str,
    order_id: &str,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ? AND establishment_id = ?")
        .bind(order_id)
        .bind(establishment_id)
        .fetch_optional(pool)
        .await
}

pub async fn items_for(
    pool: &SqlitePool,
    order_id: &str,
) -> Result<Vec<OrderItemRow>, sqlx::Error> {
    sqlx::query_as::<_, OrderItemRow>(
        "SELECT * FROM order_item WHERE order_id = ? ORDER BY rowid",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn list(
    pool: &SqlitePool,
    establishment_id: &str,
    filter: &OrderListFilter,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM orders WHERE establishment_id = ");
    qb.push_bind(establishment_id);

    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(payment_status) = &filter.payment_status {
        qb.push(" AND payment_status = ").push_bind(payment_status.clone());
    }
    if let Some(from) = filter.from_millis {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to_millis {
        qb.push(" AND created_at < ").push_bind(to);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (code LIKE ").push_bind(pattern.clone());
        qb.push(" OR customer_name LIKE ").push_bind(pattern);
        qb.push(")");
    }

    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<OrderRow>().fetch_all(pool).await
}

/// Apply a settlement to the order financials, predicated on the previously
/// read `paid_amount`. Returns the number of rows affected — zero means a
/// concurrent writer got there first.
pub async fn settle_payment_cas(
    conn: &mut SqliteConnection,
    order_id: &str,
    expected_paid: f64,
    new_paid: f64,
    new_payment_status: &str,
    closed_at: Option<i64>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET paid_amount = ?, payment_status = ?, closed_at = ? \
         WHERE id = ? AND paid_amount = ?",
    )
    .bind(new_paid)
    .bind(new_payment_status)
    .bind(closed_at)
    .bind(order_id)
    .bind(expected_paid)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Lifecycle status update. No adjacency restriction here — only the kitchen
/// ticket machine gates its transitions.
pub async fn update_status(
    conn: &mut SqliteConnection,
    order_id: &str,
    status: &str,
    closed_at: Option<i64>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = ?, closed_at = ? WHERE id = ?")
        .bind(status)
        .bind(closed_at)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
