//! Product catalog repository (read surface for order creation)

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::db::models::Product;

/// Resolve the requested product ids to active, tenant-scoped products.
///
/// Returns only the products that exist, are active, and belong to the
/// establishment — the caller compares the count against the requested
/// distinct ids to detect missing/inactive/foreign products.
pub async fn find_active_by_ids(
    pool: &SqlitePool,
    establishment_id: &str,
    ids: &[String],
) -> Result<Vec<Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT * FROM product WHERE establishment_id = ",
    );
    qb.push_bind(establishment_id);
    qb.push(" AND active = 1 AND id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    qb.push(")");

    qb.build_query_as::<Product>().fetch_all(pool).await
}

/// Active products of an establishment (the public menu)
pub async fn list_active(
    pool: &SqlitePool,
    establishment_id: &str,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT * FROM product WHERE establishment_id = ? AND active = 1 ORDER BY name",
    )
    .bind(establishment_id)
    .fetch_all(pool)
    .await
}

/// Seed helper — catalog management lives in the back-office service.
pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product (id, establishment_id, name, price, active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.id)
    .bind(&product.establishment_id)
    .bind(&product.name)
    .bind(product.price)
    .bind(product.active)
    .bind(product.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_price(
    conn: &mut SqliteConnection,
    id: &str,
    price: f64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE product SET price = ? WHERE id = ?")
        .bind(price)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
