//! Shared test harness: in-memory database, services, seed helpers
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use comanda_server::audit::AuditService;
use comanda_server::db::models::{Establishment, Product};
use comanda_server::db::repository::{establishment, product};
use comanda_server::{EventBus, KitchenService, OrderLedger, SettlementService};
use shared::util::now_millis;

pub struct TestEnv {
    pub pool: SqlitePool,
    pub bus: Arc<EventBus>,
    pub ledger: OrderLedger,
    pub settlement: SettlementService,
    pub kitchen: KitchenService,
    shutdown: CancellationToken,
}

pub async fn setup() -> TestEnv {
    // Single connection so every handle sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");

    let shutdown = CancellationToken::new();
    let bus = Arc::new(EventBus::new());
    let audit = AuditService::spawn(pool.clone(), 64, shutdown.clone());

    let ledger = OrderLedger::new(pool.clone(), audit.clone());
    let settlement = SettlementService::new(
        pool.clone(),
        audit.clone(),
        bus.clone(),
        ledger.clone(),
    );
    let kitchen = KitchenService::new(pool.clone(), audit, bus.clone(), chrono_tz::UTC);

    TestEnv {
        pool,
        bus,
        ledger,
        settlement,
        kitchen,
        shutdown,
    }
}

pub async fn seed_establishment(
    pool: &SqlitePool,
    id: &str,
    has_kitchen: bool,
    online_ordering: bool,
) {
    let est = Establishment {
        id: id.to_string(),
        name: format!("Establishment {}", id),
        active: true,
        has_kitchen,
        online_ordering,
        created_at: now_millis(),
    };
    let mut conn = pool.acquire().await.unwrap();
    establishment::insert(&mut conn, &est).await.unwrap();
}

pub async fn seed_product(pool: &SqlitePool, establishment_id: &str, id: &str, price: f64) {
    let p = Product {
        id: id.to_string(),
        establishment_id: establishment_id.to_string(),
        name: format!("Product {}", id),
        price,
        active: true,
        created_at: now_millis(),
    };
    let mut conn = pool.acquire().await.unwrap();
    product::insert(&mut conn, &p).await.unwrap();
}

pub async fn deactivate_product(pool: &SqlitePool, id: &str) {
    sqlx::query("UPDATE product SET active = 0 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

/// The audit pipeline is asynchronous; poll briefly for the expected count.
pub async fn wait_for_audit(
    pool: &SqlitePool,
    establishment_id: &str,
    action: &str,
    expected: i64,
) -> bool {
    for _ in 0..50 {
        let count = comanda_server::db::repository::audit_log::count_by_action(
            pool,
            establishment_id,
            action,
        )
        .await
        .unwrap();
        if count >= expected {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
