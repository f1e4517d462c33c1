//! Compare-and-swap guards against concurrent settlement / transition races

mod common;

use comanda_server::db::repository::{kitchen_ticket, order};
use shared::order::OrderItemInput;

use common::{seed_establishment, seed_product, setup, TestEnv};

async fn create_order(env: &TestEnv) -> comanda_server::db::models::OrderDetail {
    env.settlement
        .create_order(
            "est-1",
            comanda_server::orders::CreateOrderRequest {
                items: vec![OrderItemInput {
                    product_id: "prod-a".to_string(),
                    quantity: 2,
                    note: None,
                }],
                code: None,
                customer_name: None,
                pay_now: false,
                payment_method: None,
            },
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn stale_paid_amount_predicate_updates_nothing() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;
    let order = create_order(&env).await;

    let mut conn = env.pool.acquire().await.unwrap();

    // A writer that read paid_amount=10.0 (stale — it is actually 0.0)
    // must not land its update.
    let affected = order::settle_payment_cas(&mut conn, &order.id, 10.0, 30.0, "PARTIAL", None)
        .await
        .unwrap();
    assert_eq!(affected, 0);

    // The matching predicate lands.
    let affected = order::settle_payment_cas(&mut conn, &order.id, 0.0, 20.0, "PARTIAL", None)
        .await
        .unwrap();
    assert_eq!(affected, 1);
    drop(conn);

    let reloaded = env.ledger.get("est-1", &order.id).await.unwrap();
    assert_eq!(reloaded.paid_amount, 20.0);
}

#[tokio::test]
async fn stale_ticket_status_predicate_updates_nothing() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;
    let order = create_order(&env).await;
    let ticket_id = order.ticket.unwrap().id;

    let mut conn = env.pool.acquire().await.unwrap();

    // Ticket is QUEUE; a writer that believes it is PREPARING loses.
    let affected =
        kitchen_ticket::update_status_cas(&mut conn, &ticket_id, "PREPARING", "READY", 0)
            .await
            .unwrap();
    assert_eq!(affected, 0);

    let affected =
        kitchen_ticket::update_status_cas(&mut conn, &ticket_id, "QUEUE", "PREPARING", 1)
            .await
            .unwrap();
    assert_eq!(affected, 1);
}
