//! End-to-end settlement flows: order creation, payment application,
//! lifecycle status, public ordering.

mod common;

use comanda_server::orders::ledger::OrderListFilter;
use comanda_server::orders::{CreateOrderRequest, PublicOrderRequest};
use comanda_server::AppError;
use shared::event::PosEvent;
use shared::order::{
    OrderItemInput, OrderStatus, PaymentInput, PaymentMethod, PaymentStatus,
};

use common::{seed_establishment, seed_product, setup};

fn item(product_id: &str, quantity: i64) -> OrderItemInput {
    OrderItemInput {
        product_id: product_id.to_string(),
        quantity,
        note: None,
    }
}

fn staff_request(items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        items,
        code: None,
        customer_name: None,
        pay_now: false,
        payment_method: None,
    }
}

fn cash(amount: f64) -> PaymentInput {
    PaymentInput {
        method: PaymentMethod::Cash,
        amount: Some(amount),
    }
}

async fn order_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_order_computes_total_and_snapshots() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;
    seed_product(&env.pool, "est-1", "prod-b", 7.5).await;

    let order = env
        .settlement
        .create_order(
            "est-1",
            staff_request(vec![item("prod-a", 2), item("prod-b", 1)]),
            Some("user-1".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(order.total_amount, 57.5);
    assert_eq!(order.paid_amount, 0.0);
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.created_by.as_deref(), Some("user-1"));
    assert!(order.closed_at.is_none());
    assert!(order.ticket.is_none());

    assert_eq!(order.items.len(), 2);
    let line_a = order
        .items
        .iter()
        .find(|i| i.product_id == "prod-a")
        .unwrap();
    assert_eq!(line_a.product_name, "Product prod-a");
    assert_eq!(line_a.quantity, 2);
    assert_eq!(line_a.unit_price, 25.0);
}

#[tokio::test]
async fn catalog_price_change_does_not_alter_existing_order() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    // Price goes up after the order was placed
    let mut conn = env.pool.acquire().await.unwrap();
    comanda_server::db::repository::product::update_price(&mut conn, "prod-a", 99.0)
        .await
        .unwrap();
    drop(conn);

    let reloaded = env.ledger.get("est-1", &order.id).await.unwrap();
    assert_eq!(reloaded.items[0].unit_price, 10.0);
    assert_eq!(reloaded.total_amount, 10.0);

    // A fresh order sees the new price
    let fresh = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();
    assert_eq!(fresh.total_amount, 99.0);
}

#[tokio::test]
async fn empty_item_list_is_rejected() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;

    let result = env
        .settlement
        .create_order("est-1", staff_request(vec![]), None)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(order_count(&env.pool).await, 0);
}

#[tokio::test]
async fn unknown_product_rejects_whole_order() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let result = env
        .settlement
        .create_order(
            "est-1",
            staff_request(vec![item("prod-a", 1), item("prod-missing", 1)]),
            None,
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    // No partial order was written
    assert_eq!(order_count(&env.pool).await, 0);
}

#[tokio::test]
async fn inactive_product_rejects_order() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;
    common::deactivate_product(&env.pool, "prod-a").await;

    let result = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn foreign_tenant_product_rejects_order() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_establishment(&env.pool, "est-2", false, false).await;
    seed_product(&env.pool, "est-2", "prod-other", 10.0).await;

    let result = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-other", 1)]), None)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn pay_now_settles_immediately() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 12.5).await;

    let mut request = staff_request(vec![item("prod-a", 2)]);
    request.pay_now = true;
    request.payment_method = Some(PaymentMethod::Card);

    let order = env
        .settlement
        .create_order("est-1", request, Some("user-1".to_string()))
        .await
        .unwrap();

    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.paid_amount, 25.0);
    assert!(order.closed_at.is_some());
    assert_eq!(order.payments.len(), 1);
    assert_eq!(order.payments[0].method, "CARD");
    assert_eq!(order.payments[0].amount, 25.0);
}

#[tokio::test]
async fn kitchen_establishment_spawns_sequential_tickets() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let mut rx = env.bus.subscribe("est-1");

    let first = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();
    let second = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    let t1 = first.ticket.expect("first order should spawn a ticket");
    let t2 = second.ticket.expect("second order should spawn a ticket");
    assert_eq!(t1.ticket_number, 1);
    assert_eq!(t2.ticket_number, 2);
    assert_eq!(t1.status, "QUEUE");

    // Staff flow broadcasts ticket creation
    match rx.try_recv().unwrap() {
        PosEvent::TicketCreated {
            ticket_number,
            order_id,
            ..
        } => {
            assert_eq!(ticket_number, 1);
            assert_eq!(order_id, first.id);
        }
        other => panic!("expected TicketCreated, got {:?}", other),
    }
}

#[tokio::test]
async fn partial_then_full_payment_settles_order() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 2)]), None)
        .await
        .unwrap();
    assert_eq!(order.total_amount, 50.0);
    assert!(order.ticket.is_some());

    let after_first = env
        .ledger
        .apply_payment("est-1", &order.id, cash(20.0), Some("cashier".to_string()))
        .await
        .unwrap();
    assert_eq!(after_first.payment_status, PaymentStatus::Partial);
    assert_eq!(after_first.paid_amount, 20.0);
    assert!(after_first.closed_at.is_none());

    let after_second = env
        .ledger
        .apply_payment("est-1", &order.id, cash(30.0), Some("cashier".to_string()))
        .await
        .unwrap();
    assert_eq!(after_second.payment_status, PaymentStatus::Paid);
    assert_eq!(after_second.paid_amount, 50.0);
    assert!(after_second.closed_at.is_some());
    assert_eq!(after_second.payments.len(), 2);
    // Financial settlement does not touch the lifecycle axis
    assert_eq!(after_second.status, OrderStatus::Open);
}

#[tokio::test]
async fn payment_on_paid_order_fails_without_writes() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let mut request = staff_request(vec![item("prod-a", 1)]);
    request.pay_now = true;

    let order = env
        .settlement
        .create_order("est-1", request, None)
        .await
        .unwrap();

    let result = env
        .ledger
        .apply_payment("est-1", &order.id, cash(5.0), None)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let count = comanda_server::db::repository::payment::count_by_order(&env.pool, &order.id)
        .await
        .unwrap();
    assert_eq!(count, 1, "rejected payment must not be written");
}

#[tokio::test]
async fn payment_on_cancelled_order_fails() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    env.ledger
        .update_status("est-1", &order.id, OrderStatus::Cancelled, None)
        .await
        .unwrap();

    let result = env
        .ledger
        .apply_payment("est-1", &order.id, cash(10.0), None)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let count = comanda_server::db::repository::payment::count_by_order(&env.pool, &order.id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn omitted_amount_applies_full_total_even_when_partially_paid() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 2)]), None)
        .await
        .unwrap();

    env.ledger
        .apply_payment("est-1", &order.id, cash(20.0), None)
        .await
        .unwrap();

    // No amount: the full total (50.0) is applied, not the remaining 30.0
    let settled = env
        .ledger
        .apply_payment(
            "est-1",
            &order.id,
            PaymentInput {
                method: PaymentMethod::Pix,
                amount: None,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(settled.paid_amount, 70.0);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.payments[1].amount, 50.0);
}

#[tokio::test]
async fn overpayment_is_accepted_and_reads_paid() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 25.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 2)]), None)
        .await
        .unwrap();

    let settled = env
        .ledger
        .apply_payment("est-1", &order.id, cash(80.0), None)
        .await
        .unwrap();

    assert_eq!(settled.paid_amount, 80.0);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert!(settled.closed_at.is_some());
}

#[tokio::test]
async fn invalid_payment_amounts_are_rejected() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    for bad in [0.0, -5.0, f64::NAN, 2_000_000.0] {
        let result = env
            .ledger
            .apply_payment("est-1", &order.id, cash(bad), None)
            .await;
        assert!(
            matches!(result, Err(AppError::Validation(_))),
            "amount {} should be rejected",
            bad
        );
    }
}

#[tokio::test]
async fn status_updates_are_unrestricted_and_manage_closed_at() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    let closed = env
        .ledger
        .update_status("est-1", &order.id, OrderStatus::Closed, None)
        .await
        .unwrap();
    assert_eq!(closed.status, OrderStatus::Closed);
    assert!(closed.closed_at.is_some());

    // Reopening clears the close timestamp; no adjacency check applies
    let reopened = env
        .ledger
        .update_status("est-1", &order.id, OrderStatus::Open, None)
        .await
        .unwrap();
    assert_eq!(reopened.status, OrderStatus::Open);
    assert!(reopened.closed_at.is_none());

    let cancelled = env
        .ledger
        .update_status("est-1", &order.id, OrderStatus::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.closed_at.is_none());
}

#[tokio::test]
async fn public_order_requires_online_ordering() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let result = env
        .settlement
        .create_public_order(
            "est-1",
            PublicOrderRequest {
                items: vec![item("prod-a", 1)],
                customer_name: Some("Ana".to_string()),
            },
        )
        .await;

    // Not-found regardless of item validity
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(order_count(&env.pool).await, 0);
}

#[tokio::test]
async fn public_order_creates_and_emits_new_order_event() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", true, true).await;
    seed_product(&env.pool, "est-1", "prod-a", 15.0).await;

    let mut rx = env.bus.subscribe("est-1");

    let order = env
        .settlement
        .create_public_order(
            "est-1",
            PublicOrderRequest {
                items: vec![item("prod-a", 2)],
                customer_name: Some("Ana".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.total_amount, 30.0);
    assert!(order.created_by.is_none());
    assert_eq!(order.customer_name.as_deref(), Some("Ana"));
    // Kitchen is enabled, so the public order still spawns a ticket
    assert!(order.ticket.is_some());

    match rx.try_recv().unwrap() {
        PosEvent::OrderCreated {
            order_id,
            total_amount,
            item_count,
            ..
        } => {
            assert_eq!(order_id, order.id);
            assert_eq!(total_amount, 30.0);
            assert_eq!(item_count, 1);
        }
        other => panic!("expected OrderCreated, got {:?}", other),
    }
}

#[tokio::test]
async fn inactive_establishment_reads_not_found() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    sqlx::query("UPDATE establishment SET active = 0 WHERE id = 'est-1'")
        .execute(&env.pool)
        .await
        .unwrap();
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let result = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn orders_are_tenant_scoped() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_establishment(&env.pool, "est-2", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();

    let result = env.ledger.get("est-2", &order.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = env
        .ledger
        .apply_payment("est-2", &order.id, cash(10.0), None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn list_filters_by_payment_status_and_search() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let mut named = staff_request(vec![item("prod-a", 1)]);
    named.customer_name = Some("Maria Silva".to_string());
    let order_named = env
        .settlement
        .create_order("est-1", named, None)
        .await
        .unwrap();

    let order_partial = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();
    env.ledger
        .apply_payment("est-1", &order_partial.id, cash(4.0), None)
        .await
        .unwrap();

    let partial = env
        .ledger
        .list(
            "est-1",
            &OrderListFilter {
                payment_status: Some("PARTIAL".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].id, order_partial.id);

    let found = env
        .ledger
        .list(
            "est-1",
            &OrderListFilter {
                search: Some("maria".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, order_named.id);
}

#[tokio::test]
async fn creation_and_payment_are_audited() {
    let env = setup().await;
    seed_establishment(&env.pool, "est-1", false, false).await;
    seed_product(&env.pool, "est-1", "prod-a", 10.0).await;

    let order = env
        .settlement
        .create_order("est-1", staff_request(vec![item("prod-a", 1)]), None)
        .await
        .unwrap();
    env.ledger
        .apply_payment("est-1", &order.id, cash(10.0), None)
        .await
        .unwrap();

    assert!(common::wait_for_audit(&env.pool, "est-1", "order_created", 1).await);
    assert!(common::wait_for_audit(&env.pool, "est-1", "order_payment_added", 1).await);
}
