//! Order settlement flow: price snapshots, stock decrements, discount
//! attachment and derived totals.

mod common;

use common::*;
use store_server::db::models::{OrderItemRequest, OrderStatus};
use store_server::db::repository::{DiscountRepository, ProductRepository, RepoError};

fn item(product_id: &str, quantity: i64) -> OrderItemRequest {
    OrderItemRequest {
        product_id: product_id.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn add_line_items_snapshots_price_and_decrements_stock() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    // 100000 with a 10% product discount, 5 in stock
    let product = seed_product(&state, &unique("Gaming Laptop"), &supplier, 100_000.0, 5, 10.0).await;
    let order_id = seed_order(&state).await;

    let order = order_repo(&state)
        .add_line_items(&order_id, &[item(&product, 2)])
        .await
        .expect("settlement step");

    assert_eq!(order.details.len(), 1);
    let line = &order.details[0];
    assert_eq!(line.quantity, 2);
    assert_eq!(line.unit_price, 90_000.0, "unit price is price minus product discount");
    assert_eq!(line.line_total, 180_000.0);

    let stocked = ProductRepository::new(state.get_db())
        .find_by_id(&product)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stocked.quantity, 3, "stock decremented by the settled quantity");

    let view = order_repo(&state)
        .find_view(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.subtotal, 180_000.0);
    assert_eq!(view.total, 180_000.0);
}

#[tokio::test]
async fn add_line_items_appends_across_steps() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let first = seed_product(&state, &unique("Keyboard"), &supplier, 200.0, 10, 0.0).await;
    let second = seed_product(&state, &unique("Mouse"), &supplier, 100.0, 10, 0.0).await;
    let order_id = seed_order(&state).await;

    let repo = order_repo(&state);
    repo.add_line_items(&order_id, &[item(&first, 1)])
        .await
        .expect("first step");
    let order = repo
        .add_line_items(&order_id, &[item(&second, 3)])
        .await
        .expect("second step");

    assert_eq!(order.details.len(), 2);
    let view = repo.find_view(&order_id).await.unwrap().unwrap();
    assert_eq!(view.subtotal, 500.0);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_every_line() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let plenty = seed_product(&state, &unique("Cable"), &supplier, 10.0, 50, 0.0).await;
    let scarce = seed_product(&state, &unique("Adapter"), &supplier, 20.0, 1, 0.0).await;
    let order_id = seed_order(&state).await;

    let result = order_repo(&state)
        .add_line_items(&order_id, &[item(&plenty, 5), item(&scarce, 2)])
        .await;
    assert!(
        matches!(result, Err(RepoError::State(_))),
        "insufficient stock must fail the step, got {result:?}"
    );

    // Nothing moved: the first line's decrement rolled back with the rest
    let products = ProductRepository::new(state.get_db());
    assert_eq!(products.find_by_id(&plenty).await.unwrap().unwrap().quantity, 50);
    assert_eq!(products.find_by_id(&scarce).await.unwrap().unwrap().quantity, 1);

    let order = order_repo(&state).find_by_id(&order_id).await.unwrap().unwrap();
    assert!(order.details.is_empty(), "no lines may be appended on failure");
}

#[tokio::test]
async fn add_line_items_rejects_unknown_product_and_empty_request() {
    let (state, _tmp) = test_state().await;
    let order_id = seed_order(&state).await;
    let repo = order_repo(&state);

    let missing = repo
        .add_line_items(&order_id, &[item("product:does_not_exist", 1)])
        .await;
    assert!(matches!(missing, Err(RepoError::NotFound(_))));

    let empty = repo.add_line_items(&order_id, &[]).await;
    assert!(matches!(empty, Err(RepoError::Validation(_))));
}

#[tokio::test]
async fn repeated_lines_merge_but_cannot_dodge_the_quantity_cap() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Sticker"), &supplier, 1.0, 10, 0.0).await;
    let order_id = seed_order(&state).await;
    let repo = order_repo(&state);

    // Two entries for the same product collapse into a single line
    let order = repo
        .add_line_items(&order_id, &[item(&product, 2), item(&product, 3)])
        .await
        .expect("merge");
    assert_eq!(order.details.len(), 1);
    assert_eq!(order.details[0].quantity, 5);

    // Splitting an oversized quantity across entries is still rejected
    let capped = repo
        .add_line_items(&order_id, &[item(&product, 5_000), item(&product, 5_000)])
        .await;
    assert!(
        matches!(capped, Err(RepoError::Validation(_))),
        "merged quantity above the per-line limit must fail, got {capped:?}"
    );
}

#[tokio::test]
async fn settlement_is_limited_to_new_orders() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Webcam"), &supplier, 80.0, 10, 0.0).await;
    let order_id = seed_order(&state).await;

    let repo = order_repo(&state);
    repo.add_line_items(&order_id, &[item(&product, 1)])
        .await
        .expect("settle while new");
    repo.approve(&order_id).await.expect("approve");

    let late = repo.add_line_items(&order_id, &[item(&product, 1)]).await;
    assert!(
        matches!(late, Err(RepoError::State(_))),
        "approved orders must not accept more lines"
    );
}

#[tokio::test]
async fn attach_discount_decrements_quantity_and_reduces_total() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Monitor"), &supplier, 100_000.0, 5, 10.0).await;
    let discount_id = seed_discount(&state, "SALE10", 10.0, 50_000.0, 5).await;
    let order_id = seed_order(&state).await;

    let repo = order_repo(&state);
    repo.add_line_items(&order_id, &[item(&product, 2)])
        .await
        .expect("settle lines");
    let order = repo
        .attach_discount(&order_id, "SALE10")
        .await
        .expect("attach discount");
    assert!(order.discount.is_some());

    let view = repo.find_view(&order_id).await.unwrap().unwrap();
    assert_eq!(view.subtotal, 180_000.0);
    assert_eq!(view.discount_amount, 18_000.0);
    assert_eq!(view.total, 162_000.0);

    let discount = DiscountRepository::new(state.get_db())
        .find_by_id(&discount_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(discount.quantity, 4, "redemption consumes exactly one unit");
}

#[tokio::test]
async fn attach_discount_rejects_below_minimum_without_consuming() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Usb Stick"), &supplier, 100.0, 10, 0.0).await;
    let discount_id = seed_discount(&state, "BIGSPEND", 15.0, 10_000.0, 3).await;
    let order_id = seed_order(&state).await;

    let repo = order_repo(&state);
    repo.add_line_items(&order_id, &[item(&product, 1)])
        .await
        .expect("settle lines");

    let result = repo.attach_discount(&order_id, "BIGSPEND").await;
    assert!(matches!(result, Err(RepoError::State(_))));

    let discount = DiscountRepository::new(state.get_db())
        .find_by_id(&discount_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(discount.quantity, 3, "a rejected attach must not consume a unit");

    let order = repo.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(order.discount.is_none());
}

#[tokio::test]
async fn attach_discount_rejects_unknown_code_and_double_attach() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Headset"), &supplier, 60_000.0, 5, 0.0).await;
    seed_discount(&state, "ONCE", 5.0, 0.0, 5).await;
    let order_id = seed_order(&state).await;

    let repo = order_repo(&state);
    repo.add_line_items(&order_id, &[item(&product, 1)])
        .await
        .expect("settle lines");

    let unknown = repo.attach_discount(&order_id, "NOPE").await;
    assert!(matches!(unknown, Err(RepoError::NotFound(_))));

    repo.attach_discount(&order_id, "ONCE").await.expect("first attach");
    let again = repo.attach_discount(&order_id, "ONCE").await;
    assert!(
        matches!(again, Err(RepoError::State(_))),
        "an order holds at most one discount"
    );
}

#[tokio::test]
async fn order_codes_are_prefixed_and_unique() {
    let (state, _tmp) = test_state().await;
    let repo = order_repo(&state);

    let first = repo
        .create(order_create("Buyer One"), TEST_USER)
        .await
        .expect("first order");
    let second = repo
        .create(order_create("Buyer Two"), TEST_USER)
        .await
        .expect("second order");

    for order in [&first, &second] {
        let code = &order.code;
        assert!(code.starts_with("HD"), "code {code} must start with HD");
        assert_eq!(code.len(), 14, "HD + 8 hex + 4 hex");
        assert!(
            code[2..].chars().all(|c| c.is_ascii_hexdigit()),
            "code {code} body must be hex"
        );
        assert_eq!(*code, code.to_uppercase());
    }
    assert_ne!(first.code, second.code);
}

#[tokio::test]
async fn status_moves_only_along_allowed_edges() {
    let (state, _tmp) = test_state().await;
    let repo = order_repo(&state);
    let order_id = seed_order(&state).await;

    let approved = repo.approve(&order_id).await.expect("approve");
    assert_eq!(approved.status, OrderStatus::Approved);

    let twice = repo.approve(&order_id).await;
    assert!(matches!(twice, Err(RepoError::State(_))), "approve is not idempotent");

    let cancelled = repo.cancel(&order_id).await.expect("cancel approved order");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let again = repo.cancel(&order_id).await;
    assert!(matches!(again, Err(RepoError::State(_))), "cancelled is terminal");
    let revive = repo.approve(&order_id).await;
    assert!(matches!(revive, Err(RepoError::State(_))), "cancelled is terminal");
}
