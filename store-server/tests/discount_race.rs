//! Concurrent last-unit redemption: when two requests fight over the final
//! discount unit or the final unit of stock, exactly one may win.

mod common;

use common::*;
use store_server::db::models::OrderItemRequest;
use store_server::db::repository::{DiscountRepository, ProductRepository};

#[tokio::test]
async fn last_discount_unit_has_exactly_one_winner() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Ssd Drive"), &supplier, 60_000.0, 10, 0.0).await;
    let discount_id = seed_discount(&state, "SALE10", 10.0, 0.0, 1).await;

    let repo = order_repo(&state);
    let first_order = seed_order(&state).await;
    let second_order = seed_order(&state).await;
    for order in [&first_order, &second_order] {
        repo.add_line_items(
            order,
            &[OrderItemRequest {
                product_id: product.clone(),
                quantity: 1,
            }],
        )
        .await
        .expect("settle lines");
    }

    let (first, second) = tokio::join!(
        repo.attach_discount(&first_order, "SALE10"),
        repo.attach_discount(&second_order, "SALE10"),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(
        successes, 1,
        "exactly one attach may win the last unit (first: {first:?}, second: {second:?})"
    );

    let discount = DiscountRepository::new(state.get_db())
        .find_by_id(&discount_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(discount.quantity, 0, "the last unit is consumed exactly once");
}

#[tokio::test]
async fn oversubscribed_discount_pays_out_exactly_its_quantity() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Ram Kit"), &supplier, 40_000.0, 50, 0.0).await;
    let discount_id = seed_discount(&state, "TRIO", 5.0, 0.0, 3).await;

    let repo = order_repo(&state);
    let mut orders = Vec::new();
    for _ in 0..8 {
        let order = seed_order(&state).await;
        repo.add_line_items(
            &order,
            &[OrderItemRequest {
                product_id: product.clone(),
                quantity: 1,
            }],
        )
        .await
        .expect("settle lines");
        orders.push(order);
    }

    let results = futures::future::join_all(
        orders.iter().map(|order| repo.attach_discount(order, "TRIO")),
    )
    .await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 3, "three units pay out exactly three winners");

    let discount = DiscountRepository::new(state.get_db())
        .find_by_id(&discount_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(discount.quantity, 0);
}

#[tokio::test]
async fn last_stock_unit_has_exactly_one_winner() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let product = seed_product(&state, &unique("Gpu"), &supplier, 500_000.0, 1, 0.0).await;

    let repo = order_repo(&state);
    let first_order = seed_order(&state).await;
    let second_order = seed_order(&state).await;

    let request = [OrderItemRequest {
        product_id: product.clone(),
        quantity: 1,
    }];
    let (first, second) = tokio::join!(
        repo.add_line_items(&first_order, &request),
        repo.add_line_items(&second_order, &request),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(
        successes, 1,
        "exactly one settlement may take the last unit (first: {first:?}, second: {second:?})"
    );

    let stocked = ProductRepository::new(state.get_db())
        .find_by_id(&product)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stocked.quantity, 0, "stock never goes negative");

    // The winner holds the line, the loser holds nothing
    let mut line_counts = Vec::new();
    for order in [&first_order, &second_order] {
        let order = repo.find_by_id(order).await.unwrap().unwrap();
        line_counts.push(order.details.len());
    }
    line_counts.sort_unstable();
    assert_eq!(line_counts, vec![0, 1]);
}
