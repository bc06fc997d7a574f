//! Admin and order statistics.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_admin_stats_with_no_payments() {
    let state = create_test_app_state();
    create_test_user(&state, ADMIN_EMAIL, true);
    insert_doc(&state, Collection::Menus, json!({"name": "Pizza", "price": 12.5}));

    let (status, body) = send(
        app(state),
        request("GET", "/admin-stats", Some(&token_for(ADMIN_EMAIL)), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"users": 1, "menuItems": 1, "orders": 0, "revenue": 0.0})
    );
}

#[tokio::test]
async fn test_admin_stats_revenue_is_sum_of_prices() {
    let state = create_test_app_state();
    create_test_user(&state, ADMIN_EMAIL, true);
    create_test_user(&state, USER_EMAIL, false);
    insert_doc(&state, Collection::Payments, json!({"email": USER_EMAIL, "price": 12.5}));
    insert_doc(&state, Collection::Payments, json!({"email": USER_EMAIL, "price": 7.25}));

    let (status, body) = send(
        app(state),
        request("GET", "/admin-stats", Some(&token_for(ADMIN_EMAIL)), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 2);
    assert_eq!(body["orders"], 2);
    assert_eq!(body["revenue"], 19.75);
}

#[tokio::test]
async fn test_admin_stats_requires_admin() {
    let state = create_test_app_state();
    create_test_user(&state, USER_EMAIL, false);

    let (status, _) = send(
        app(state),
        request("GET", "/admin-stats", Some(&token_for(USER_EMAIL)), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn seed_orders(state: &AppState) {
    insert_doc(state, Collection::Menus, json!({"_id": "m1", "name": "Pizza", "price": 12.5, "category": "main"}));
    insert_doc(state, Collection::Menus, json!({"_id": "m2", "name": "Soup", "price": 4.0, "category": "soup"}));
    insert_doc(state, Collection::Payments, json!({"_id": "p1", "email": USER_EMAIL, "price": 16.5, "menuItemIds": ["m1", "m2"]}));
    insert_doc(state, Collection::Payments, json!({"_id": "p2", "email": USER_EMAIL, "price": 12.5, "menuItemIds": ["m1"]}));
}

#[tokio::test]
async fn test_order_stats_one_row_per_payment_item() {
    let state = create_test_app_state();
    seed_orders(&state);

    let (status, body) = send(app(state), request("GET", "/order-stats", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let pairs: Vec<(String, String)> = rows
        .iter()
        .map(|r| {
            (
                r["_id"].as_str().unwrap().to_string(),
                r["menuItemIds"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("p1".to_string(), "m1".to_string()),
            ("p1".to_string(), "m2".to_string()),
            ("p2".to_string(), "m1".to_string()),
        ]
    );

    assert_eq!(rows[0]["menuItems"][0]["name"], "Pizza");
    assert_eq!(rows[1]["menuItems"][0]["category"], "soup");
    assert_eq!(rows[2]["menuItems"][0]["price"], 12.5);
    assert_eq!(rows[2]["email"], USER_EMAIL);
}

#[tokio::test]
async fn test_order_stats_can_be_restricted_to_admins() {
    let policy = AccessPolicy {
        order_stats_admin_only: true,
        ..AccessPolicy::default()
    };
    let state = create_test_app_state_with(policy, Arc::new(FakePayments::default()));
    create_test_user(&state, ADMIN_EMAIL, true);
    seed_orders(&state);

    let (status, _) = send(app(state.clone()), request("GET", "/order-stats", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        app(state),
        request("GET", "/order-stats", Some(&token_for(ADMIN_EMAIL)), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}
