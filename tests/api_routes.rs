use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use storefront_api::{routes::create_api_router, state::AppState};
use tower::ServiceExt;

// These requests are rejected before any query runs, so a lazy pool that
// never connects is enough.
fn app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://storefront@localhost/unused")
        .expect("lazy pool");
    Router::new()
        .nest("/api", create_api_router())
        .with_state(AppState::new(pool))
}

async fn send(method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn empty_order_is_rejected_with_every_missing_field() {
    let (status, body) = send("POST", "/api/orders", json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["data"]["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["order_items", "paid_at", "payment_info", "shipping_info", "user"]
    );
}

#[tokio::test]
async fn bad_phone_number_names_the_field() {
    let order = json!({
        "shippingInfo": {
            "address": "1 Park Street",
            "city": "Kolkata",
            "state": "West Bengal",
            "pincode": 700016,
            "phoneNo": "call me"
        },
        "orderItems": [
            { "name": "Mug", "price": 100, "quantity": 1, "product": "2b0f2f8e-7c2e-4c36-9a7d-3f1f6b5d2c10" }
        ],
        "user": "5c1e0d3a-8f7b-4b2a-9d4e-6a0b1c2d3e4f",
        "paymentInfo": { "id": "pay_1", "status": "succeeded" },
        "paidAt": "2024-05-01T10:00:00Z"
    });

    let (status, body) = send("POST", "/api/orders", order).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["fields"],
        json!([{ "field": "shipping_info.phone_no", "message": "Enter a valid Phone No" }])
    );
}

#[tokio::test]
async fn blank_category_name_is_a_bad_request() {
    let (status, body) = send("POST", "/api/categories", json!({ "name": "  " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Bad Request Category name is required");
}

#[tokio::test]
async fn category_ids_must_be_uuids() {
    let (status, _) = send("PUT", "/api/categories/1", json!({ "name": "Books" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fractional_price_is_reported_as_a_field_violation() {
    let order = json!({
        "orderItems": [
            { "name": "Mug", "price": 499.5, "quantity": 1, "product": "2b0f2f8e-7c2e-4c36-9a7d-3f1f6b5d2c10" }
        ]
    });

    let (status, body) = send("POST", "/api/orders", order).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["data"]["fields"][0]["field"], "order_items[0].price");
}

#[tokio::test]
async fn malformed_json_uses_the_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Bad Request")));
}
