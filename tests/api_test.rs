use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use foodcart::api::{self, AppState};
use foodcart::backend::wire::ErrorBody;
use foodcart::backend::OrderPage;
use foodcart::model::{Order, OrderStatus};
use foodcart::pricing::FeeSchedule;
use foodcart::runtime::OrderSystem;
use foodcart::service::OrderService;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(system: &OrderSystem) -> Router {
    let service = OrderService::new(Arc::new(system.order_client.clone()));
    let fees = FeeSchedule::new(Decimal::from(10), Decimal::from(5)).unwrap();
    api::router(AppState::new(service).with_default_fees(fees))
}

fn request(method: Method, uri: &str, user: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = user {
        builder = builder.header("x-user-id", id).header("x-user-role", role);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

fn order_body() -> Value {
    json!({
        "restaurantId": "R1",
        "lines": [
            { "itemId": "A", "name": "Pad Thai", "unitPrice": "85", "quantity": 2 }
        ],
        "deliveryAddress": "12 Main St",
        "paymentMethod": "card"
    })
}

async fn place(app: &Router, customer: &str) -> Order {
    let (status, body) = send(
        app,
        request(Method::POST, "/orders", Some((customer, "customer")), Some(order_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&body));
    parse(&body)
}

#[tokio::test]
async fn test_create_prices_on_server() {
    let system = OrderSystem::new(8);
    let app = app(&system);

    let order = place(&app, "alice").await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.customer_id.as_str(), "alice");
    assert_eq!(order.subtotal, Decimal::from(170));
    assert_eq!(order.delivery_fee, Decimal::from(10));
    assert_eq!(order.service_fee, Decimal::from(5));
    assert_eq!(order.total, Decimal::from(185));

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/orders/{}", order.id), Some(("alice", "customer")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Order>(&body), order);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let system = OrderSystem::new(8);
    let app = app(&system);

    let (status, body) = send(&app, request(Method::POST, "/orders", None, Some(order_body()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse::<ErrorBody>(&body).error, "unauthenticated");
}

#[tokio::test]
async fn test_create_rejects_bad_bodies() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let alice = Some(("alice", "customer"));

    let mut with_total = order_body();
    with_total["total"] = json!("1.00");
    let (status, body) = send(&app, request(Method::POST, "/orders", alice, Some(with_total))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorBody>(&body).error, "validation");

    let mut empty = order_body();
    empty["lines"] = json!([]);
    let (status, _) = send(&app, request(Method::POST, "/orders", alice, Some(empty))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut blank = order_body();
    blank["deliveryAddress"] = json!("  ");
    let (status, _) = send(&app, request(Method::POST, "/orders", alice, Some(blank))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut negative_fee = order_body();
    negative_fee["deliveryFee"] = json!("-1.00");
    let (status, body) = send(&app, request(Method::POST, "/orders", alice, Some(negative_fee))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse::<ErrorBody>(&body).message.contains("delivery fee"));

    let (_, body) = send(&app, request(Method::GET, "/orders", alice, None)).await;
    assert_eq!(parse::<OrderPage>(&body).total, 0);
}

#[tokio::test]
async fn test_create_rejects_amounts_out_of_range() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let alice = Some(("alice", "customer"));

    let mut huge_price = order_body();
    huge_price["lines"][0]["unitPrice"] = json!("79228162514264337593543950335");
    let (status, body) = send(&app, request(Method::POST, "/orders", alice, Some(huge_price))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorBody>(&body).error, "validation");

    let mut huge_quantity = order_body();
    huge_quantity["lines"][0]["quantity"] = json!(u32::MAX);
    let (status, _) = send(&app, request(Method::POST, "/orders", alice, Some(huge_quantity))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The server is still serving and stored nothing.
    let (status, body) = send(&app, request(Method::GET, "/orders", alice, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<OrderPage>(&body).total, 0);
}

#[tokio::test]
async fn test_status_route_is_admin_only() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let order = place(&app, "alice").await;
    let uri = format!("/orders/{}/status", order.id);

    let (status, _) = send(
        &app,
        request(Method::PUT, &uri, Some(("alice", "customer")), Some(json!({ "status": "confirmed" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(("staff", "admin")),
            Some(json!({ "status": "confirmed", "expectedStatus": "pending" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let confirmed: Order = parse(&body);
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert_eq!(confirmed.status_history.len(), 1);
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let order = place(&app, "alice").await;

    let (status, _) = send(
        &app,
        request(Method::PUT, &format!("/orders/{}/cancel", order.id), Some(("alice", "customer")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/orders/{}/status", order.id),
            Some(("staff", "admin")),
            Some(json!({ "status": "confirmed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "invalid_transition");
    assert_eq!(error.current, Some(OrderStatus::Cancelled));
    assert_eq!(error.attempted, Some(OrderStatus::Confirmed));
}

#[tokio::test]
async fn test_orders_are_private_to_their_customer() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let order = place(&app, "alice").await;
    place(&app, "bob").await;

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/orders/{}", order.id), Some(("bob", "customer")), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            &format!("/orders/{}/cancel", order.id),
            Some(("bob", "customer")),
            Some(json!({ "reason": "not mine" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, request(Method::GET, "/orders", Some(("bob", "customer")), None)).await;
    let page: OrderPage = parse(&body);
    assert_eq!(page.total, 1);
    assert_eq!(page.orders[0].customer_id.as_str(), "bob");

    let (_, body) = send(
        &app,
        request(Method::GET, "/orders?status=pending&perPage=1", Some(("staff", "admin")), None),
    )
    .await;
    let page: OrderPage = parse(&body);
    assert_eq!(page.total, 2);
    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_malformed_and_unknown_ids() {
    let system = OrderSystem::new(8);
    let app = app(&system);
    let admin = Some(("staff", "admin"));

    let (status, _) = send(&app, request(Method::GET, "/orders/pizza", admin, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, request(Method::GET, "/orders/order_42", admin, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for signed in ["/orders/+7", "/orders/order_+7"] {
        let (status, _) = send(&app, request(Method::GET, signed, admin, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{signed}");
    }

    let (status, _) = send(
        &app,
        request(Method::PUT, "/orders/order_42/status", admin, Some(json!({ "status": "confirmed" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
