use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use storefront_engine::{
    db_types::{
        Cents,
        NewOrder,
        Order,
        OrderLine,
        OrderLineDetail,
        OrderSummary,
        StatusId,
        TrackingEntry,
        TrackingEvent,
    },
    events::EventProducers,
    CheckoutApi,
    StoreError,
    TrackingApi,
};

use super::{
    helpers::{json, send_request, timestamp},
    mocks::MockStore,
};
use crate::routes::{ClientOrdersRoute, OrderDetailsRoute, PlaceOrderRoute};

fn order_for(new_order: &NewOrder) -> Order {
    Order {
        id: 42,
        client_id: new_order.client_id,
        payment_method_id: new_order.payment_method_id,
        status_id: StatusId::PENDING,
        total: new_order.total().unwrap_or_default(),
        created_at: timestamp(),
    }
}

fn scenario_a() -> serde_json::Value {
    json!({
        "clientId": 1,
        "paymentMethodId": 1,
        "items": [
            { "productId": 5, "quantity": 2, "price": 10.00 },
            { "productId": 7, "quantity": 1, "price": 25.50 }
        ]
    })
}

fn checkout_service(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CheckoutApi::new(store, EventProducers::default());
        cfg.service(PlaceOrderRoute::<MockStore>::new())
            .service(ClientOrdersRoute::<MockStore>::new())
            .app_data(web::Data::new(api));
    }
}

fn details_service(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = TrackingApi::new(store, EventProducers::default());
        cfg.service(OrderDetailsRoute::<MockStore>::new()).app_data(web::Data::new(api));
    }
}

#[actix_web::test]
async fn place_order_returns_created() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_place_order()
        .withf(|o| o.lines.len() == 2 && o.total() == Some(Cents::from(4550)) && o.idempotency.is_none())
        .times(1)
        .returning(|o| Ok((order_for(&o), true)));
    let req = TestRequest::post().uri("/orders").set_json(scenario_a());
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["id"], 42);
    assert_eq!(body["clientId"], 1);
    assert_eq!(body["statusId"], 1);
    assert_eq!(body["total"], 45.5);
    assert_eq!(body["createdAt"], "2024-05-01T12:30:00Z");
}

#[actix_web::test]
async fn replayed_order_returns_ok() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_place_order()
        .withf(|o| o.idempotency.as_ref().map(|i| i.key.as_str()) == Some("checkout-1"))
        .returning(|o| Ok((order_for(&o), false)));
    let mut body = scenario_a();
    body["idempotencyKey"] = json!("checkout-1");
    let req = TestRequest::post().uri("/orders").set_json(body);
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["id"], 42);
}

#[actix_web::test]
async fn empty_order_is_a_validation_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_place_order().never();
    let req = TestRequest::post().uri("/orders").set_json(json!({ "clientId": 1, "paymentMethodId": 1, "items": [] }));
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["field"], "items");
    assert!(body["message"].as_str().unwrap().contains("at least one item"));
}

#[actix_web::test]
async fn bad_line_fields_are_named() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_place_order().never();
    let mut request = scenario_a();
    request["items"][1]["quantity"] = json!(0);
    let req = TestRequest::post().uri("/orders").set_json(request);
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["field"], "items[1].quantity");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_place_order().never();
    let req = TestRequest::post()
        .uri("/orders")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"clientId\": 1,");
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["message"].is_string());
}

#[actix_web::test]
async fn unknown_reference_is_unprocessable() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_place_order()
        .returning(|_| Err(StoreError::ReferenceNotFound("FOREIGN KEY constraint failed".into())));
    let req = TestRequest::post().uri("/orders").set_json(scenario_a());
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(&body);
    assert!(body.get("error").is_none());
    assert!(!body["message"].as_str().unwrap().contains("FOREIGN KEY"));
}

#[actix_web::test]
async fn busy_store_is_unavailable_without_detail() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_place_order().returning(|_| Err(StoreError::StoreUnavailable("database is locked".into())));
    let req = TestRequest::post().uri("/orders").set_json(scenario_a());
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body = json(&body);
    assert!(body.get("error").is_none());
    assert!(!body["message"].as_str().unwrap().contains("locked"));
}

#[actix_web::test]
async fn client_orders() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_orders_for_client().withf(|id| *id == 1).returning(|_| {
        let order = order_for(&NewOrder::new(1, 2, vec![]));
        Ok(vec![OrderSummary { order, status_name: Some("Pending".into()) }])
    });
    let req = TestRequest::get().uri("/orders/client/1");
    let (status, body) = send_request(req, checkout_service(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body[0]["paymentMethodId"], 2);
    assert_eq!(body[0]["statusName"], "Pending");
}

fn summary() -> OrderSummary {
    let order = Order {
        id: 3,
        client_id: 1,
        payment_method_id: 1,
        status_id: StatusId::SHIPPED,
        total: Cents::from(1000),
        created_at: timestamp(),
    };
    OrderSummary { order, status_name: Some("Shipped".into()) }
}

fn lines() -> Vec<OrderLineDetail> {
    let line = OrderLine { id: 1, order_id: 3, product_id: 5, quantity: 1, historical_price: Cents::from(1000) };
    vec![OrderLineDetail { line, product: None }]
}

#[actix_web::test]
async fn order_details() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().returning(|_| Ok(Some(summary())));
    store.expect_fetch_order_lines().returning(|_| Ok(lines()));
    store.expect_fetch_tracking().returning(|_| {
        let event =
            TrackingEvent { id: 1, order_id: 3, status_id: StatusId::PENDING, timestamp: timestamp(), comment: None };
        Ok(vec![TrackingEntry { event, status_name: Some("Pending".into()) }])
    });
    let req = TestRequest::get().uri("/orders/3/details");
    let (status, body) = send_request(req, details_service(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["id"], 3);
    assert_eq!(body["statusName"], "Shipped");
    assert_eq!(body["items"][0]["historicalPrice"], 10.0);
    assert_eq!(body["tracking"][0]["statusName"], "Pending");
    assert_eq!(body["trackingAvailable"], true);
}

#[actix_web::test]
async fn order_details_without_tracking() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().returning(|_| Ok(Some(summary())));
    store.expect_fetch_order_lines().returning(|_| Ok(lines()));
    store.expect_fetch_tracking().returning(|_| Err(StoreError::DatabaseError("no such table".into())));
    let req = TestRequest::get().uri("/orders/3/details");
    let (status, body) = send_request(req, details_service(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["trackingAvailable"], false);
    assert_eq!(body["tracking"], json!([]));
    assert_eq!(body["items"].as_array().map(|a| a.len()), Some(1));
}

#[actix_web::test]
async fn unknown_order_details_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().withf(|id| *id == 9999).returning(|_| Ok(None));
    let req = TestRequest::get().uri("/orders/9999/details");
    let (status, body) = send_request(req, details_service(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json(&body)["message"].as_str().unwrap().contains("9999"));
}

#[actix_web::test]
async fn non_numeric_order_id_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().never();
    let req = TestRequest::get().uri("/orders/abc/details");
    let (status, _) = send_request(req, details_service(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
