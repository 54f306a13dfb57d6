use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use storefront_engine::{
    db_types::{StatusId, TrackingEntry, TrackingEvent},
    events::EventProducers,
    StoreError,
    TrackingApi,
    TransitionPolicy,
};

use super::{
    helpers::{json, send_request, timestamp},
    mocks::MockStore,
};
use crate::routes::{AddTrackingRoute, TrackingRoute};

fn tracking_service(store: MockStore, policy: TransitionPolicy) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = TrackingApi::new(store, EventProducers::default()).with_policy(policy);
        cfg.service(AddTrackingRoute::<MockStore>::new())
            .service(TrackingRoute::<MockStore>::new())
            .app_data(web::Data::new(api));
    }
}

fn event(id: i64, status_id: StatusId, comment: Option<&str>) -> TrackingEvent {
    TrackingEvent { id, order_id: 3, status_id, timestamp: timestamp(), comment: comment.map(String::from) }
}

#[actix_web::test]
async fn add_tracking_event() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_tracking_event()
        .withf(|ev, policy| {
            ev.order_id == 3 &&
                ev.status_id == StatusId::SHIPPED &&
                ev.comment.as_deref() == Some("Shipped via courier") &&
                *policy == TransitionPolicy::Unrestricted
        })
        .times(1)
        .returning(|ev, _| Ok(event(2, ev.status_id, ev.comment.as_deref())));
    let req = TestRequest::post().uri("/tracking").set_json(json!({
        "orderId": 3,
        "statusId": 3,
        "comment": "  Shipped via courier "
    }));
    let (status, body) = send_request(req, tracking_service(store, TransitionPolicy::Unrestricted)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["id"], 2);
    assert_eq!(body["orderId"], 3);
    assert_eq!(body["statusId"], 3);
    assert_eq!(body["comment"], "Shipped via courier");
    assert_eq!(body["timestamp"], "2024-05-01T12:30:00Z");
}

#[actix_web::test]
async fn missing_status_is_a_validation_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_append_tracking_event().never();
    let req = TestRequest::post().uri("/tracking").set_json(json!({ "orderId": 3 }));
    let (status, body) = send_request(req, tracking_service(store, TransitionPolicy::Unrestricted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["field"], "statusId");
}

#[actix_web::test]
async fn unknown_order_is_unprocessable() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_tracking_event()
        .returning(|_, _| Err(StoreError::ReferenceNotFound("FOREIGN KEY constraint failed".into())));
    let req = TestRequest::post().uri("/tracking").set_json(json!({ "orderId": 9999, "statusId": 2 }));
    let (status, _) = send_request(req, tracking_service(store, TransitionPolicy::Unrestricted)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn strict_policy_conflict() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_tracking_event()
        .withf(|_, policy| *policy == TransitionPolicy::Strict)
        .returning(|ev, _| Err(StoreError::IllegalTransition { from: StatusId::PENDING, to: ev.status_id }));
    let req = TestRequest::post().uri("/tracking").set_json(json!({ "orderId": 3, "statusId": 4 }));
    let (status, body) = send_request(req, tracking_service(store, TransitionPolicy::Strict)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json(&body)["message"].as_str().unwrap().contains("#1"));
}

#[actix_web::test]
async fn tracking_history() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_tracking().withf(|id| *id == 3).returning(|_| {
        Ok(vec![
            TrackingEntry { event: event(1, StatusId::PENDING, Some("Order created")), status_name: Some("Pending".into()) },
            TrackingEntry { event: event(2, StatusId::SHIPPED, None), status_name: Some("Shipped".into()) },
        ])
    });
    let req = TestRequest::get().uri("/tracking/3");
    let (status, body) = send_request(req, tracking_service(store, TransitionPolicy::Unrestricted)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body.as_array().map(|a| a.len()), Some(2));
    assert_eq!(body[0]["comment"], "Order created");
    assert_eq!(body[1]["statusId"], 3);
    assert_eq!(body[1]["statusName"], "Shipped");
}

#[actix_web::test]
async fn tracking_for_unknown_order_is_empty() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_tracking().returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/tracking/9999");
    let (status, body) = send_request(req, tracking_service(store, TransitionPolicy::Unrestricted)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
