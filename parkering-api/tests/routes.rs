use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use parkering_api::{metrics_router, router, ParkingService};
use parkering_core::ParkingLot;
use parkering_telemetry::MetricsRecorder;

fn app() -> Router {
    app_with(ParkingLot::new())
}

fn app_with(lot: ParkingLot) -> Router {
    let metrics = MetricsRecorder::new().unwrap();
    let service = ParkingService::new(lot, metrics.clone());
    router(service).merge(metrics_router(metrics))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn park(app: &Router, reg: &str, color: &str) -> (StatusCode, Value) {
    post(app, "/park", json!({ "car_reg_no": reg, "car_color": color })).await
}

#[tokio::test]
async fn end_to_end_parking_session() {
    let app = app();

    let (status, body) = post(&app, "/parking_lot", json!({ "no_of_slot": 6 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "total_slot": 6 }));

    let (status, body) = park(&app, "KA-01-HH-2222", "white").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "allocated_slot_number": 1 }));

    let (_, body) = park(&app, "KA-01-HH-1111", "White").await;
    assert_eq!(body, json!({ "allocated_slot_number": 2 }));

    let (status, body) = get(&app, "/registration_numbers/white").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["KA-01-HH-1111", "KA-01-HH-2222"]));

    let (status, body) = post(&app, "/clear", json!({ "slot_number": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "freed_slot_number": 1 }));

    let (_, body) = park(&app, "KA-01-BB-0001", "Black").await;
    assert_eq!(body, json!({ "allocated_slot_number": 1 }));

    let (status, body) = get(&app, "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "slot_no": 1, "registration_no": "KA-01-BB-0001", "color": "black" },
            { "slot_no": 2, "registration_no": "KA-01-HH-1111", "color": "white" },
        ])
    );
}

#[tokio::test]
async fn initialization_rules() {
    let app = app();

    let (status, body) = post(&app, "/parking_lot", json!({ "no_of_slot": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = post(&app, "/parking_lot", json!({ "no_of_slot": -3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/parking_lot", json!({ "no_of_slot": "six" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/parking_lot", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/parking_lot", json!({ "no_of_slot": 3 })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/parking_lot", json!({ "no_of_slot": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parking lot is already initialized");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/parking_lot")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expansion() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/parking_lot",
        Some(json!({ "increment_slot": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parking lot is not initialized");

    post(&app, "/parking_lot", json!({ "no_of_slot": 3 })).await;
    for reg in ["KA-01-HH-0001", "KA-01-HH-0002", "KA-01-HH-0003"] {
        park(&app, reg, "red").await;
    }
    let (status, _) = park(&app, "KA-01-HH-0004", "red").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/parking_lot",
        Some(json!({ "increment_slot": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/parking_lot",
        Some(json!({ "increment_slot": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total_slot": 5 }));

    let (_, body) = park(&app, "KA-01-HH-0004", "red").await;
    assert_eq!(body, json!({ "allocated_slot_number": 4 }));
}

#[tokio::test]
async fn park_rejections() {
    let app = app();

    let (status, body) = park(&app, "KA-01-HH-1234", "white").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parking lot is not initialized");

    post(&app, "/parking_lot", json!({ "no_of_slot": 1 })).await;

    let (status, body) = park(&app, "ka-01-hh-1234", "white").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid registration number format. Expected format: XX-00-XX-0000"
    );

    let (status, _) = park(&app, "KA-01-HH-1234", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/park", json!({ "car_reg_no": "KA-01-HH-1234" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = park(&app, "KA-01-HH-1234", "white").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = park(&app, "KA-01-HH-1234", "white").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Car with registration number KA-01-HH-1234 is already parked"
    );

    let (status, body) = park(&app, "KA-01-HH-9999", "white").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parking lot is full");
}

#[tokio::test]
async fn clear_rejections() {
    let app = app();

    let (status, _) = post(&app, "/clear", json!({ "slot_number": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, "/parking_lot", json!({ "no_of_slot": 2 })).await;
    park(&app, "KA-01-HH-1234", "white").await;

    let (status, body) = post(&app, "/clear", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Either slot_number or car_registration_no must be provided"
    );

    let (status, _) = post(
        &app,
        "/clear",
        json!({ "slot_number": 1, "car_registration_no": "KA-01-HH-1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, "/clear", json!({ "slot_number": 9 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid slot number");

    let (status, body) = post(&app, "/clear", json!({ "slot_number": 2 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Slot is already free");

    let (status, body) = post(
        &app,
        "/clear",
        json!({ "car_registration_no": "KA-09-ZZ-0000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Car with given registration number not found"
    );

    let (status, body) = post(
        &app,
        "/clear",
        json!({ "car_registration_no": "KA-01-HH-1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "freed_slot_number": 1 }));

    let (status, body) = get(&app, "/slot_number/KA-01-HH-1234").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Car with given registration number not found"
    );
}

#[tokio::test]
async fn lookups() {
    let app = app();

    let (status, _) = get(&app, "/slot_number/KA-01-HH-1234").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/slot_numbers/white").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, "/parking_lot", json!({ "no_of_slot": 5 })).await;
    park(&app, "KA-01-HH-1234", "White").await;
    park(&app, "KA-01-HH-9999", "red").await;
    park(&app, "KA-01-BB-0001", "WHITE").await;

    let (status, body) = get(&app, "/slot_numbers/WHITE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["1", "3"]));

    let (_, upper) = get(&app, "/registration_numbers/WHITE").await;
    let (_, lower) = get(&app, "/registration_numbers/white").await;
    assert_eq!(upper, lower);
    assert_eq!(lower, json!(["KA-01-BB-0001", "KA-01-HH-1234"]));

    let (status, body) = get(&app, "/registration_numbers/green").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/slot_number/KA-01-HH-9999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "slot_number": 2 }));

    let (status, body) = get(&app, "/slot_number/KA-02-XX-0000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn statistics() {
    let app = app();

    let (status, _) = get(&app, "/statistics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, "/parking_lot", json!({ "no_of_slot": 10 })).await;
    for reg in ["KA-01-HH-0001", "KA-01-HH-0002", "KA-01-HH-0003"] {
        park(&app, reg, "white").await;
    }

    let (status, body) = get(&app, "/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_slots": 10,
            "occupied_slots": 3,
            "available_slots": 7,
            "occupancy_rate": "30.00%",
        })
    );
}

#[tokio::test]
async fn lot_limit_applies_over_http() {
    let app = app_with(ParkingLot::with_max_capacity(4));

    let (status, _) = post(&app, "/parking_lot", json!({ "no_of_slot": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, "/parking_lot", json!({ "no_of_slot": 3 })).await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/parking_lot",
        Some(json!({ "increment_slot": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metrics_endpoint() {
    let app = app();
    post(&app, "/parking_lot", json!({ "no_of_slot": 2 })).await;
    park(&app, "KA-01-HH-1234", "white").await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("parkering_allocations_total 1"));
    assert!(text.contains("parkering_slots_total 2"));
    assert!(text.contains("parkering_slots_occupied 1"));
}
