mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::{json, Value};

fn sample_payload() -> Value {
    json!({
        "vehicleType": "SUV",
        "category": "STANDARD",
        "schedule": {
            "dayOfWeek": "Monday",
            "startTime": "9:00 AM",
            "endTime": "5:00 PM"
        },
        "route": {
            "startLocation": "Location A",
            "endLocation": "Location B",
            "startTime": "9:00 AM",
            "endTime": "10:00 AM"
        }
    })
}

#[tokio::test]
async fn create_returns_assembled_record() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/vehicles", Some(sample_payload()))
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["vehicleType"], "SUV");
    assert_eq!(body["vehicleTypeCount"], 1);
    assert_eq!(body["category"], "STANDARD");
    assert_eq!(body["schedule"]["dayOfWeek"], "Monday");
    assert_eq!(body["schedule"]["startTime"], "09:00 AM");
    assert_eq!(body["schedule"]["endTime"], "05:00 PM");
    assert_eq!(body["route"]["startLocation"], "Location A");
    assert_eq!(body["route"]["endLocation"], "Location B");
    assert_eq!(body["route"]["startTime"], "09:00 AM");
    assert_eq!(body["route"]["endTime"], "10:00 AM");
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn list_returns_created_record_with_normalized_times() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/vehicles", Some(sample_payload()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.request(Method::GET, "/vehicles", None).await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().expect("array of records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["schedule"]["startTime"], "09:00 AM");
    assert_eq!(records[0]["schedule"]["endTime"], "05:00 PM");
    assert_eq!(records[0]["route"]["startTime"], "09:00 AM");
    assert_eq!(records[0]["route"]["endTime"], "10:00 AM");
}

#[tokio::test]
async fn duplicate_create_reuses_rows_but_counts_requests() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/vehicles", Some(sample_payload()))
        .await;
    let (status, first) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["vehicleTypeCount"], 1);

    let response = app
        .request(Method::POST, "/vehicles", Some(sample_payload()))
        .await;
    let (status, second) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same route row, two distinct type-count increments.
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["vehicleTypeCount"], 2);

    let response = app.request(Method::GET, "/vehicles", None).await;
    let (_, body) = read_json(response).await;
    assert_eq!(body.as_array().expect("array of records").len(), 1);
}

#[tokio::test]
async fn get_by_id_returns_one_record() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/vehicles", Some(sample_payload()))
        .await;
    let (_, created) = read_json(response).await;
    let id = created["id"].as_i64().expect("route id");

    let response = app
        .request(Method::GET, &format!("/vehicles/{id}"), None)
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["vehicleType"], "SUV");
}

#[tokio::test]
async fn get_missing_id_returns_404_referencing_the_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/vehicles/9999", None).await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["message"]
            .as_str()
            .expect("error message")
            .contains("9999"),
        "404 body should reference the missing id: {body}"
    );
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_400() {
    let app = TestApp::new().await;

    let mut missing_meridiem = sample_payload();
    missing_meridiem["schedule"]["startTime"] = json!("09:00");
    let response = app
        .request(Method::POST, "/vehicles", Some(missing_meridiem))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut bad_category = sample_payload();
    bad_category["category"] = json!("PREMIUM");
    let response = app
        .request(Method::POST, "/vehicles", Some(bad_category))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut bad_day = sample_payload();
    bad_day["schedule"]["dayOfWeek"] = json!("Funday");
    let response = app.request(Method::POST, "/vehicles", Some(bad_day)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted along the way.
    let response = app.request(Method::GET, "/vehicles", None).await;
    let (_, body) = read_json(response).await;
    assert_eq!(body.as_array().expect("array of records").len(), 0);
}

#[tokio::test]
async fn structurally_invalid_body_gets_the_400_envelope() {
    let app = TestApp::new().await;

    // Missing required field: fails deserialization before validation runs.
    let mut no_category = sample_payload();
    no_category.as_object_mut().expect("object").remove("category");
    let response = app
        .request(Method::POST, "/vehicles", Some(no_category))
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(
        body["message"]
            .as_str()
            .expect("error message")
            .contains("category"),
        "400 body should name the missing field: {body}"
    );

    // Wrong type for a field is the same class of failure.
    let mut numeric_type = sample_payload();
    numeric_type["vehicleType"] = json!(42);
    let response = app
        .request(Method::POST, "/vehicles", Some(numeric_type))
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let response = app.request(Method::GET, "/health/ready", None).await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
