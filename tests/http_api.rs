//! REST API end to end over the router, without a socket

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use psicoespacios::create_api_router;

fn router(fx: &Fixture) -> Router {
    create_api_router(fx.app_state(), None)
}

async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn assign_body(fx: &Fixture, user_id: i32) -> Value {
    json!({
        "packId": fx.pack.id,
        "userId": user_id,
        "startDate": "2025-09-01",
        "deadline": "2025-09-30",
        "sedeId": fx.sede.id,
        "weeklySlots": [
            { "weekday": 1, "startTime": "09:00", "endTime": "10:00", "roomId": fx.room1.id }
        ]
    })
}

#[tokio::test]
async fn health_reports_database() {
    let fx = Fixture::new().await;
    let (status, body) = call(router(&fx), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn assign_returns_camel_case_summary() {
    let fx = Fixture::new().await;
    let (status, body) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs/assign",
        Some(assign_body(&fx, fx.ana.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert!(data["assignmentId"].as_i64().unwrap() > 0);
    assert_eq!(data["reservationsGenerated"], 5);
    assert_eq!(data["dateFrom"], "2025-09-01");
    assert_eq!(data["dateTo"], "2025-09-30");
    assert_eq!(data["monthlyPayments"].as_array().unwrap().len(), 1);
    assert_eq!(data["monthlyPayments"][0]["amountDue"], 100_000);
}

#[tokio::test]
async fn conflict_is_reported_with_details() {
    let fx = Fixture::new().await;
    fx.book(&fx.room1, &fx.bruno, date(2025, 9, 15), "09:30", "10:30")
        .await;

    let (status, body) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs/assign",
        Some(assign_body(&fx, fx.ana.id)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["totalConflicts"], 1);
    let conflict = &body["data"]["conflicts"][0];
    assert_eq!(conflict["date"], "2025-09-15");
    assert_eq!(conflict["roomName"], "Box 1");
    assert_eq!(conflict["existingProfessional"], "Bruno Díaz");
    assert!(fx.assignments().list(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn dry_run_check_lists_conflicts_with_200() {
    let fx = Fixture::new().await;
    fx.book(&fx.room1, &fx.bruno, date(2025, 9, 8), "09:00", "10:00")
        .await;

    let (status, body) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs/assign/check",
        Some(assign_body(&fx, fx.ana.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reservationsPlanned"], 5);
    assert_eq!(body["data"]["totalConflicts"], 1);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let fx = Fixture::new().await;

    let mut bad_weekday = assign_body(&fx, fx.ana.id);
    bad_weekday["weeklySlots"][0]["weekday"] = json!(9);
    let (status, body) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs/assign",
        Some(bad_weekday),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("weekday"));

    let mut no_slots = assign_body(&fx, fx.ana.id);
    no_slots["weeklySlots"] = json!([]);
    let (status, _) = call(router(&fx), Method::POST, "/api/v1/packs/assign", Some(no_slots)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs/assign",
        Some(json!({ "packId": "x" })),
    )
    .await;
    assert!(status.is_client_error());

    let mut inverted = assign_body(&fx, fx.ana.id);
    inverted["weeklySlots"][0]["startTime"] = json!("11:00");
    let (status, _) = call(router(&fx), Method::POST, "/api/v1/packs/assign", Some(inverted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_resources_are_404() {
    let fx = Fixture::new().await;
    let mut body = assign_body(&fx, fx.ana.id);
    body["packId"] = json!(999);
    let (status, body) = call(router(&fx), Method::POST, "/api/v1/packs/assign", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = call(router(&fx), Method::GET, "/api/v1/payments/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pack_crud() {
    let fx = Fixture::new().await;
    let (status, body) = call(
        router(&fx),
        Method::POST,
        "/api/v1/packs",
        Some(json!({ "name": "Pack 8 horas", "includedHours": 8, "price": 60000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["currency"], "CLP");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        router(&fx),
        Method::DELETE,
        &format!("/api/v1/packs/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);

    let (_, body) = call(router(&fx), Method::GET, "/api/v1/packs?activeOnly=true", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Pack mensual"]);
}

#[tokio::test]
async fn illegal_status_change_is_409() {
    let fx = Fixture::new().await;
    let summary = fx.assignments().assign(fx.monday_command()).await.unwrap();
    let reservation = &fx
        .assignments()
        .reservations(summary.assignment.id)
        .await
        .unwrap()[0];

    let uri = format!("/api/v1/reservations/{}/status", reservation.id);
    let (status, _) = call(
        router(&fx),
        Method::PATCH,
        &uri,
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        router(&fx),
        Method::PATCH,
        &uri,
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
}

#[tokio::test]
async fn payment_flow_over_http() {
    let fx = Fixture::new().await;
    let summary = fx.assignments().assign(fx.monday_command()).await.unwrap();
    let payment_id = summary.monthly_payments[0].id;

    let (status, body) = call(
        router(&fx),
        Method::POST,
        &format!("/api/v1/payments/{payment_id}/mark-paid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reservationsUpdated"], 5);
    assert_eq!(body["data"]["payment"]["status"], "paid");

    let (status, _) = call(
        router(&fx),
        Method::POST,
        &format!("/api/v1/payments/{payment_id}/mark-paid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        router(&fx),
        Method::POST,
        &format!("/api/v1/payments/{payment_id}/refund"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "refunded");
    assert_eq!(body["data"]["amountRefunded"], 100_000);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let fx = Fixture::new().await;
    let (status, body) = call(router(&fx), Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/packs/assign"].is_object());
}
