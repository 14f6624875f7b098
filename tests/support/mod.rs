//! In-process mock of the AirAware backend used by the integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const VALID_TOKEN: &str = "secret-token";

async fn air_quality(Path(location): Path<String>) -> Json<Value> {
    Json(json!({
        "id": "r-1",
        "location": location,
        "aqi": 163,
        "aqi_category": "UNHEALTHY",
        "pm25": "78.40",
        "temperature": 31.5,
        "measured_at": "2024-01-05T15:07:00Z"
    }))
}

async fn history(
    Path(location): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let range = format!(
        "{}..{}",
        params.get("startDate").cloned().unwrap_or_default(),
        params.get("endDate").cloned().unwrap_or_default()
    );
    Json(json!([
        {"location": location, "aqi": 42, "data_source": range},
        {"location": location, "aqi": 310, "data_source": range}
    ]))
}

async fn sensor(Path(id): Path<String>) -> impl IntoResponse {
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"id": id, "name": "Anand Vihar", "latitude": "28.646800", "city": "Delhi"}))
        .into_response()
}

async fn profile(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"));
    if authorized {
        Json(json!({"email": "asha@example.in", "alert_threshold": 120})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Authentication required"})),
        )
            .into_response()
    }
}

async fn contact(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"received": body}))
}

async fn remove_alert(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn download(Path(id): Path<String>) -> Vec<u8> {
    format!("%PDF report {id}").into_bytes()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

fn router() -> Router {
    Router::new()
        .route("/api/air-quality/:location", get(air_quality))
        .route("/api/air-quality/:location/history", get(history))
        .route("/api/sensors/:id", get(sensor))
        .route("/api/user/profile", get(profile))
        .route("/api/contact", post(contact))
        .route("/api/alerts/:id", delete(remove_alert))
        .route("/api/reports/:id/download", get(download))
        .route("/api/slow", get(slow))
}

/// Start the mock backend and return its base URL (including the `/api` prefix).
pub async fn spawn_backend() -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind mock backend");
    let addr = listener
        .local_addr()
        .expect("Failed to get local address of mock backend");
    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("Mock backend failed");
    });
    format!("http://{addr}/api")
}

/// A base URL on which nothing is listening.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to get throwaway address");
    drop(listener);
    format!("http://{addr}")
}
