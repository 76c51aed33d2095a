//! HTTP API tests
//!
//! Drives the full router against the fake sensor service:
//! - Device, reading and gauge endpoints
//! - Crop catalog and compatibility reports
//! - Session controls
//! - Rating submission and summary

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use common::{unreachable_base_url, FakeSensorService};
use sembrando_bits_backend::config::{PollingConfig, ServerConfig, UpstreamConfig};
use sembrando_bits_backend::{create_app, external::SensorApiClient, AppState, Config};
use serde_json::{json, Value};
use shared::CropCatalog;
use tower::ServiceExt;

fn test_config(base_url: &str) -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        upstream: UpstreamConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: Some(5),
        },
        polling: PollingConfig::default(),
        crops: None,
    }
}

fn app_for(base_url: &str) -> Router {
    let config = test_config(base_url);
    let client = SensorApiClient::new(base_url, config.upstream.request_timeout()).unwrap();
    create_app(AppState::new(config, CropCatalog::builtin(), client))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

// ============================================================================
// Health and Devices
// ============================================================================

#[tokio::test]
async fn test_health_reports_upstream() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["upstream"], "connected");
}

#[tokio::test]
async fn test_health_with_service_down() {
    let app = app_for(&unreachable_base_url().await);

    let (status, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upstream"], "disconnected");
}

#[tokio::test]
async fn test_list_devices() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/devices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[1]["name"], "Parcela sur");
}

#[tokio::test]
async fn test_list_devices_service_down() {
    let app = app_for(&unreachable_base_url().await);

    let (status, body) = get(&app, "/api/v1/devices").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_readings_stay_visible_during_outage() {
    let service = FakeSensorService::default();
    let app = app_for(&service.spawn().await);

    let (status, body) = get(&app, "/api/v1/devices/1/readings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stale"], false);
    assert_eq!(body["readings"]["humedad_suelo"], 65.0);

    service.set_readings_down(true);
    let (status, body) = get(&app, "/api/v1/devices/1/readings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stale"], true);
    assert_eq!(body["readings"]["humedad_suelo"], 65.0);
    assert!(body["lastError"].is_string());
}

#[tokio::test]
async fn test_device_zero_rejected() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/devices/0/readings").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "device");
}

#[tokio::test]
async fn test_gauges_for_device() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/devices/1/gauges").await;

    assert_eq!(status, StatusCode::OK);
    let gauges = body.as_array().unwrap();
    let humidity = gauges.iter().find(|g| g["parameter"] == "humidity").unwrap();
    assert_eq!(humidity["value"], 65.0);
    assert_eq!(humidity["status"], "good");
}

#[tokio::test]
async fn test_sensor_fields() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/sensors/fields").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"]["unassigned"][0]["sensor_name"], "Termómetro");
}

// ============================================================================
// Crops and Compatibility
// ============================================================================

#[tokio::test]
async fn test_list_crops() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/crops").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["maiz", "tabaco", "nopal", "lima", "frijoles"]);
}

#[tokio::test]
async fn test_compatibility_for_device() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/crops/maiz/compatibility?device=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compatibilityPercentage"], 100);
    assert_eq!(body["status"], "compatible");
    assert_eq!(body["sourceDevice"], 1);
}

#[tokio::test]
async fn test_compatibility_with_issues() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/crops/maiz/compatibility?device=2").await;

    assert_eq!(status, StatusCode::OK);
    // humidity 40 and pH 5.0 miss, conductivity 2.5 passes
    assert_eq!(body["compatibilityPercentage"], 33);
    assert_eq!(body["status"], "no-compatible");
    assert_eq!(body["compatible"], false);
    assert_eq!(body["issues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_compatibility_before_any_reading() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/crops/tabaco/compatibility").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "revisar");
    assert!(body.get("score").is_none());
}

#[tokio::test]
async fn test_unknown_crop_not_found() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/crops/arroz/compatibility").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_session_flow() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = send(&app, Method::PUT, "/api/v1/session/medium", Some(json!({"medium": "terreno"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medium"], "terreno");

    let (status, body) = send(&app, Method::PUT, "/api/v1/session/device", Some(json!({"device": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device"], 1);
    assert_eq!(body["finePolling"], true);

    let (status, _) = send(&app, Method::PUT, "/api/v1/session/crop", Some(json!({"crop": "lima"}))).await;
    assert_eq!(status, StatusCode::OK);

    // Let the fine poller fetch the selected device
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let (status, body) = get(&app, "/api/v1/session/compatibility").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cropId"], "lima");
    assert_eq!(body["sourceDevice"], 1);
    assert_eq!(body["compatibilityPercentage"], 100);

    let (_, body) = send(&app, Method::PUT, "/api/v1/session/medium", Some(json!({"medium": "terreno"}))).await;
    assert!(body["medium"].is_null());
    assert!(body["device"].is_null());
    assert!(body["crop"].is_null());
}

#[tokio::test]
async fn test_session_unknown_crop() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, _) = send(&app, Method::PUT, "/api/v1/session/crop", Some(json!({"crop": "arroz"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Ratings
// ============================================================================

#[tokio::test]
async fn test_submit_rating_uses_session_selection() {
    let service = FakeSensorService::default();
    let app = app_for(&service.spawn().await);
    send(&app, Method::PUT, "/api/v1/session/medium", Some(json!({"medium": "aire"}))).await;
    send(&app, Method::PUT, "/api/v1/session/crop", Some(json!({"crop": "frijoles"}))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/ratings", Some(json!({"rating": 5}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"]["cultivo"], "frijoles");
    let posted = service.ratings.lock().unwrap()[0].clone();
    assert_eq!(posted["medio"], "aire");
    assert_eq!(posted["rating"], 5);

    let (_, session) = get(&app, "/api/v1/session").await;
    assert!(session["pendingRating"].is_null());
}

#[tokio::test]
async fn test_out_of_range_rating_never_sent() {
    let service = FakeSensorService::default();
    let app = app_for(&service.spawn().await);

    for rating in [0, 6, -1] {
        let (status, body) = send(&app, Method::POST, "/api/v1/ratings", Some(json!({"rating": rating}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "rating");
    }

    assert_eq!(service.rating_posts(), 0);
}

#[tokio::test]
async fn test_failed_rating_sent_once_and_reset() {
    let service = FakeSensorService::default();
    service.set_reject_ratings(true);
    let app = app_for(&service.spawn().await);

    let (status, _) = send(&app, Method::POST, "/api/v1/ratings", Some(json!({"rating": 3}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(service.rating_posts(), 1);
    let (_, session) = get(&app, "/api/v1/session").await;
    assert!(session["pendingRating"].is_null());
}

#[tokio::test]
async fn test_rating_summary() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/ratings/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 240);
    assert_eq!(body["average"], 3.87);
    assert_eq!(body["distribution"], json!([12, 18, 40, 90, 80]));
}

#[tokio::test]
async fn test_recent_ratings() {
    let app = app_for(&FakeSensorService::default().spawn().await);

    let (status, body) = get(&app, "/api/v1/ratings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["_id"], "v5");
    assert_eq!(body[0]["medio"], "terreno");
    assert!(body[0]["dispositivo"].is_null());

    let (status, body) = get(&app, "/api/v1/ratings?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recent_ratings_service_down() {
    let app = app_for(&unreachable_base_url().await);

    let (status, body) = get(&app, "/api/v1/ratings").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
}
