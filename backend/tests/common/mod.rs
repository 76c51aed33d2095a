//! In-process stand-in for the sensor service
//!
//! Serves the endpoints the dashboard consumes from a throwaway listener on
//! 127.0.0.1 and records every rating it receives. `ScriptedSource` skips
//! HTTP altogether for cache and polling tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::{ready, Future};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sembrando_bits_backend::external::SensorDataSource;
use sembrando_bits_backend::{AppError, AppResult};
use serde_json::{json, Value};
use shared::{DeviceId, SensorReading};

/// Requests observed by the fake service, plus its failure switches
#[derive(Clone, Default)]
pub struct FakeSensorService {
    pub ratings: Arc<Mutex<Vec<Value>>>,
    pub reject_ratings: Arc<AtomicBool>,
    pub readings_down: Arc<AtomicBool>,
}

impl FakeSensorService {
    pub fn rating_posts(&self) -> usize {
        self.ratings.lock().unwrap().len()
    }

    pub fn set_readings_down(&self, down: bool) {
        self.readings_down.store(down, Ordering::SeqCst);
    }

    pub fn set_reject_ratings(&self, reject: bool) {
        self.reject_ratings.store(reject, Ordering::SeqCst);
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(|| async { Json(json!({"message": "API de medidas"})) }))
            .route("/dispositivos", get(list_devices))
            .route("/dispositivo/:id", get(device_data))
            .route("/listar_sensores_campos", get(sensor_fields))
            .route("/votacion", post(store_rating))
            .route("/votaciones", get(list_ratings))
            .route("/votaciones/estadisticas", get(rating_statistics))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the base URL
    pub async fn spawn(&self) -> String {
        spawn_router(self.router()).await
    }
}

pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn list_devices() -> Json<Value> {
    Json(json!([
        {"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "nombre": "Parcela norte", "ubicacion": "Zacatecas", "created_at": "2024-05-01T10:00:00"},
        {"_id": "65a1f0c2e4b0a1b2c3d4e5f7", "nombre": "Parcela sur", "created_at": "2024-05-02T10:00:00"}
    ]))
}

async fn device_data(
    State(service): State<FakeSensorService>,
    Path(id): Path<u32>,
) -> (StatusCode, Json<Value>) {
    if service.readings_down.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Error al obtener datos"})),
        );
    }

    match id {
        1 => (
            StatusCode::OK,
            Json(json!({
                "dispositivo": 1,
                "dispositivo_nombre": "Parcela norte",
                "datos": {
                    "humedad_suelo": 65.0,
                    "ph_suelo": 6.5,
                    "conductividad": 2.5,
                    "temperatura": 24.0
                },
                "sensores": []
            })),
        ),
        2 => (
            StatusCode::OK,
            Json(json!({
                "dispositivo": 2,
                "dispositivo_nombre": "Parcela sur",
                "datos": {"humedad": "40", "ph": 5.0, "conductividad": 2.5, "estado": null},
                "sensores": []
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Dispositivo no encontrado"})),
        ),
    }
}

async fn sensor_fields() -> Json<Value> {
    Json(json!([
        {
            "sensor_id": "s1",
            "sensor": "Sonda de suelo",
            "tipo_sensor": "suelo",
            "activo": true,
            "dispositivo_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "campos": [
                {"campo_id": "c1", "nombre_campo": "humedad_suelo", "tipo_campo": "float", "activo": true},
                {"campo_id": "c2", "nombre_campo": "ph_suelo", "tipo_campo": "float", "activo": true}
            ]
        },
        {
            "sensor_id": "s2",
            "sensor": "Sonda retirada",
            "tipo_sensor": "suelo",
            "activo": false,
            "dispositivo_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "campos": []
        },
        {
            "sensor_id": "s3",
            "sensor": "Termómetro",
            "tipo_sensor": "aire",
            "activo": true,
            "dispositivo_id": null,
            "campos": [
                {"campo_id": "c3", "nombre_campo": "temperatura_aire", "tipo_campo": "float", "activo": true}
            ]
        }
    ]))
}

async fn store_rating(
    State(service): State<FakeSensorService>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    service.ratings.lock().unwrap().push(body.clone());

    if service.reject_ratings.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Error al guardar votación"})),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({"mensaje": "Votación guardada", "id": "v1", "votacion": body})),
    )
}

async fn list_ratings(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(100);
    let stored = vec![
        json!({"_id": "v5", "rating": 3, "dispositivo": "abc", "cultivo": "nopal", "medio": "Terreno", "timestamp": "2024-05-04T09:00:00"}),
        json!({"_id": "v4", "rating": 5, "dispositivo": 1, "cultivo": "maiz", "medio": "terreno", "timestamp": "2024-05-03T12:00:00.123456"}),
        json!({"_id": "v3", "rating": 4, "dispositivo": 1, "cultivo": "maiz", "medio": "terreno", "timestamp": "2024-05-03T11:00:00"}),
        json!({"_id": "v2", "rating": 4, "dispositivo": null, "cultivo": null, "medio": null, "timestamp": "2024-05-02T11:00:00"}),
        json!({"_id": "v1", "rating": 1}),
    ];
    let votaciones: Vec<Value> = stored.into_iter().take(limit).collect();
    Json(json!({"total": votaciones.len(), "votaciones": votaciones}))
}

/// Aggregates over a store far larger than any listing window
async fn rating_statistics() -> Json<Value> {
    Json(json!({
        "total_votaciones": 240,
        "promedio_rating": 3.87,
        "distribucion": {"1": 12, "2": 18, "3": 40, "4": 90, "5": 80}
    }))
}

// ============================================================================
// In-memory Source
// ============================================================================

/// Source answering from memory, with a switch to simulate an outage
#[derive(Default)]
pub struct ScriptedSource {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl ScriptedSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl SensorDataSource for ScriptedSource {
    fn fetch_device_readings(
        &self,
        device: DeviceId,
    ) -> impl Future<Output = AppResult<SensorReading>> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(AppError::UpstreamUnavailable("scripted outage".to_string()))
        } else {
            Ok(SensorReading::new()
                .with("humedad", 60.0 + f64::from(device.get()))
                .with("muestra", call as f64))
        };
        ready(result)
    }
}

