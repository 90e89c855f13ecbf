// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use destravate::config::Config;
use destravate::db::Store;
use destravate::ids::IdGenerator;
use destravate::routes::create_router;
use destravate::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app backed by an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        store: Store::memory(),
        ids: IdGenerator::new(),
    });
    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and return status and body.
#[allow(dead_code)]
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

/// Read a response body as JSON (`Null` when empty).
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[allow(dead_code)]
pub fn track_payload(name: &str, km: f64, elevation: f64) -> Value {
    json!({
        "nombre": name,
        "inicio": { "latitud": 40.7128, "longitud": -74.006 },
        "final": { "latitud": 40.72, "longitud": -74.0 },
        "longitud": km,
        "desnivel": elevation,
        "usuarios": [],
        "actividad": "Correr",
        "calificacion": 4
    })
}

#[allow(dead_code)]
pub fn user_payload(name: &str) -> Value {
    json!({
        "nombre": name,
        "actividad": "Bicicleta",
        "amigos": [],
        "grupos": [],
        "estadisticas": {},
        "rutas": [],
        "retos": [],
        "historicoRutas": {}
    })
}

#[allow(dead_code)]
pub fn group_payload(name: &str, owner: &str, members: &[&str]) -> Value {
    json!({
        "nombre": name,
        "miembrosID": members,
        "propietarioID": owner,
        "estadisticas": {},
        "ranking": [],
        "rutasFav": [],
        "historicoRutas": {}
    })
}

#[allow(dead_code)]
pub fn challenge_payload(name: &str, routes: &[&str]) -> Value {
    json!({
        "nombre": name,
        "rutas": routes,
        "actividad": "Correr",
        "total": 0,
        "usuarios": []
    })
}

/// POST a payload and return the generated id.
#[allow(dead_code)]
pub async fn create(app: &Router, collection: &str, payload: Value) -> String {
    let (status, body) = send_json(app, "POST", &format!("/{collection}"), Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["response"]["id"].as_str().unwrap().to_string()
}
