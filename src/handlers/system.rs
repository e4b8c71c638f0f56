use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "http-failure",
            "version": version,
            "description": "Reference REST API for HTTP failure signals",
            "endpoints": {
                "home": "/",
                "health": "/health",
                "users": "/api/users",
                "user": "/api/users/:id",
            }
        }
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
