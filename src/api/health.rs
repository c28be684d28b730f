use axum::response::Json;
use serde_json::{Value, json};

/// `GET /health`: status plus the running build's version, for load
/// balancers and deployment scripts. No authentication required.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
