pub mod remix;
pub mod tasks;

use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "AI Content Suggestor - Complete Pipeline",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Social media scraping, processing, and content selection API"
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
