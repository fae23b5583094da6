use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use suggestor_common::SuggestorError;

use crate::AppState;

#[derive(Deserialize)]
pub struct ContentRequest {
    urls: Vec<String>,
}

fn error_response(err: &SuggestorError) -> Response {
    let status = match err {
        SuggestorError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"error": err.to_string()}))).into_response()
}

/// Register a task and process it in the background.
pub async fn process_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContentRequest>,
) -> Response {
    let record = match state.pipeline.start_task(&body.urls, state.store.as_ref()) {
        Ok(record) => record,
        Err(e) => {
            error!(error = %e, "Rejected content request");
            return error_response(&e);
        }
    };

    let response = json!({
        "task_id": record.task_id,
        "status": "started",
        "message": format!("Started processing {} URLs", record.total_urls),
        "urls_detected": record.urls_processed,
        "platforms_needed": record.platforms_needed,
    });

    let task_state = state.clone();
    tokio::spawn(async move {
        let _guard = task_state.run_lock.lock().await;
        task_state
            .pipeline
            .process_task(record, task_state.scraper.as_ref(), task_state.store.as_ref())
            .await;
    });

    Json(response).into_response()
}

pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Response {
    let record = match state.store.get(&task_id) {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Task not found"})),
            )
                .into_response();
        }
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Failed to load task");
            return error_response(&e);
        }
    };

    info!(task_id = %task_id, status = ?record.status, "Retrieved task results");
    Json(json!({
        "task_id": record.task_id,
        "status": record.status,
        "message": record.status.message(),
        "started_at": record.started_at,
        "completed_at": record.completed_at,
        "urls_processed": record.urls_processed,
        "platforms_needed": record.platforms_needed,
        "result_data": record.result_data,
        "error": record.error,
    }))
    .into_response()
}
