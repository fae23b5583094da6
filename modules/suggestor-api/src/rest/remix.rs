use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use suggestor_common::ContentItem;
use suggestor_remix::RemixKind;

use crate::AppState;

/// A selected post as returned by `/results`, plus what to make of it.
#[derive(Deserialize)]
pub struct RemixRequest {
    remix_type: RemixKind,
    #[serde(flatten)]
    post: ContentItem,
}

pub async fn remix_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RemixRequest>,
) -> Response {
    let Some(remixer) = &state.remixer else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "Remixing is disabled: OPENAI_API_KEY is not set"})),
        )
            .into_response();
    };

    let post_number = body.post.post_number.as_deref().unwrap_or("unknown");
    match remixer.remix(body.remix_type, &body.post).await {
        Ok(content) => Json(json!({
            "status": "success",
            "message": "Data received and processed",
            "remix_type": body.remix_type,
            "post_number": post_number,
            "remixed_content": content,
        }))
        .into_response(),
        Err(e) => {
            error!(post_number, error = %e, "Remix failed");
            let status = if e.is_bad_input() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}
