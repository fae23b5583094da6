use std::sync::Arc;

use ai_client::OpenAi;
use anyhow::Result;
use apify_client::ApifyClient;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use suggestor_common::Config;
use suggestor_pipeline::{FileTaskStore, Pipeline, SocialScraper, TaskStore};
use suggestor_remix::{ApifyTranscripts, Remixer};

mod rest;

pub struct AppState {
    pub pipeline: Pipeline,
    pub scraper: Arc<dyn SocialScraper>,
    pub store: Arc<dyn TaskStore>,
    /// Runs share one raw buffer, so only one pipeline runs at a time.
    pub run_lock: Mutex<()>,
    /// `None` when no OpenAI key is configured.
    pub remixer: Option<Remixer>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route("/health", get(rest::health))
        .route("/process-content", post(rest::tasks::process_content))
        .route("/results/{task_id}", get(rest::tasks::get_results))
        .route("/remix", post(rest::remix::remix_content))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("suggestor=info".parse()?)
                .add_directive("apify_client=info".parse()?)
                .add_directive("ai_client=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let apify_key = config.require_apify_key()?.to_string();
    let scraper = ApifyClient::new(apify_key.clone());
    let remixer = match config.openai_api_key.as_deref() {
        Some(key) => Some(Remixer::new(
            Arc::new(OpenAi::new(key, config.openai_model.clone())),
            Arc::new(ApifyTranscripts::new(
                ApifyClient::new(apify_key),
                config.transcript_language.clone(),
            )),
        )),
        None => {
            warn!("OPENAI_API_KEY not set, /remix is disabled");
            None
        }
    };
    let store = FileTaskStore::new(config.tasks_dir.clone());
    let addr = format!("{}:{}", config.api_host, config.api_port);

    let state = Arc::new(AppState {
        pipeline: Pipeline::new(config),
        scraper: Arc::new(scraper),
        store: Arc::new(store),
        run_lock: Mutex::new(()),
        remixer,
    });

    info!("Content suggestor API starting on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use suggestor_common::Platform;
    use suggestor_pipeline::{MemoryTaskStore, ScrapeConfig};
    use suggestor_remix::TranscriptSource;
    use tower::ServiceExt;

    struct OneVideo;

    #[async_trait]
    impl SocialScraper for OneVideo {
        async fn scrape(&self, _: Platform, config: &ScrapeConfig) -> anyhow::Result<Vec<Value>> {
            Ok(vec![json!({
                "webVideoUrl": format!("{}/video/1", config.target_url),
                "playCount": 500
            })])
        }
    }

    struct EchoLlm;

    #[async_trait]
    impl ai_client::Completion for EchoLlm {
        async fn complete(&self, _: &str, prompt: &str) -> anyhow::Result<String> {
            Ok(format!("hook for {} chars", prompt.len()))
        }
    }

    struct NoTranscripts;

    #[async_trait]
    impl TranscriptSource for NoTranscripts {
        async fn transcript(&self, _: Platform, _: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
    }

    fn test_state(dir: &tempfile::TempDir) -> Arc<AppState> {
        let config = Config {
            data_dir: dir.path().join("data"),
            tasks_dir: dir.path().join("tasks"),
            ..Config::default()
        };
        Arc::new(AppState {
            pipeline: Pipeline::new(config),
            scraper: Arc::new(OneVideo),
            store: Arc::new(MemoryTaskStore::new()),
            run_lock: Mutex::new(()),
            remixer: Some(Remixer::new(Arc::new(EchoLlm), Arc::new(NoTranscripts))),
        })
    }

    fn post_remix(body: Value) -> Request<Body> {
        Request::post("/remix")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_urls(urls: Value) -> Request<Body> {
        Request::post("/process-content")
            .header("content-type", "application/json")
            .body(Body::from(json!({"urls": urls}).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(test_state(&dir))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn unknown_task_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(test_state(&dir))
            .oneshot(Request::get("/results/task_nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_url_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(test_state(&dir)).oneshot(post_urls(json!([]))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn submitted_task_completes() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let response = app(state.clone())
            .oneshot(post_urls(json!(["https://www.tiktok.com/@jennaezarik"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let started = body_json(response).await;
        assert_eq!(started["status"], "started");
        assert_eq!(started["platforms_needed"], json!(["tiktok"]));
        let task_id = started["task_id"].as_str().unwrap().to_string();

        let mut last = Value::Null;
        for _ in 0..100 {
            let response = app(state.clone())
                .oneshot(
                    Request::get(format!("/results/{task_id}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            last = body_json(response).await;
            if last["status"] != "processing" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        assert_eq!(last["status"], "completed", "{last}");
        assert_eq!(last["message"], "Content processing completed successfully!");
        assert_eq!(last["result_data"][0]["post_number"], "post_1");
        assert_eq!(last["result_data"][0]["engagement_score"], 100.0);
    }

    #[tokio::test]
    async fn remix_hook_for_selected_post() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(test_state(&dir))
            .oneshot(post_remix(json!({
                "remix_type": "hook",
                "platform": "linkedin",
                "content_type": "post",
                "type": "text",
                "text": "We shipped the new billing system.",
                "URL_GROUP": "https://www.linkedin.com/in/someone/",
                "engagement_score": 55.0,
                "post_number": "post_3"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["remix_type"], "hook");
        assert_eq!(body["post_number"], "post_3");
        assert!(body["remixed_content"].as_str().unwrap().starts_with("hook for "));
    }

    #[tokio::test]
    async fn remix_without_transcript_is_a_gateway_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(test_state(&dir))
            .oneshot(post_remix(json!({
                "remix_type": "script",
                "platform": "tiktok",
                "content_type": "video",
                "type": "video",
                "url": "https://www.tiktok.com/@a/video/1",
                "post_number": "post_1"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("transcript not available"));
    }

    #[tokio::test]
    async fn remix_is_unavailable_without_a_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("data"),
            ..Config::default()
        };
        let state = Arc::new(AppState {
            pipeline: Pipeline::new(config),
            scraper: Arc::new(OneVideo),
            store: Arc::new(MemoryTaskStore::new()),
            run_lock: Mutex::new(()),
            remixer: None,
        });
        let response = app(state)
            .oneshot(post_remix(json!({
                "remix_type": "hook",
                "platform": "twitter",
                "content_type": "tweet",
                "type": "text",
                "text": "hi"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
