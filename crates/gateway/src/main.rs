//! DocSage API Gateway
//!
//! The HTTP surface of the service:
//! - Document upload and ingestion
//! - Grounded question answering
//! - Challenge generation and answer evaluation
//! - Session reset
//!
//! All state is per-session and in-memory; requests carry session identity
//! via the `X-Session-ID` header.

mod extract;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use docsage_common::{
    config::AppConfig,
    metrics as app_metrics,
    session::SessionStore,
};
use docsage_engine::{
    challenge::ChallengeConfig, create_embedder, evaluator::EvaluatorConfig, qa::QaConfig,
    summarizer::SummarizerConfig, AnswerEvaluator, ChallengeGenerator, Embedder, QaEngine,
    Summarizer,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

/// Slack on top of the configured file limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SessionStore>,
    pub embedder: Arc<dyn Embedder>,
    pub summarizer: Arc<Summarizer>,
    pub qa: Arc<QaEngine>,
    pub challenger: Arc<ChallengeGenerator>,
    pub evaluator: Arc<AnswerEvaluator>,
}

impl AppState {
    /// Wire the engines up from configuration
    pub fn build(config: Arc<AppConfig>) -> docsage_common::Result<Self> {
        let embedder = create_embedder(&config.embedding)?;

        let summarizer = Arc::new(Summarizer::new(SummarizerConfig {
            max_words: config.engine.summary_max_words,
            ..SummarizerConfig::default()
        }));

        let qa = Arc::new(QaEngine::new(
            embedder.clone(),
            QaConfig {
                top_chunks: config.engine.qa_top_chunks,
                min_chunk_score: config.engine.qa_min_score,
                ..QaConfig::default()
            },
        ));

        let challenger = Arc::new(ChallengeGenerator::new(ChallengeConfig {
            question_count: config.engine.challenge_questions,
            ..ChallengeConfig::default()
        }));

        let evaluator = Arc::new(AnswerEvaluator::new(
            embedder.clone(),
            EvaluatorConfig::default(),
        ));

        Ok(Self {
            config,
            store: Arc::new(SessionStore::new()),
            embedder,
            summarizer,
            qa,
            challenger,
            evaluator,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    init_tracing(&config);

    tracing::info!(
        version = docsage_common::VERSION,
        embedding_provider = %config.embedding.provider,
        "Starting DocSage gateway"
    );

    init_metrics(&config);

    // Create app state
    let state = AppState::build(config.clone())?;

    tracing::info!(model = state.embedder.model_name(), "Embedder ready");

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let body_limit = state.config.upload.max_bytes + MULTIPART_OVERHEAD;

    // API routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/upload", post(handlers::upload::upload))
        .route("/ask", post(handlers::ask::ask))
        .route("/challenge", post(handlers::challenge::challenge))
        .route("/evaluate", post(handlers::evaluate::evaluate))
        .route("/reset", post(handlers::reset::reset));

    // Compose the app
    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Initialize the tracing subscriber
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Register metrics and expose them when a scrape port is configured
fn init_metrics(config: &AppConfig) {
    app_metrics::register_metrics();

    let port = config.observability.metrics_port;
    if port == 0 {
        return;
    }

    match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
    {
        Ok(()) => tracing::info!(port, "Prometheus exporter listening"),
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "docsage-test-boundary";

    const FIXTURE: &str = "Photosynthesis is the process by which green plants convert \
sunlight into chemical energy. The light reactions take place inside the chloroplasts \
of plant cells. Chlorophyll pigments absorb mostly blue and red wavelengths of light. \
Plants release oxygen as a byproduct of photosynthesis. Cellular respiration later \
releases the stored chemical energy for plant growth. Water and carbon dioxide are the \
primary inputs of photosynthesis. Sugars produced during photosynthesis feed the growth \
of new plant tissues.";

    fn test_router() -> Router {
        create_router(AppState::build(Arc::new(AppConfig::default())).unwrap())
    }

    fn router_with_upload_limit(max_bytes: usize) -> Router {
        let mut config = AppConfig::default();
        config.upload.max_bytes = max_bytes;
        create_router(AppState::build(Arc::new(config)).unwrap())
    }

    fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(session: &str, filename: &str, content: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("X-Session-ID", session)
            .body(Body::from(multipart_body(filename, content)))
            .unwrap()
    }

    fn json_request(uri: &str, session: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Session-ID", session)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_upload_returns_summary() {
        let response = test_router()
            .oneshot(upload_request("s-upload", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["filename"], "biology.txt");
        assert_eq!(body["session_id"], "s-upload");
        assert!(body["word_count"].as_u64().unwrap() > 0);

        let summary = body["summary"].as_str().unwrap();
        assert!(!summary.is_empty());
        assert!(summary.split_whitespace().count() <= 150);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let response = test_router()
            .oneshot(upload_request("s-type", "image.png", b"not really a png"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Invalid file type"));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let router = router_with_upload_limit(512);
        let oversized = "All work and no play makes for dull documents. ".repeat(40);

        let response = router
            .oneshot(upload_request("s-size", "big.txt", oversized.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_upload_rejects_tiny_document() {
        let response = test_router()
            .oneshot(upload_request("s-tiny", "tiny.txt", b"Too small."))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("too short or could not be parsed"));
    }

    #[tokio::test]
    async fn test_ask_without_document_fails() {
        let response = test_router()
            .oneshot(json_request(
                "/api/ask",
                "s-nodoc",
                json!({"question": "What is photosynthesis?"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("No document uploaded"));
    }

    #[tokio::test]
    async fn test_ask_returns_grounded_answer() {
        let router = test_router();

        let upload = router
            .clone()
            .oneshot(upload_request("s-ask", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();
        assert_eq!(upload.status(), StatusCode::OK);

        let response = router
            .oneshot(json_request(
                "/api/ask",
                "s-ask",
                json!({"question": "What do green plants convert sunlight into?"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);

        let sources = body["source_sentences"].as_array().unwrap();
        assert!(sources
            .iter()
            .any(|s| s.as_str().unwrap().contains("convert sunlight into chemical energy")));

        let references = body["references"].as_array().unwrap();
        assert!(!references.is_empty());
        assert!(references[0].as_str().unwrap().starts_with("Based on"));
    }

    #[tokio::test]
    async fn test_ask_with_empty_question_fails() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-empty-q", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request("/api/ask", "s-empty-q", json!({"question": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No question provided"));
    }

    #[tokio::test]
    async fn test_reset_clears_session() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-reset", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        let reset = router
            .clone()
            .oneshot(json_request("/api/reset", "s-reset", json!({})))
            .await
            .unwrap();
        assert_eq!(reset.status(), StatusCode::OK);
        let body = response_json(reset).await;
        assert_eq!(body["success"], true);

        // A reset session must fail exactly like a never-uploaded one
        let response = router
            .oneshot(json_request(
                "/api/ask",
                "s-reset",
                json!({"question": "What is photosynthesis?"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No document uploaded"));
    }

    #[tokio::test]
    async fn test_challenge_requires_document() {
        let response = test_router()
            .oneshot(json_request("/api/challenge", "s-nochallenge", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_challenge_generates_three_questions() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-challenge", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request("/api/challenge", "s-challenge", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);

        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        for q in questions {
            assert!(!q["question"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_evaluate_out_of_range_index() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-oob", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(json_request("/api/challenge", "s-oob", json!({})))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request(
                "/api/evaluate",
                "s-oob",
                json!({"question_index": 99, "answer": "An answer."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Invalid question index"));
    }

    #[tokio::test]
    async fn test_evaluate_requires_fields() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-fields", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request("/api/evaluate", "s-fields", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Question index and answer are required"));
    }

    #[tokio::test]
    async fn test_evaluate_without_challenge_fails() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-nochal", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request(
                "/api/evaluate",
                "s-nochal",
                json!({"question_index": 0, "answer": "An answer."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No active challenge"));
    }

    #[tokio::test]
    async fn test_evaluate_scores_an_answer() {
        let router = test_router();

        router
            .clone()
            .oneshot(upload_request("s-eval", "biology.txt", FIXTURE.as_bytes()))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(json_request("/api/challenge", "s-eval", json!({})))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request(
                "/api/evaluate",
                "s-eval",
                json!({
                    "question_index": 0,
                    "answer": "Photosynthesis converts sunlight into chemical energy inside the chloroplasts of plants."
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);

        let evaluation = &body["evaluation"];
        let percentage = evaluation["percentage"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&percentage));
        assert!(!evaluation["grade"].as_str().unwrap().is_empty());
        assert!(!evaluation["feedback"].as_str().unwrap().is_empty());
        assert!(!evaluation["analysis"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_session_header_uses_default() {
        let router = test_router();

        let upload = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("biology.txt", FIXTURE.as_bytes())))
            .unwrap();
        let response = router.clone().oneshot(upload).await.unwrap();

        let body = response_json(response).await;
        assert_eq!(body["session_id"], "default");
    }
}
