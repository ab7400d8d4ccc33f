use agentkit_core::{AgentConfig, AgentSession, CredentialStore};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::apis;

/// Configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    pub address: String,
    /// Agent session configuration
    pub agent: AgentConfig,
}

impl ServerConfig {
    pub fn new(address: String, agent: AgentConfig) -> Self {
        Self { address, agent }
    }
}

/// Shared by every request: the one agent session and the credential file it wrote
#[derive(Clone)]
pub struct ServerState {
    pub session: Arc<AgentSession>,
    pub credentials: CredentialStore,
}

impl ServerState {
    pub fn new(session: AgentSession, credentials: CredentialStore) -> Self {
        Self {
            session: Arc::new(session),
            credentials,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/prompt", post(apis::handle_prompt))
        .route("/api/wallet", get(apis::handle_get_wallet))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bring up the agent session, then serve until Ctrl+C.
/// Returns early, without binding, if the session cannot be initialized.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let session = AgentSession::initialize(&config.agent).await?;
    let credentials = CredentialStore::new(&config.agent.wallet_data_file);

    println!("✓ Agent initialized");
    if let Some(wallet) = session.wallet() {
        println!("  Wallet: \x1b[1m{}\x1b[0m ({})", wallet.default_address(), wallet.network_id());
    }
    println!("  Model: \x1b[1m{}\x1b[0m", config.agent.llm.model);
    println!("  Thread: \x1b[1m{}\x1b[0m", session.thread_id());
    println!();

    let app = router(ServerState::new(session, credentials));
    let listener = tokio::net::TcpListener::bind(&config.address).await?;

    println!("Server starting on \x1b[1mhttp://{}\x1b[0m", config.address);
    println!("\nAvailable endpoints:");
    println!("  \x1b[1mPOST /api/prompt\x1b[0m   - Send a prompt to the agent (SSE stream)");
    println!("  \x1b[1mGET  /api/wallet\x1b[0m   - Exported wallet data");
    println!("\nPress Ctrl+C to stop\n");

    info!("HTTP server listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentkit_core::{AgentError, AgentEvent, EventStream, ReasoningEngine, ThreadConfig};
    use agentkit_llm::ChatMessage;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use futures::StreamExt;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    type Script = fn() -> Vec<Result<AgentEvent, AgentError>>;

    /// Engine that replays a fixed script of events and counts invocations
    struct ScriptedEngine {
        script: Script,
        calls: Arc<AtomicUsize>,
    }

    impl ReasoningEngine for ScriptedEngine {
        fn stream(&self, _messages: Vec<ChatMessage>, _thread: &ThreadConfig) -> Result<EventStream, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(futures::stream::iter((self.script)()).boxed())
        }
    }

    /// Engine that emits one event and then never finishes
    struct StallingEngine {
        calls: Arc<AtomicUsize>,
    }

    impl ReasoningEngine for StallingEngine {
        fn stream(&self, _messages: Vec<ChatMessage>, _thread: &ThreadConfig) -> Result<EventStream, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let first = futures::stream::iter(vec![Ok(AgentEvent::agent("first"))]);
            Ok(first.chain(futures::stream::pending()).boxed())
        }
    }

    struct UnreachableEngine;

    impl ReasoningEngine for UnreachableEngine {
        fn stream(&self, _messages: Vec<ChatMessage>, _thread: &ThreadConfig) -> Result<EventStream, AgentError> {
            Err(AgentError::invocation("model endpoint unreachable"))
        }
    }

    struct TestApp {
        app: Router,
        calls: Arc<AtomicUsize>,
        store: CredentialStore,
        _dir: TempDir,
    }

    fn app_with(engine: Arc<dyn ReasoningEngine>, calls: Arc<AtomicUsize>) -> TestApp {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("wallet_data.txt"));
        let session = AgentSession::new(engine, ThreadConfig::default());
        TestApp {
            app: router(ServerState::new(session, store.clone())),
            calls,
            store,
            _dir: dir,
        }
    }

    fn scripted(script: Script) -> TestApp {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = ScriptedEngine { script, calls: calls.clone() };
        app_with(Arc::new(engine), calls)
    }

    fn post_prompt(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/prompt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_wallet() -> Request<Body> {
        Request::builder().uri("/api/wallet").body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    /// Split an SSE body into frame payloads; data frames are unwrapped to their chunk text
    fn frames(body: &str) -> Vec<String> {
        body.split("\n\n")
            .filter(|frame| !frame.is_empty())
            .map(|frame| {
                let data = frame.strip_prefix("data: ").expect("data frame");
                if data == "[DONE]" {
                    return data.to_string();
                }
                let envelope: serde_json::Value = serde_json::from_str(data).expect("envelope json");
                envelope["chunk"].as_str().expect("chunk field").to_string()
            })
            .collect()
    }

    #[tokio::test]
    async fn prompt_streams_frames_in_event_order() {
        let test = scripted(|| {
            vec![
                Ok(AgentEvent::agent("a")),
                Ok(AgentEvent::tool("b")),
                Ok(AgentEvent::agent("c")),
            ]
        });

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        let body = body_text(response).await;
        assert_eq!(frames(&body), vec!["a", "b", "c", "[DONE]"]);
        assert!(body.ends_with("data: [DONE]\n\n"));
    }

    #[tokio::test]
    async fn events_without_content_produce_no_frame() {
        let test = scripted(|| {
            vec![
                Ok(AgentEvent::agent("")),
                Ok(AgentEvent::tool("balance: 0")),
                Ok(AgentEvent::agent("")),
                Ok(AgentEvent::agent("done")),
            ]
        });

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        assert_eq!(frames(&body_text(response).await), vec!["balance: 0", "done", "[DONE]"]);
    }

    #[tokio::test]
    async fn only_first_message_of_an_event_is_forwarded() {
        let test = scripted(|| {
            vec![Ok(AgentEvent::ToolMessage {
                messages: vec!["first".into(), "second".into()],
            })]
        });

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        assert_eq!(frames(&body_text(response).await), vec!["first", "[DONE]"]);
    }

    #[tokio::test]
    async fn chunk_text_is_json_escaped() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("line one\nline \"two\""))]);

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();
        let body = body_text(response).await;

        assert!(body.starts_with(r#"data: {"chunk":"line one\nline \"two\""}"#));
        assert_eq!(frames(&body), vec!["line one\nline \"two\"", "[DONE]"]);
    }

    #[tokio::test]
    async fn missing_prompt_is_rejected_before_the_engine() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("never"))]);

        let response = test.app.oneshot(post_prompt("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Prompt is required.");
        assert_eq!(test.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let test = scripted(|| vec![]);

        let response = test.app.oneshot(post_prompt(r#"{"prompt":""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let test = scripted(|| vec![]);

        let response = test.app.oneshot(post_prompt("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn failure_before_first_frame_is_a_server_error() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("")), Err(AgentError::invocation("connection refused"))]);

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to process prompt.");
    }

    #[tokio::test]
    async fn engine_that_cannot_start_is_a_server_error() {
        let test = app_with(Arc::new(UnreachableEngine), Arc::new(AtomicUsize::new(0)));

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to process prompt.");
    }

    #[tokio::test]
    async fn failure_after_first_frame_truncates_the_stream() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("partial")), Err(AgentError::StepLimit(25))]);

        let response = test.app.oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();

        // status was committed with the first frame
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64).await;
        assert!(body.is_err(), "body should end abnormally, without [DONE]");
    }

    #[tokio::test]
    async fn wallet_without_backing_file_is_not_found() {
        let test = scripted(|| vec![]);

        let response = test.app.oneshot(get_wallet()).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Wallet data not found.");
    }

    #[tokio::test]
    async fn wallet_returns_saved_credential() {
        let test = scripted(|| vec![]);
        let blob = r#"{"walletId":"w-1","seed":"00ff","networkId":"base-sepolia","defaultAddressId":"0xabc"}"#;
        test.store.save(blob).await.unwrap();

        let response = test.app.oneshot(get_wallet()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["walletData"], blob);
    }

    #[tokio::test]
    async fn unreadable_wallet_file_is_a_server_error() {
        let dir = TempDir::new().unwrap();
        let session = AgentSession::new(Arc::new(UnreachableEngine), ThreadConfig::default());
        // a directory cannot be read as the credential file
        let app = router(ServerState::new(session, CredentialStore::new(dir.path())));

        let response = app.oneshot(get_wallet()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to retrieve wallet data.");
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_missing_prompt() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("unused"))]);
        let request = Request::builder()
            .method("POST")
            .uri("/api/prompt")
            .body(Body::empty())
            .unwrap();

        let response = test.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Prompt is required.");
        assert_eq!(test.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn client_disconnect_releases_the_thread() {
        let calls = Arc::new(AtomicUsize::new(0));
        let test = app_with(Arc::new(StallingEngine { calls: calls.clone() }), calls);

        let response = test.app.clone().oneshot(post_prompt(r#"{"prompt":"one"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut body = response.into_body();
        let frame = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(&frame[..], b"data: {\"chunk\":\"first\"}\n\n");

        // the open run still holds the thread
        let blocked = tokio::time::timeout(
            Duration::from_millis(100),
            test.app.clone().oneshot(post_prompt(r#"{"prompt":"two"}"#)),
        )
        .await;
        assert!(blocked.is_err());

        drop(body);

        let second = tokio::time::timeout(
            Duration::from_secs(1),
            test.app.clone().oneshot(post_prompt(r#"{"prompt":"three"}"#)),
        )
        .await
        .expect("thread was not released after disconnect")
        .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(test.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prompts_share_one_session() {
        let test = scripted(|| vec![Ok(AgentEvent::agent("ok"))]);

        for _ in 0..3 {
            let response = test.app.clone().oneshot(post_prompt(r#"{"prompt":"hi"}"#)).await.unwrap();
            assert_eq!(frames(&body_text(response).await), vec!["ok", "[DONE]"]);
        }
        assert_eq!(test.calls.load(Ordering::SeqCst), 3);
    }
}
