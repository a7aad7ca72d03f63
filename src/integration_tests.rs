//! End-to-end tests against a local prediction endpoint
//!
//! Each test starts an in-process axum server on an ephemeral port that
//! behaves like the model service (or like a broken one), then drives the
//! orchestrator with a real `HttpBackend` pointed at it.

#[cfg(test)]
mod tests {
    use crate::backend::{HttpBackend, TranslationBackend};
    use crate::config::OrchestratorConfig;
    use crate::error::{ErrorKind, TranslateError};
    use crate::lookup::LookupTable;
    use crate::notification::{TRANSLATION_COMPLETE, TRANSLATION_FAILED};
    use crate::orchestrator::{Orchestrator, OrchestratorState, TranslationResult};
    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// How the fake endpoint answers
    #[derive(Clone)]
    enum Reply {
        Predict(&'static str),
        Status(StatusCode),
        Body(Value),
        Raw(&'static str),
        /// Echo the text back, after sleeping for the given number of ms if the text is "slow"
        EchoWithDelay(u64),
    }

    #[derive(Clone)]
    struct FakeEndpoint {
        reply: Reply,
        received: Arc<Mutex<Vec<Value>>>,
    }

    async fn handle(
        State(endpoint): State<FakeEndpoint>,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        endpoint.received.lock().unwrap().push(body.clone());
        match endpoint.reply {
            Reply::Predict(text) => (StatusCode::OK, json!({ "predictions": text }).to_string()),
            Reply::Status(status) => (status, "model unavailable".to_string()),
            Reply::Body(value) => (StatusCode::OK, value.to_string()),
            Reply::Raw(raw) => (StatusCode::OK, raw.to_string()),
            Reply::EchoWithDelay(ms) => {
                let text = body["text"].as_str().unwrap_or_default().to_string();
                if text == "slow" {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                }
                (StatusCode::OK, json!({ "predictions": text }).to_string())
            }
        }
    }

    /// Start a fake endpoint, returning its URL and the log of request bodies
    async fn serve(reply: Reply) -> (String, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeEndpoint {
            reply,
            received: Arc::clone(&received),
        };
        let app = Router::new()
            .route("/project/bulk-predict", post(handle))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/project/bulk-predict", addr), received)
    }

    fn config(endpoint: String) -> OrchestratorConfig {
        OrchestratorConfig {
            endpoint,
            thinking_delay: Duration::from_millis(20),
            request_timeout: Duration::from_secs(5),
            notification_duration: Duration::from_secs(6),
        }
    }

    fn orchestrator(endpoint: String, table: LookupTable) -> Orchestrator {
        Orchestrator::from_config(table, &config(endpoint)).unwrap()
    }

    fn table() -> LookupTable {
        LookupTable::from_pairs([("AB", "hello")]).unwrap()
    }

    // ============================================================================
    // Table hits never reach the endpoint
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_table_hit() {
        let (url, received) = serve(Reply::Predict("unused")).await;
        let orchestrator = orchestrator(url, table());

        orchestrator.submit("AB").await.unwrap();

        let view = orchestrator.view();
        assert_eq!(
            view.state,
            OrchestratorState::Settled(TranslationResult::Hit("hello".to_string()))
        );
        assert_eq!(view.output_text, "hello");
        assert_eq!(view.notification.message(), Some(TRANSLATION_COMPLETE));
        assert!(received.lock().unwrap().is_empty());
    }

    // ============================================================================
    // Misses post exactly one {text} payload
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_remote_success() {
        let (url, received) = serve(Reply::Predict("world")).await;
        let orchestrator = orchestrator(url, table());

        orchestrator.submit("ZZ").await.unwrap();

        let view = orchestrator.view();
        assert_eq!(
            view.result(),
            Some(&TranslationResult::RemoteSuccess("world".to_string()))
        );
        assert_eq!(view.output_text, "world");
        assert_eq!(view.notification.message(), Some(TRANSLATION_COMPLETE));
        assert_eq!(*received.lock().unwrap(), vec![json!({ "text": "ZZ" })]);
    }

    #[tokio::test]
    async fn test_e2e_server_error() {
        let (url, received) = serve(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;
        let orchestrator = orchestrator(url, table());

        orchestrator.submit("ZZ").await.unwrap();

        let view = orchestrator.view();
        assert_eq!(
            view.result(),
            Some(&TranslationResult::RemoteFailure(ErrorKind::Upstream))
        );
        assert_eq!(view.output_text, "");
        assert_eq!(view.notification.message(), Some(TRANSLATION_FAILED));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_e2e_missing_predictions() {
        let (url, _) = serve(Reply::Body(json!({}))).await;
        let orchestrator = orchestrator(url, table());

        orchestrator.submit("ZZ").await.unwrap();

        let view = orchestrator.view();
        assert_eq!(
            view.result(),
            Some(&TranslationResult::RemoteFailure(ErrorKind::Protocol))
        );
        assert_eq!(view.output_text, "");
        assert_eq!(view.notification.message(), Some(TRANSLATION_FAILED));
    }

    #[tokio::test]
    async fn test_e2e_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let orchestrator = orchestrator(format!("http://{}/project/bulk-predict", addr), table());

        orchestrator.submit("unknown").await.unwrap();

        let view = orchestrator.view();
        assert_eq!(
            view.result(),
            Some(&TranslationResult::RemoteFailure(ErrorKind::Network))
        );
        assert_eq!(view.output_text, "");
        assert_eq!(view.notification.message(), Some(TRANSLATION_FAILED));
    }

    #[tokio::test]
    async fn test_e2e_supersession_over_http() {
        let (url, received) = serve(Reply::EchoWithDelay(300)).await;
        let orchestrator = orchestrator(url, table());

        let first = orchestrator.submit("slow");
        let second = orchestrator.submit("fast");

        second.await.unwrap();
        assert_eq!(orchestrator.view().output_text, "fast");

        first.await.unwrap();
        assert_eq!(orchestrator.view().output_text, "fast");
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    // ============================================================================
    // Backend classification, without the orchestrator
    // ============================================================================

    #[tokio::test]
    async fn test_backend_not_json() {
        let (url, _) = serve(Reply::Raw("<html>oops</html>")).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            backend.predict("ZZ").await,
            Err(TranslateError::ProtocolError(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_upstream_error_keeps_status() {
        let (url, _) = serve(Reply::Status(StatusCode::SERVICE_UNAVAILABLE)).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        match backend.predict("ZZ").await {
            Err(TranslateError::UpstreamError { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model unavailable");
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_client_timeout() {
        let (url, _) = serve(Reply::EchoWithDelay(2_000)).await;
        let backend = HttpBackend::new(url, Duration::from_millis(100)).unwrap();

        assert!(matches!(
            backend.predict("slow").await,
            Err(TranslateError::NetworkError(_))
        ));
    }
}
