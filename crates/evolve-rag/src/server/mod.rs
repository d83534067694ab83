//! HTTP server for the query service

pub mod routes;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server, initializing all providers
    pub async fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = routes::api_routes()
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::INSUFFICIENT_INFORMATION;
    use crate::testing::{data_doc, test_config, FakeEmbedder, FakeLlm, FakeVectorStore};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server(store: FakeVectorStore, llm: FakeLlm) -> RagServer {
        let state = AppState::from_parts(
            test_config(),
            Arc::new(FakeEmbedder::default()),
            Arc::new(store),
            Arc::new(llm),
        );
        RagServer::from_state(state)
    }

    fn both_collections(data: FakeVectorStore) -> FakeVectorStore {
        data.with_collection("context_collection", vec![])
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_query(body: &'static str) -> Request<Body> {
        Request::post("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = server(FakeVectorStore::default(), FakeLlm::default()).router();
        let (status, body) = send(router, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "message": "RAG API is running"}));
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let router = server(FakeVectorStore::default(), FakeLlm::default()).router();
        let (status, body) = send(router, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "RAG Query API");
        assert!(body["endpoints"]["/query"].is_string());
        assert!(body["endpoints"]["/health"].is_string());
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        for raw in ["{}", "", "[1]", r#"{"query": 5}"#, r#"{"query": "   "}"#] {
            let router = server(FakeVectorStore::default(), FakeLlm::default()).router();
            let (status, body) = send(router, post_query(raw)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
            assert_eq!(body, json!({"error": "Query parameter is required"}));
        }
    }

    #[tokio::test]
    async fn test_low_confidence_response() {
        let store = both_collections(
            FakeVectorStore::default()
                .with_collection("my_json_collection", vec![data_doc("unrelated", 0.1)]),
        );
        let router = server(store, FakeLlm::default()).router();

        let (status, body) =
            send(router, post_query(r#"{"query": "What is the refund policy?"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"response": [{"message": INSUFFICIENT_INFORMATION}]})
        );
    }

    #[tokio::test]
    async fn test_answered_query_block_order() {
        let store = both_collections(
            FakeVectorStore::default()
                .with_collection("my_json_collection", vec![data_doc("Org chart", 0.9)]),
        );
        let llm = FakeLlm::new([Ok("The CEO leads."), Ok("```mermaid\nA-->B\n```"), Ok("• CEO leads")]);
        let router = server(store, llm).router();

        let (status, body) = send(
            router,
            post_query(r#"{"query": "Show me the organization flowchart"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let blocks = body["response"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], json!({"message": "• CEO leads"}));
        assert_eq!(blocks[1], json!({"mermaid": "A-->B"}));
        assert_eq!(blocks[2]["metadata"]["total_sources"], 1);
        assert_eq!(
            blocks[2]["metadata"]["source_documents"][0],
            json!({"title": "Company Handbook", "source": "handbook.txt", "pages": [1]})
        );
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_internal_error() {
        let store = both_collections(
            FakeVectorStore::default()
                .with_collection("my_json_collection", vec![data_doc("doc", 0.9)]),
        );
        let router = server(store, FakeLlm::new([Err("deployment not found")])).router();

        let (status, body) = send(router, post_query(r#"{"query": "q"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An error occurred: LLM error: deployment not found");
    }

    #[tokio::test]
    async fn test_ready_requires_both_collections() {
        let ready = server(
            both_collections(
                FakeVectorStore::default().with_collection("my_json_collection", vec![]),
            ),
            FakeLlm::default(),
        );
        let (status, body) = send(ready.router(), get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ready"}));

        let missing = server(
            FakeVectorStore::default().with_collection("my_json_collection", vec![]),
            FakeLlm::default(),
        );
        let (status, body) = send(missing.router(), get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"status": "unavailable"}));
    }

    #[test]
    fn test_address() {
        let server = server(FakeVectorStore::default(), FakeLlm::default());
        assert_eq!(server.address(), "0.0.0.0:5000");
    }
}
