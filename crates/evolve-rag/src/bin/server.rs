//! RAG query server binary
//!
//! Run with: cargo run -p evolve-rag --bin evolve-rag-server

use evolve_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evolve_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load(None)?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Qdrant: {}", config.qdrant.url);
    tracing::info!("  - Data collection: {}", config.qdrant.data_collection);
    tracing::info!("  - Context collection: {}", config.qdrant.context_collection);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM deployment: {}", config.llm.deployment);
    tracing::info!("  - Confidence threshold: {}", config.pipeline.confidence_threshold);

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /query  - Ask questions");
    println!("  GET  /health - Liveness");
    println!("  GET  /ready  - Vector store readiness");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
