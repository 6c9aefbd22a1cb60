//! Query server binary
//!
//! Run with: cargo run -p corpus-rag --bin corpus-rag-server

use corpus_rag::{config::Config, server::ApiServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.gemini.embed_model);
    tracing::info!("  - Generation model: {}", config.gemini.generate_model);
    tracing::info!("  - Pinecone index: {}", config.pinecone.index_name);
    tracing::info!("  - Top-K: {}", config.retrieval.top_k);

    let server = ApiServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Ask:    POST http://{}/ask", server.address());
    println!("  Health: GET  http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
