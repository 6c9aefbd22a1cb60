//! Offline ingestion binary
//!
//! Run with: cargo run -p corpus-rag --bin corpus-rag-ingest -- \
//!     --pdf sdk_faq.pdf --folder pdf_docs

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use corpus_rag::config::Config;
use corpus_rag::ingestion::IngestionPipeline;
use corpus_rag::providers::{GeminiEmbedder, PineconeIndex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Index a PDF corpus into Pinecone
#[derive(Debug, Parser)]
#[command(name = "corpus-rag-ingest")]
struct Args {
    /// PDF files to ingest in addition to the folder
    #[arg(long = "pdf", value_name = "FILE")]
    pdfs: Vec<PathBuf>,

    /// Folder scanned (non-recursively) for PDFs
    #[arg(long, value_name = "DIR")]
    folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let folder = args
        .folder
        .clone()
        .unwrap_or_else(|| config.ingestion.pdf_folder.clone());

    tracing::info!("Ingesting {} manual PDFs + folder {}", args.pdfs.len(), folder.display());

    let embedder = Arc::new(GeminiEmbedder::new(&config.gemini)?);
    let index = Arc::new(PineconeIndex::connect(&config.pinecone).await?);
    let pipeline = IngestionPipeline::new(embedder, index, &config.chunking, &config.ingestion);

    let report = pipeline.ingest(&args.pdfs, Some(&folder)).await?;

    for failure in &report.failures {
        tracing::warn!(
            "Failed chunk {} of {}: {}",
            failure.sequence,
            failure.source,
            failure.reason
        );
    }

    println!(
        "\nIngestion finished: {} documents, {}/{} chunks indexed",
        report.documents, report.chunks_indexed, report.chunks_total
    );

    if !report.is_complete() {
        std::process::exit(1);
    }

    Ok(())
}
