//! Offline ingestion pipeline: PDFs → chunks → embeddings → vector index

mod chunker;
mod loader;
mod pipeline;

pub use chunker::TextChunker;
pub use loader::PdfLoader;
pub use pipeline::{IngestionPipeline, DIMENSION_PROBE};
