//! PDF corpus loading
//!
//! Reads a manual list of files plus one folder (non-recursive), keeping
//! only `.pdf`-suffixed entries. Text extraction is delegated to
//! `pdf-extract`; `lopdf` supplies the page count when the file parses.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Document;

/// PDF document loader
pub struct PdfLoader;

impl PdfLoader {
    /// Whether a path carries the `.pdf` suffix (case-insensitive)
    pub fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    /// Load a single PDF into a document
    pub fn load_file(path: &Path) -> Result<Document> {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let data = fs::read(path)
            .map_err(|e| Error::loader(source.clone(), format!("read failed: {}", e)))?;

        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| Error::loader(source.clone(), format!("text extraction failed: {}", e)))?;

        let pages = lopdf::Document::load_mem(&data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok(Document::new(source, text, pages))
    }

    /// Load the corpus: every manual path plus every PDF in `folder`.
    ///
    /// Non-PDF manual entries are skipped; a missing folder contributes
    /// zero documents rather than an error.
    pub fn load_corpus(manual: &[PathBuf], folder: Option<&Path>) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for path in manual {
            if !Self::is_pdf(path) {
                tracing::warn!("Skipping non-PDF entry {}", path.display());
                continue;
            }
            documents.push(Self::load_file(path)?);
        }

        if let Some(folder) = folder {
            if folder.is_dir() {
                let mut entries: Vec<PathBuf> = fs::read_dir(folder)
                    .map_err(|e| {
                        Error::loader(folder.display().to_string(), format!("read failed: {}", e))
                    })?
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file() && Self::is_pdf(path))
                    .collect();
                entries.sort();

                for path in entries {
                    documents.push(Self::load_file(&path)?);
                }
            } else {
                tracing::warn!(
                    "PDF folder {} does not exist, loading manual list only",
                    folder.display()
                );
            }
        }

        tracing::info!("Loaded {} documents", documents.len());

        Ok(documents)
    }
}
