//! Fixed-window text chunking with overlap
//!
//! A sliding window over characters, no sentence awareness. For a text of
//! char length L >= window W with overlap O, the chunk count is
//! ceil((L - O) / (W - O)) and consecutive chunks share exactly O chars.

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Sliding-window chunker with configurable size and overlap
pub struct TextChunker {
    /// Window size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split a document into ordered chunks.
    ///
    /// An empty document yields no chunks; a document shorter than the
    /// window yields exactly one.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        self.split(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, doc, i as u32))
            .collect()
    }

    /// Split text into overlapping windows, slicing on char boundaries.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offset of each char start; windows index into this.
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total = offsets.len();
        if total == 0 {
            return Vec::new();
        }

        // Stride stays positive even when overlap >= chunk_size.
        let stride = self.chunk_size.saturating_sub(self.overlap).max(1);

        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let end = start + self.chunk_size;
            if end >= total {
                windows.push(text[offsets[start]..].to_string());
                break;
            }
            windows.push(text[offsets[start]..offsets[end]].to_string());
            start += stride;
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker() -> TextChunker {
        TextChunker::new(1000, 200)
    }

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= size {
            1
        } else {
            (len - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn test_empty_document_yields_no_chunks() {
        assert!(chunker().split("").is_empty());
    }

    #[test]
    fn test_short_document_yields_one_chunk() {
        let text = "a".repeat(999);
        let windows = chunker().split(&text);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0], text);
    }

    #[test]
    fn test_chunk_count_formula() {
        for len in [1, 500, 1000, 1001, 1800, 1801, 2600, 4200, 10_000] {
            let text = "x".repeat(len);
            let windows = chunker().split(&text);
            assert_eq!(
                windows.len(),
                expected_count(len, 1000, 200),
                "wrong count for length {}",
                len
            );
        }
    }

    #[test]
    fn test_consecutive_chunks_share_exact_overlap() {
        // Distinct chars so overlapping ranges can only match positionally.
        let text: String = (0..2600u32)
            .map(|i| char::from_u32('぀' as u32 + (i % 5000)).unwrap())
            .collect();
        let windows = chunker().split(&text);

        for pair in windows.windows(2) {
            let tail: String = pair[0].chars().rev().take(200).collect::<Vec<_>>()
                .into_iter().rev().collect();
            let head: String = pair[1].chars().take(200).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_overlap_dedup_reconstructs_original() {
        let text: String = (0..4321u32)
            .map(|i| char::from_u32('A' as u32 + (i % 26)).unwrap())
            .collect();
        let windows = chunker().split(&text);

        let mut rebuilt: String = windows[0].clone();
        for window in &windows[1..] {
            rebuilt.extend(window.chars().skip(200));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_multibyte_text_slices_on_char_boundaries() {
        let text = "é".repeat(1500);
        let windows = chunker().split(&text);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].chars().count(), 1000);
        assert_eq!(windows[1].chars().count(), 700);
    }

    #[test]
    fn test_chunks_carry_sequence_and_source() {
        let doc = Document::new("faq.pdf", "y".repeat(1801), Some(3));
        let chunks = chunker().chunk_document(&doc);

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i as u32);
            assert_eq!(chunk.source, "faq.pdf");
            assert_eq!(chunk.page_count, Some(3));
        }
        assert_eq!(chunks[2].text.chars().count(), 201);
    }
}
