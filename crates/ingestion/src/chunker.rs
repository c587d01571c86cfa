//! Text chunking
//!
//! Splits cleaned document text into retrieval-sized chunks.

use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

/// Configuration for text chunking
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Minimum chunk size (smaller chunks are dropped)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            min_chunk_size: 100,
        }
    }
}

/// A chunk of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Index of this chunk in the document
    pub index: usize,
    /// The chunk content
    pub content: String,
}

/// Split text into chunks for embedding and retrieval.
///
/// Short fragments are dropped, but a non-empty document always yields at
/// least one chunk so small uploads stay answerable.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<TextChunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let splitter = TextSplitter::new(ChunkConfig::new(config.chunk_size));

    let mut chunks: Vec<TextChunk> = splitter
        .chunks(text)
        .filter(|chunk| chunk.len() >= config.min_chunk_size)
        .enumerate()
        .map(|(index, chunk)| TextChunk {
            index,
            content: chunk.to_string(),
        })
        .collect();

    if chunks.is_empty() {
        chunks.push(TextChunk {
            index: 0,
            content: text.trim().to_string(),
        });
    }

    debug!(
        input_len = text.len(),
        chunk_count = chunks.len(),
        chunk_size = config.chunk_size,
        "Text chunked"
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunking() {
        let text = "This is a test sentence. ".repeat(100);
        let config = ChunkingConfig {
            chunk_size: 200,
            min_chunk_size: 50,
        };

        let chunks = chunk_text(&text, &config);
        assert!(chunks.len() > 1);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.content.len() >= config.min_chunk_size);
            assert!(chunk.content.len() <= config.chunk_size);
        }
    }

    #[test]
    fn test_short_document_still_yields_a_chunk() {
        let chunks = chunk_text("Tiny document.", &ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Tiny document.");
    }

    #[test]
    fn test_empty_text() {
        let chunks = chunk_text("", &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }
}
