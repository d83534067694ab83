//! Sentence-aware text chunking with overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// A chunk of source text and its position in the chunk sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub content: String,
}

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size: 1,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap).with_min_size(config.min_chunk_size)
    }

    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Split `text` into chunks of at most `chunk_size` characters
    ///
    /// Chunks break on sentence boundaries. Sentences that cannot fit next to
    /// the carried overlap are split on word boundaries, and words that are
    /// still too long are cut into fixed character windows. Each new chunk
    /// starts with up to `overlap` characters from the end of the previous one.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        // Length of the overlap prefix carried into `current`
        let mut carried = 0usize;
        let piece_limit = self.piece_limit();

        let pieces = text
            .split_sentence_bounds()
            .flat_map(|sentence| split_oversized(sentence, piece_limit));

        for piece in pieces {
            let piece_len = piece.chars().count();
            let current_len = current.chars().count();

            if current_len > carried && current_len + piece_len > self.chunk_size {
                self.push_chunk(&mut chunks, &current);
                current = self.overlap_text(&current);
                carried = current.chars().count();
            }

            current.push_str(piece);
        }

        if current.chars().count() > carried || chunks.is_empty() {
            self.push_chunk(&mut chunks, &current);
        }

        chunks
    }

    /// Largest piece that still fits after a full overlap prefix
    fn piece_limit(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap).max(1)
    }

    fn push_chunk(&self, chunks: &mut Vec<TextChunk>, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.min_size {
            return;
        }
        chunks.push(TextChunk {
            index: chunks.len(),
            content: trimmed.to_string(),
        });
    }

    /// Get overlap text from the end of a chunk
    fn overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let char_count = text.chars().count();
        if char_count <= self.overlap {
            return text.to_string();
        }

        let start = text
            .char_indices()
            .nth(char_count - self.overlap)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let tail = &text[start..];

        // Prefer starting at a sentence, then a word
        if let Some(pos) = tail.find(". ").filter(|p| p + 2 < tail.trim_end().len()) {
            return tail[pos + 2..].to_string();
        }
        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}

/// Split `sentence` into slices of at most `limit` characters
///
/// Packs whole words greedily; a word longer than `limit` is cut into
/// character windows.
fn split_oversized(sentence: &str, limit: usize) -> Vec<&str> {
    if sentence.chars().count() <= limit {
        return vec![sentence];
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut len = 0usize;

    for (idx, word) in sentence.split_word_bound_indices() {
        let word_len = word.chars().count();

        if len > 0 && len + word_len > limit {
            pieces.push(&sentence[start..idx]);
            start = idx;
            len = 0;
        }

        if word_len > limit {
            let mut rest = idx;
            let mut remaining = word_len;
            while remaining > limit {
                let cut = sentence[rest..]
                    .char_indices()
                    .nth(limit)
                    .map(|(i, _)| rest + i)
                    .unwrap_or(sentence.len());
                pieces.push(&sentence[rest..cut]);
                rest = cut;
                remaining -= limit;
            }
            start = rest;
            len = remaining;
        } else {
            len += word_len;
        }
    }

    if start < sentence.len() {
        pieces.push(&sentence[start..]);
    }

    pieces
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}
