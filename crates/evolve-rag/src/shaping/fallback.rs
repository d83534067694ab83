//! Deterministic message formatting used when the formatter model fails

/// Local formatter: first sentences as bullets, or a truncated paragraph
#[derive(Debug, Clone, Copy)]
pub struct FallbackFormatter {
    max_sentences: usize,
    max_chars: usize,
}

impl Default for FallbackFormatter {
    fn default() -> Self {
        Self::new(4, 300)
    }
}

impl FallbackFormatter {
    pub fn new(max_sentences: usize, max_chars: usize) -> Self {
        Self {
            max_sentences,
            max_chars,
        }
    }

    /// Format `raw` without any external call; never fails
    pub fn format(&self, raw: &str) -> String {
        // Empty fragments are dropped before counting, so "A.. B." yields two sentences
        let sentences: Vec<&str> = raw
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(self.max_sentences)
            .collect();

        if sentences.len() > 1 {
            return format!("• {}", sentences.join("\n• "));
        }

        match raw.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}...", &raw[..cut]),
            None => raw.to_string(),
        }
    }
}
