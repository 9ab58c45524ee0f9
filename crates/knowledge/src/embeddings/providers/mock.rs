//! Deterministic mock embedding provider.

use crate::embeddings::provider::EmbeddingProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use tutor_core::AppResult;

/// Mock provider for tests and offline development.
///
/// Hashes character trigrams and whole words into a fixed number of
/// dimensions, then unit-normalizes. Not semantically meaningful, but
/// deterministic and content-dependent: identical texts embed identically
/// and different texts almost always differ. A call counter lets tests
/// assert which paths reach the provider.
pub struct MockEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a new mock provider with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_batch` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        for word in lower.split_whitespace().filter(|w| w.len() > 2) {
            let chars: Vec<char> = word.chars().collect();

            // Trigram features
            for window in chars.windows(3) {
                let hash = window
                    .iter()
                    .fold(0u64, |acc, &c| acc.wrapping_mul(37).wrapping_add(c as u64));
                embedding[(hash as usize) % self.dimensions] += 1.0;
            }

            // Whole-word feature
            let hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            embedding[(hash as usize) % self.dimensions] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
