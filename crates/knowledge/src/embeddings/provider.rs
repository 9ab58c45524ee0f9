//! Embedding provider trait and factory.

use std::sync::Arc;
use tutor_core::config::EmbeddingSettings;
use tutor_core::{AppError, AppResult};

/// Trait for embedding providers.
///
/// Converts text into fixed-length float vectors. The store and ranker only
/// assume that all vectors produced by one provider share a dimensionality.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Embedding vector dimension
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in one call.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_embedding_provider(
    settings: &EmbeddingSettings,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config(
                    "OpenAI embedding provider requires OPENAI_API_KEY to be set".to_string(),
                )
            })?;
            let provider = super::providers::OpenAiEmbedder::new(
                &settings.endpoint,
                api_key,
                &settings.model,
                settings.dimensions,
            )?;
            Ok(Arc::new(provider))
        }

        "mock" => Ok(Arc::new(super::providers::MockEmbedder::new(
            settings.dimensions,
        ))),

        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, mock",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_mock() {
        let settings = EmbeddingSettings {
            provider: "mock".to_string(),
            dimensions: 64,
            ..EmbeddingSettings::default()
        };
        let provider = create_embedding_provider(&settings, None).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.dimensions(), 64);
    }

    #[test]
    fn test_factory_openai_requires_key() {
        let settings = EmbeddingSettings::default();
        match create_embedding_provider(&settings, None) {
            Err(AppError::Config(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_factory_unknown_provider() {
        let settings = EmbeddingSettings {
            provider: "quantum".to_string(),
            ..EmbeddingSettings::default()
        };
        assert!(create_embedding_provider(&settings, None).is_err());
    }
}
