//! Configuration management for the math tutor backend.
//!
//! Configuration is assembled once at startup into an explicit [`AppConfig`]
//! and passed to every component that needs it; nothing reads ambient
//! process state after boot. Sources are merged in order:
//! defaults ← optional `tutor.yaml` ← environment variables ← CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// Shared read-only by the HTTP server and the ingestion job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,

    /// Path to the SQLite database holding chunk embeddings
    pub database: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Optional catalog file overriding the built-in definitions/syllabus
    pub catalog_file: Option<PathBuf>,

    /// OpenAI API key (required for any endpoint that calls the remote API)
    pub api_key: Option<String>,

    /// Chat completion settings
    pub chat: ChatSettings,

    /// Embedding settings
    pub embedding: EmbeddingSettings,

    /// Retrieval settings
    pub retrieval: RetrievalSettings,

    /// Ingestion settings
    pub ingest: IngestSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Disable colored output
    pub no_color: bool,
}

/// Settings for the remote chat-completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Chat model identifier
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Settings for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider identifier ("openai" or "mock")
    pub provider: String,

    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Embedding model identifier
    pub model: String,

    /// Embedding vector dimension produced by the model
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            endpoint: "https://api.openai.com".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
        }
    }
}

/// Settings for context retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Settings for the one-shot ingestion job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Chunk window size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Config file structure (`tutor.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    database: Option<String>,
    catalog: Option<String>,
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    ingest: Option<IngestSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LlmSection {
    endpoint: Option<String>,
    chat_model: Option<String>,
    embedding_provider: Option<String>,
    embedding_model: Option<String>,
    embedding_dim: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RetrievalSection {
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IngestSection {
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            database: PathBuf::from("embeddings.db"),
            config_file: None,
            catalog_file: None,
            api_key: None,
            chat: ChatSettings::default(),
            embedding: EmbeddingSettings::default(),
            retrieval: RetrievalSettings::default(),
            ingest: IngestSettings::default(),
            log_level: None,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `TUTOR_CONFIG`: path to `tutor.yaml`
    /// - `TUTOR_BIND`: bind address for the HTTP server
    /// - `TUTOR_DATABASE`: path to the embeddings database
    /// - `TUTOR_CATALOG`: path to a YAML catalog file
    /// - `OPENAI_API_KEY`: API key for the remote LLM service
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file;
        if config.config_file.is_none() {
            if let Ok(path) = std::env::var("TUTOR_CONFIG") {
                config.config_file = Some(PathBuf::from(path));
            }
        }

        // Load from YAML config file if present
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("tutor.yaml"));
        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(bind) = std::env::var("TUTOR_BIND") {
            config.bind_addr = bind;
        }
        if let Ok(db) = std::env::var("TUTOR_DATABASE") {
            config.database = PathBuf::from(db);
        }
        if let Ok(catalog) = std::env::var("TUTOR_CATALOG") {
            config.catalog_file = Some(PathBuf::from(catalog));
        }

        config.api_key = std::env::var("OPENAI_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Apply CLI flag overrides on top of the loaded configuration.
    pub fn with_overrides(
        mut self,
        bind_addr: Option<String>,
        database: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(bind) = bind_addr {
            self.bind_addr = bind;
        }
        if let Some(db) = database {
            self.database = db;
        }
        if let Some(level) = log_level {
            self.log_level = Some(level);
        }
        if verbose {
            self.log_level = Some("debug".to_string());
        }
        if no_color {
            self.no_color = true;
        }
        self
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(server) = file.server {
            if let Some(bind) = server.bind {
                self.bind_addr = bind;
            }
        }
        if let Some(db) = file.database {
            self.database = PathBuf::from(db);
        }
        if let Some(catalog) = file.catalog {
            self.catalog_file = Some(PathBuf::from(catalog));
        }
        if let Some(llm) = file.llm {
            if let Some(endpoint) = llm.endpoint {
                self.chat.endpoint = endpoint.clone();
                self.embedding.endpoint = endpoint;
            }
            if let Some(model) = llm.chat_model {
                self.chat.model = model;
            }
            if let Some(provider) = llm.embedding_provider {
                self.embedding.provider = provider;
            }
            if let Some(model) = llm.embedding_model {
                self.embedding.model = model;
            }
            if let Some(dim) = llm.embedding_dim {
                self.embedding.dimensions = dim;
            }
        }
        if let Some(retrieval) = file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                self.retrieval.top_k = top_k;
            }
        }
        if let Some(ingest) = file.ingest {
            if let Some(size) = ingest.chunk_size {
                self.ingest.chunk_size = size;
            }
            if let Some(overlap) = ingest.chunk_overlap {
                self.ingest.chunk_overlap = overlap;
            }
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Return the API key, failing fast when it is missing.
    ///
    /// Called once at startup by anything that will talk to the remote API,
    /// so a missing credential never surfaces mid-request.
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "Missing OPENAI_API_KEY. Set it in the environment before starting.".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.database, PathBuf::from("embeddings.db"));
        assert_eq!(config.chat.model, "gpt-3.5-turbo");
        assert_eq!(config.embedding.model, "text-embedding-ada-002");
        assert_eq!(config.embedding.dimensions, 1536);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.ingest.chunk_size, 1000);
        assert_eq!(config.ingest.chunk_overlap, 200);
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig::default();
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_require_api_key_present() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  bind: "127.0.0.1:8080"
database: "test.db"
llm:
  chat_model: "gpt-4o-mini"
  embedding_dim: 384
retrieval:
  top_k: 5
ingest:
  chunk_size: 400
  chunk_overlap: 50
logging:
  level: "debug"
  color: false
"#
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(&file.path().to_path_buf()).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.database, PathBuf::from("test.db"));
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.ingest.chunk_size, 400);
        assert_eq!(config.ingest.chunk_overlap, 50);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.no_color);
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default().with_overrides(
            Some("0.0.0.0:9000".to_string()),
            Some(PathBuf::from("other.db")),
            None,
            true,
            false,
        );
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database, PathBuf::from("other.db"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }
}
