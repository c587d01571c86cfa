//! Configuration management for DocSage
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{env}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upload limits and validation
    #[serde(default)]
    pub upload: UploadConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Engine tuning knobs
    #[serde(default)]
    pub engine: EngineConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Minimum extracted text length (characters) to accept a document
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: local, remote
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key for the remote embedding service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use (remote provider only)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries
    #[serde(default = "default_embedding_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Maximum summary length in words
    #[serde(default = "default_summary_max_words")]
    pub summary_max_words: usize,

    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Minimum chunk size (smaller chunks are dropped)
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Chunks retrieved per question
    #[serde(default = "default_qa_top_chunks")]
    pub qa_top_chunks: usize,

    /// Minimum similarity for a chunk to count as relevant
    #[serde(default = "default_qa_min_score")]
    pub qa_min_score: f32,

    /// Questions per challenge set
    #[serde(default = "default_challenge_questions")]
    pub challenge_questions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level filter (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Prometheus scrape port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_shutdown_timeout() -> u64 {
    30
}
fn default_max_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_min_text_chars() -> usize {
    50
}
fn default_embedding_provider() -> String {
    "local".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_dimension() -> usize {
    256
}
fn default_embedding_timeout() -> u64 {
    30
}
fn default_embedding_retries() -> u32 {
    3
}
fn default_summary_max_words() -> usize {
    150
}
fn default_chunk_size() -> usize {
    1000
}
fn default_min_chunk_size() -> usize {
    100
}
fn default_qa_top_chunks() -> usize {
    3
}
fn default_qa_min_score() -> f32 {
    0.3
}
fn default_challenge_questions() -> usize {
    3
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_json_logging() -> bool {
    false
}
fn default_metrics_port() -> u16 {
    0
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            api_base: None,
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout(),
            max_retries: default_embedding_retries(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            summary_max_words: default_summary_max_words(),
            chunk_size: default_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
            qa_top_chunks: default_qa_top_chunks(),
            qa_min_score: default_qa_min_score(),
            challenge_questions: default_challenge_questions(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            embedding: EmbeddingConfig::default(),
            engine: EngineConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upload.max_bytes, 16 * 1024 * 1024);
        assert_eq!(config.engine.summary_max_words, 150);
        assert_eq!(config.embedding.provider, "local");
    }

    #[test]
    fn test_shutdown_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }
}
