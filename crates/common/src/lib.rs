//! DocSage Common Library
//!
//! Shared code for the DocSage service:
//! - Per-session document and conversation state
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod session;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use session::{Session, SessionStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and the health endpoint
pub const SERVICE_NAME: &str = "DocSage Assistant";

/// Session identifier used when the client sends no `X-Session-ID` header
pub const DEFAULT_SESSION_ID: &str = "default";
