//! Pluggable remote generative-assistant backends
//!
//! The assistant can defer a message to a remote text model before falling
//! back to its deterministic pipeline. This module keeps that collaborator
//! behind a small backend-agnostic interface:
//!
//! - `RemoteBackend` trait: the generate operation every backend implements
//! - `RemoteClient` enum: concrete wrapper providing Clone + static dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! Remote calls are bounded by a short timeout and every failure is
//! surfaced as an `Err` for the caller to absorb; a backend must never
//! hang or panic the message pipeline.

mod gemini;
mod mock;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use parsing::{extract_command, RemoteCommand};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for remote text-generation backends
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Generate a free-text response for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete remote client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum RemoteClient {
    /// Google Gemini over HTTP
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl RemoteClient {
    /// Create a Gemini client from an API key
    pub fn gemini(api_key: &str) -> Self {
        RemoteClient::Gemini(GeminiBackend::new(api_key))
    }

    /// Create a client from the GEMINI_API_KEY environment variable
    pub fn from_env() -> Option<Self> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|key| RemoteClient::gemini(&key))
    }

    /// Create a mock backend that always answers with `reply`
    pub fn mock(reply: &str) -> Self {
        RemoteClient::Mock(MockBackend::new(reply))
    }

    /// Create a mock backend whose calls always fail
    pub fn failing_mock() -> Self {
        RemoteClient::Mock(MockBackend::failing())
    }
}

#[async_trait]
impl RemoteBackend for RemoteClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            RemoteClient::Gemini(b) => b.generate(prompt).await,
            RemoteClient::Mock(b) => b.generate(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            RemoteClient::Gemini(b) => b.model(),
            RemoteClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            RemoteClient::Gemini(b) => b.host(),
            RemoteClient::Mock(b) => b.host(),
        }
    }
}
