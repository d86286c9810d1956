//! Mock backend for testing
//!
//! Returns a scripted reply, or a scripted failure, so assistant tests can
//! exercise both the remote path and its fallback without a network.

use async_trait::async_trait;

use super::RemoteBackend;
use crate::error::{Error, Result};

#[derive(Clone, Default)]
pub struct MockBackend {
    reply: String,
    fail: bool,
}

impl MockBackend {
    /// A mock that always answers with `reply`
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
        }
    }

    /// A mock whose generate calls always fail
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RemoteBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Assistant("mock backend configured to fail".into()));
        }
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
