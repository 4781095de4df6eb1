//! Best-effort text completion for hints and game summaries.

use std::sync::Arc;
use std::time::Duration;

use derive_new::new;
use tracing::{debug, instrument, warn};

use crate::llm_client::{LlmClient, LlmError};

/// Produces text for a prompt. May fail; callers decide how to degrade.
#[async_trait::async_trait]
pub trait TextCompletion: Send + Sync + std::fmt::Debug {
    /// Completes `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait::async_trait]
impl TextCompletion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate(prompt).await
    }
}

/// A completion service that is never reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCompletion;

#[async_trait::async_trait]
impl TextCompletion for OfflineCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::new("No text-completion service configured".to_string()))
    }
}

/// Fixed reply for every prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedCompletion {
    reply: String,
}

impl CannedCompletion {
    /// Always answers `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait::async_trait]
impl TextCompletion for CannedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.reply.clone())
    }
}

/// Wraps a completion service so that it never fails: errors, blank replies
/// and timeouts all turn into the caller's fallback text.
///
/// Every call to `inner` is bounded by `timeout`.
#[derive(Debug, Clone, new)]
pub struct FallbackCompletion {
    inner: Arc<dyn TextCompletion>,
    timeout: Duration,
}

impl FallbackCompletion {
    /// A wrapper that always falls back.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineCompletion), Duration::from_secs(1))
    }

    /// Completes `prompt`, or returns `fallback`.
    #[instrument(skip(self, prompt, fallback), fields(timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn complete_or(&self, prompt: &str, fallback: &str) -> String {
        match tokio::time::timeout(self.timeout, self.inner.complete(prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                debug!(length = text.len(), "Completion succeeded");
                text.trim().to_string()
            }
            Ok(Ok(_)) => {
                warn!("Completion was blank, using fallback");
                fallback.to_string()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Completion failed, using fallback");
                fallback.to_string()
            }
            Err(_) => {
                warn!("Completion timed out, using fallback");
                fallback.to_string()
            }
        }
    }
}
