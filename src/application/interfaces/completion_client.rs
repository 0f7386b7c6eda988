use async_trait::async_trait;

use crate::domain::{DomainError, Turn};

/// Sends an ordered conversation to a chat-completion backend and returns the
/// single reply.
///
/// Implementors own transport, serialization and vendor-specific API details.
/// A call performs at most one request and never retries.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// `turns` must hold at least the system turn and the live user turn.
    async fn complete(&self, turns: &[Turn]) -> Result<String, DomainError>;

    /// Get the deployment or model name answering the requests
    fn model_name(&self) -> &str;
}
