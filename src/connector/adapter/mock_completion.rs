use async_trait::async_trait;

use crate::application::CompletionClient;
use crate::domain::{DomainError, Role, Turn};

/// Offline [`CompletionClient`] that answers without touching the network.
///
/// Replies with a fixed text when one is set, otherwise echoes the last user
/// turn along with how many turns it was given.
pub struct MockCompletion {
    reply: Option<String>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self { reply: None }
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, turns: &[Turn]) -> Result<String, DomainError> {
        let last_user = turns
            .iter()
            .rev()
            .find(|t| t.role() == Role::User)
            .ok_or_else(|| DomainError::invalid_input("No user turn to answer"))?;

        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        Ok(format!(
            "Echo ({} turns): {}",
            turns.len(),
            last_user.content()
        ))
    }

    fn model_name(&self) -> &str {
        "mock-completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_last_user_turn() {
        let client = MockCompletion::new();
        let turns = vec![Turn::system("sys"), Turn::user("Salve")];

        let reply = client.complete(&turns).await.unwrap();

        assert_eq!(reply, "Echo (2 turns): Salve");
    }

    #[tokio::test]
    async fn test_mock_fixed_reply() {
        let client = MockCompletion::with_reply("Ave");
        let reply = client
            .complete(&[Turn::system("sys"), Turn::user("anything")])
            .await
            .unwrap();
        assert_eq!(reply, "Ave");
    }

    #[tokio::test]
    async fn test_mock_requires_user_turn() {
        let client = MockCompletion::new();
        let err = client.complete(&[Turn::system("sys")]).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
