use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{ConversationBuffer, DomainError};

/// What a raw input line asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Empty,
    Exit,
    Query(String),
}

impl UserInput {
    /// Trims the line; `exit` and `quit` match exactly and case-sensitively.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => UserInput::Empty,
            "exit" | "quit" => UserInput::Exit,
            query => UserInput::Query(query.to_string()),
        }
    }
}

/// Runs one user/assistant exchange at a time against a [`CompletionClient`].
///
/// An exchange is atomic: history changes only after the client returned a
/// reply, so a failed turn leaves the conversation exactly as it was.
pub struct ChatSessionUseCase {
    client: Arc<dyn CompletionClient>,
    conversation: ConversationBuffer,
}

impl ChatSessionUseCase {
    pub fn new(client: Arc<dyn CompletionClient>, conversation: ConversationBuffer) -> Self {
        Self {
            client,
            conversation,
        }
    }

    pub async fn execute(&mut self, user_text: &str) -> Result<String, DomainError> {
        let turns = self.conversation.snapshot_for_request(user_text);
        debug!(
            "Sending {} turns to {} ({} from history)",
            turns.len(),
            self.client.model_name(),
            self.conversation.len()
        );

        let start_time = Instant::now();
        let reply = match self.client.complete(&turns).await {
            Ok(reply) => reply,
            Err(e) => {
                debug!("Completion failed after {:?}: {}", start_time.elapsed(), e);
                return Err(e);
            }
        };
        debug!(
            "Completion received in {:?} ({} chars)",
            start_time.elapsed(),
            reply.len()
        );

        self.conversation.record_exchange(user_text, &reply);
        Ok(reply)
    }

    pub fn conversation(&self) -> &ConversationBuffer {
        &self.conversation
    }
}
