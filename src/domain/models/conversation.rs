use super::Turn;

/// Bounded chat history anchored by a fixed system turn.
///
/// The system turn is never evicted. `history` only ever holds complete
/// user/assistant pairs and is kept at or under `history_length` entries after
/// every recorded exchange; the oldest pair goes first.
#[derive(Debug, Clone)]
pub struct ConversationBuffer {
    system_turn: Turn,
    history: Vec<Turn>,
    history_length: usize,
}

impl ConversationBuffer {
    pub fn new(system_prompt: impl Into<String>, history_length: usize) -> Self {
        Self {
            system_turn: Turn::system(system_prompt),
            history: Vec::new(),
            history_length,
        }
    }

    /// Build the user turn for the current request without touching history.
    pub fn append_user(&self, text: &str) -> Turn {
        Turn::user(text)
    }

    /// `[system] ++ history ++ [user]`, in that order.
    pub fn snapshot_for_request(&self, user_text: &str) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.history.len() + 2);
        turns.push(self.system_turn.clone());
        turns.extend(self.history.iter().cloned());
        turns.push(self.append_user(user_text));
        turns
    }

    /// Store a completed exchange, then evict whole pairs until within bound.
    pub fn record_exchange(&mut self, user_text: &str, assistant_text: &str) {
        self.history.push(Turn::user(user_text));
        self.history.push(Turn::assistant(assistant_text));

        while self.history.len() > self.history_length {
            self.history.drain(..2);
        }
    }

    pub fn system_turn(&self) -> &Turn {
        &self.system_turn
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
