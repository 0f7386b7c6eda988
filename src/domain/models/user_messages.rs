use serde::{Deserialize, Serialize};

/// User-facing strings shown by the chat loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessages {
    pub greeting: String,
    pub prompt: String,
    pub empty_input: String,
    pub exit: String,
}

impl Default for UserMessages {
    fn default() -> Self {
        Self {
            greeting: "Salve, seeker of wisdom. What would you like to know about our glorious Roman and Byzantine leaders?".to_string(),
            prompt: "Quaeris quid (What is your question)?".to_string(),
            empty_input: "Me paenitet, non audivi te. (I'm sorry, I didn't hear you)".to_string(),
            exit: "Vale et gratias tibi ago for using Magnus Liber Imperatorum.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_camel_case_keys() {
        let json = r#"{"greeting":"hi","prompt":"?","emptyInput":"say something","exit":"bye"}"#;
        let messages: UserMessages = serde_json::from_str(json).unwrap();
        assert_eq!(messages.empty_input, "say something");
        assert_eq!(messages.exit, "bye");
    }
}
