use super::User;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

}

/// Represents an incoming or outgoing message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    /// Usernames referenced with @ in the message text, without the @
    pub mentions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            mentions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(
        chat_id: impl Into<String>,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self::new(
            chat_id,
            Content::Command {
                name: name.into(),
                args,
            },
        )
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = mentions;
        self
    }

    /// Whether the mention list references the given username
    pub fn mentions_user(&self, username: &str) -> bool {
        self.mentions
            .iter()
            .any(|m| m.eq_ignore_ascii_case(username))
    }
}

/// Collect @username references from message text, without the @
pub fn extract_mentions(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|token| token.strip_prefix('@'))
        .map(|name| {
            name.trim_end_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_user_is_case_insensitive() {
        let msg = Message::from_text("1", "hey @Relay_Bot")
            .with_mentions(vec!["Relay_Bot".to_string()]);
        assert!(msg.mentions_user("relay_bot"));
        assert!(!msg.mentions_user("other_bot"));
    }

    #[test]
    fn extracts_mentions_without_the_at_sign() {
        let mentions = extract_mentions("hey @relay_bot and @Alice99, hello");
        assert_eq!(mentions, vec!["relay_bot", "Alice99"]);
    }

    #[test]
    fn ignores_tokens_that_are_not_mentions() {
        assert!(extract_mentions("plain text with email-like a@b").is_empty());
        assert!(extract_mentions("@").is_empty());
    }
}
