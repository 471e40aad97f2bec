//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming text into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn is_command(&self, text: &str) -> bool {
        text.starts_with('/') || text.starts_with(&self.command_prefix)
    }

    /// Parse a text message
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
    ) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        if self.is_command(&text) {
            return self.parse_command(chat_id, text, sender);
        }

        Message::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    fn parse_command(&self, chat_id: String, text: String, sender: Option<User>) -> Message {
        let cmd_text = if let Some(stripped) = text.strip_prefix('/') {
            stripped
        } else {
            text.trim_start_matches(&self.command_prefix)
        };

        let parts: Vec<&str> = cmd_text.split_whitespace().collect();
        let name = parts.first().unwrap_or(&"").to_string();
        let args = parts
            .get(1..)
            .map(|s| s.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Message::new(chat_id, Content::Command { name, args }).with_sender_opt(sender)
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("100", "hello there", None);
        assert_eq!(msg.content, Content::Text("hello there".to_string()));
    }

    #[test]
    fn parses_command_with_args() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("100", "/setchannel here now", None);
        assert_eq!(
            msg.content,
            Content::Command {
                name: "setchannel".to_string(),
                args: vec!["here".to_string(), "now".to_string()],
            }
        );
    }

    #[test]
    fn parses_command_without_args() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("100", "/ping", None);
        assert_eq!(
            msg.content,
            Content::Command {
                name: "ping".to_string(),
                args: vec![],
            }
        );
    }
}
