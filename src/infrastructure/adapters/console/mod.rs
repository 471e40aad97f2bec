//! Console adapter for development without a bot token

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::traits::{BotInfo, ChatClient};

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: bot_name.into(),
                username: "console".to_string(),
            },
        }
    }

    /// Read one line from stdin; None on EOF
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        use std::io::Write;
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new("relay-bot")
    }
}

#[async_trait]
impl ChatClient for ConsoleAdapter {
    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_typing(&self, _chat_id: &str) -> Result<(), BotError> {
        println!("[BOT] ...");
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
