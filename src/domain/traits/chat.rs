use crate::application::errors::BotError;
use async_trait::async_trait;

/// ChatClient trait - abstraction for messaging platform adapters
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a message to a chat, returning the platform message id
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Surface a typing indicator on a chat (best effort)
    async fn send_typing(&self, chat_id: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
