//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities;
use crate::domain::traits::{BotInfo, ChatClient};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: bot_name.into(),
                username: "unknown".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: Me,
        }

        #[derive(Deserialize)]
        struct Me {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using the getUpdates long poll
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter().map(|u| u.update_id + 1).max().unwrap_or(0)
    }

    /// Group and supergroup chats have negative ids
    pub fn is_group_chat(chat_id: &str) -> bool {
        chat_id.parse::<i64>().map(|id| id < 0).unwrap_or(false)
    }

    /// Whether the user may change chat settings: administrators and the
    /// chat creator in groups. Private chats have no administrators and
    /// are always allowed.
    pub async fn is_admin(&self, chat_id: &str, user_id: &str) -> Result<bool, BotError> {
        if !Self::is_group_chat(chat_id) {
            return Ok(true);
        }

        #[derive(Serialize)]
        struct GetChatMemberRequest {
            chat_id: String,
            user_id: String,
        }

        #[derive(Deserialize)]
        struct Response {
            result: ChatMember,
        }

        #[derive(Deserialize)]
        struct ChatMember {
            status: String,
        }

        let url = self.api_url("getChatMember");
        let request = GetChatMemberRequest {
            chat_id: chat_id.to_string(),
            user_id: user_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(matches!(
            data.result.status.as_str(),
            "creator" | "administrator"
        ))
    }

    /// Send a message via the Telegram API
    async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
        }

        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(BotError::PermissionDenied(format!(
                "cannot post in chat {}",
                chat_id
            )));
        }
        if !status.is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", status)));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = vec![
            Command {
                command: "ping".to_string(),
                description: "Check the bot is alive".to_string(),
            },
            Command {
                command: "help".to_string(),
                description: "Show help message".to_string(),
            },
            Command {
                command: "version".to_string(),
                description: "Show bot version".to_string(),
            },
            Command {
                command: "setchannel".to_string(),
                description: "Enable auto-chat in this chat".to_string(),
            },
            Command {
                command: "clearchannel".to_string(),
                description: "Disable auto-chat".to_string(),
            },
        ];

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!(
                "Failed to register commands: {}",
                error
            )));
        }

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Convert a Telegram message into the domain message the router
    /// consumes: raw text, author, and the @username mention list.
    pub fn to_domain(&self, msg: &Message) -> entities::Message {
        let chat_id = msg.chat.id.to_string();
        let text = msg.text.clone().unwrap_or_default();
        let sender = msg.from.as_ref().map(|from| {
            let mut user = entities::User::new(from.id.to_string());
            if let Some(ref username) = from.username {
                user = user.with_username(username.clone());
            }
            if let Some(ref first_name) = from.first_name {
                user = user.with_first_name(first_name.clone());
            }
            if from.is_bot {
                user = user.as_bot();
            }
            user
        });

        let mentions = entities::message::extract_mentions(&text);
        entities::Message::from_text(chat_id, text)
            .with_sender_opt(sender)
            .with_mentions(mentions)
    }
}

#[async_trait]
impl ChatClient for TelegramAdapter {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);
        self.send_message_api(chat_id, text).await
    }

    async fn send_typing(&self, chat_id: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest {
            chat_id: String,
            action: String,
        }

        let url = self.api_url("sendChatAction");
        let request = SendChatActionRequest {
            chat_id: chat_id.to_string(),
            action: "typing".to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Chat action error: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_offset_is_one_past_the_highest_update() {
        let updates = vec![
            Update {
                update_id: 10,
                message: None,
            },
            Update {
                update_id: 12,
                message: None,
            },
        ];
        assert_eq!(TelegramAdapter::get_next_offset(&updates), 13);
        assert_eq!(TelegramAdapter::get_next_offset(&[]), 0);
    }

    #[test]
    fn group_chats_have_negative_ids() {
        assert!(TelegramAdapter::is_group_chat("-1001234"));
        assert!(!TelegramAdapter::is_group_chat("1234"));
        assert!(!TelegramAdapter::is_group_chat("not-a-number"));
    }

    #[test]
    fn to_domain_maps_sender_and_mentions() {
        let adapter = TelegramAdapter::new("token", "relay-bot");
        let msg = Message {
            message_id: 1,
            from: Some(User {
                id: 7,
                is_bot: false,
                username: Some("alice".to_string()),
                first_name: Some("Alice".to_string()),
            }),
            chat: Chat { id: -100 },
            text: Some("hi @relay_bot".to_string()),
        };

        let domain = adapter.to_domain(&msg);
        assert_eq!(domain.chat_id, "-100");
        assert!(domain.mentions_user("relay_bot"));
        let sender = domain.sender.unwrap();
        assert_eq!(sender.id, "7");
        assert!(!sender.is_bot);
    }
}
