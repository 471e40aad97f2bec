//! Message router - Classifies inbound messages and dispatches replies

use std::sync::Arc;
use std::time::Instant;

use crate::application::errors::BotError;
use crate::application::messaging::{AutoChatState, RateLimiter};
use crate::domain::entities::Message;
use crate::domain::traits::{ChatClient, InferenceOutcome, TextGenerator};

/// Notice sent when a user is still inside their cooldown window
const COOLDOWN_NOTICE: &str = "Please wait a few seconds before asking again.";

/// Auto-chat reply when no generation backend is configured
const NO_BACKEND_NOTICE: &str = "AI system is coming soon...";

/// What the router decided to do with a message
#[derive(Debug)]
pub enum Disposition {
    /// Automated author, dropped without side effects
    Ignored,
    /// The router sent exactly one reply and the interaction is over
    Replied,
    /// Not for the router; the caller should run command dispatch
    Command(Message),
}

/// Routes each inbound message to exactly one path, in priority order:
/// ignore automated authors, greet direct mentions, relay messages in the
/// designated auto-chat channel, or hand everything else back for command
/// dispatch.
pub struct MessageRouter<C> {
    client: Arc<C>,
    generator: Option<Arc<dyn TextGenerator>>,
    cooldown: Arc<RateLimiter>,
    autochat: Arc<AutoChatState>,
}

impl<C> Clone for MessageRouter<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            generator: self.generator.clone(),
            cooldown: Arc::clone(&self.cooldown),
            autochat: Arc::clone(&self.autochat),
        }
    }
}

impl<C: ChatClient> MessageRouter<C> {
    pub fn new(
        client: Arc<C>,
        generator: Option<Arc<dyn TextGenerator>>,
        cooldown: Arc<RateLimiter>,
        autochat: Arc<AutoChatState>,
    ) -> Self {
        Self {
            client,
            generator,
            cooldown,
            autochat,
        }
    }

    /// Route one message. Classification itself has no side effects; the
    /// greeting and auto-chat paths each send exactly one reply.
    pub async fn route(&self, message: Message) -> Result<Disposition, BotError> {
        let Some(sender) = message.sender.clone() else {
            // No attributable author, nothing to throttle or reply to
            tracing::debug!("[{}] Dropping message without sender", message.chat_id);
            return Ok(Disposition::Ignored);
        };

        if sender.is_bot {
            tracing::debug!("[{}] Ignoring bot-authored message", message.chat_id);
            return Ok(Disposition::Ignored);
        }

        // Mention check is strictly prior to the auto-chat check: a direct
        // mention in the designated channel is still a greeting.
        let me = self.client.bot_info();
        if message.mentions_user(&me.username) {
            let greeting = format!("Hello {}, what do you need?", sender.mention());
            self.client.send_message(&message.chat_id, &greeting).await?;
            return Ok(Disposition::Replied);
        }

        if self.autochat.is_designated(&message.chat_id) {
            self.auto_chat(&message, &sender.id).await?;
            return Ok(Disposition::Replied);
        }

        Ok(Disposition::Command(message))
    }

    /// Auto-chat path: cooldown gate, then one inference call, then
    /// exactly one reply whatever the outcome. No retries.
    async fn auto_chat(&self, message: &Message, user_id: &str) -> Result<(), BotError> {
        if !self.cooldown.allow(user_id, Instant::now()) {
            tracing::debug!("[{}] User {} throttled", message.chat_id, user_id);
            self.client
                .send_message(&message.chat_id, COOLDOWN_NOTICE)
                .await?;
            return Ok(());
        }

        let Some(generator) = &self.generator else {
            self.client
                .send_message(&message.chat_id, NO_BACKEND_NOTICE)
                .await?;
            return Ok(());
        };

        // UX affordance only, a failed typing indicator is not an error
        if let Err(e) = self.client.send_typing(&message.chat_id).await {
            tracing::debug!("[{}] Typing indicator failed: {}", message.chat_id, e);
        }

        let text = message.content.text().unwrap_or_default();
        let reply = match generator.generate(text).await {
            InferenceOutcome::Success(text) => text,
            InferenceOutcome::BackendError(detail) => {
                tracing::warn!("[{}] Backend rejected request: {}", message.chat_id, detail);
                format!("The AI backend rejected the request: {}", detail)
            }
            InferenceOutcome::TransportError(detail) => {
                tracing::warn!("[{}] Backend unreachable: {}", message.chat_id, detail);
                format!("Couldn't reach the AI backend: {}", detail)
            }
        };

        self.client.send_message(&message.chat_id, &reply).await?;
        Ok(())
    }
}
