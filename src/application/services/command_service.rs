use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, Content, Message};

/// Service for managing and executing commands
#[derive(Default)]
pub struct CommandService {
    registry: CommandRegistry,
}

impl CommandService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(
            Command::new("ping")
                .with_description("Check the bot is alive")
                .with_handler(|_| Ok("Pong!".to_string())),
        );

        self.register(
            Command::new("help")
                .with_description("Show help message")
                .with_usage("/help [command]")
                .with_handler(|_| {
                    Ok("Available commands:\n\
                        /ping - Check the bot is alive\n\
                        /help - Show this message\n\
                        /version - Show bot version\n\
                        /setchannel - Enable auto-chat in this chat (admins)\n\
                        /clearchannel - Disable auto-chat (admins)"
                        .to_string())
                }),
        );

        self.register(
            Command::new("version")
                .with_description("Show bot version")
                .with_handler(|_| Ok(format!("relay-bot v{}", env!("CARGO_PKG_VERSION")))),
        );
    }

    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args: _ } = &message.content else {
            return Ok(None);
        };

        let cmd = self
            .registry
            .find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message.clone())?))
        } else {
            Ok(Some(format!("Command {} not implemented", cmd.name)))
        }
    }
}
