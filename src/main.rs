use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

mod application;
mod domain;
mod infrastructure;

use application::errors::CommandError;
use application::messaging::{AutoChatState, Disposition, MessageParser, MessageRouter, RateLimiter};
use application::services::CommandService;
use domain::entities::{self, Content};
use domain::traits::{ChatClient, TextGenerator};
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::telegram::TelegramAdapter;
use infrastructure::config::Config;
use infrastructure::inference::HuggingFaceGateway;

/// Notice sent when a non-admin tries to change the auto-chat channel
const ADMIN_ONLY_NOTICE: &str = "Only administrators can change the auto-chat channel.";

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "A chat bot that relays messages to a text-generation backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("relay-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn init_config(path: &str) {
    match Config::default().save(path) {
        Ok(()) => println!("Wrote default config to {}", path),
        Err(e) => tracing::error!("Failed to write config: {}", e),
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting relay-bot: {}", config.bot.name);

    // Shared routing state; injected, not global
    let cooldown = Arc::new(RateLimiter::new(Duration::from_secs(
        config.autochat.cooldown_seconds,
    )));
    let autochat = Arc::new(AutoChatState::new());

    let api_key = config
        .inference
        .api_key
        .clone()
        .or_else(|| std::env::var("HF_API_KEY").ok());
    let generator: Option<Arc<dyn TextGenerator>> = match api_key {
        Some(key) => {
            tracing::info!("Using {} for auto-chat replies", config.inference.model);
            Some(Arc::new(HuggingFaceGateway::new(key, &config.inference)))
        }
        None => {
            tracing::warn!("HF_API_KEY not set, auto-chat will reply with a placeholder");
            None
        }
    };

    let mut commands = CommandService::new();
    commands.register_defaults();

    let rt = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");

    let token = token_override.or_else(|| {
        config
            .adapters
            .telegram
            .as_ref()
            .and_then(|t| t.token.clone())
    });

    if let Some(token) = token {
        rt.block_on(async {
            let mut adapter = TelegramAdapter::new(token, config.bot.name.clone());
            if let Err(e) = adapter.fetch_bot_info().await {
                tracing::error!("Failed to fetch bot info: {}", e);
                return;
            }
            if let Err(e) = adapter.register_commands().await {
                tracing::warn!("Failed to register commands: {}", e);
            }
            run_telegram_bot(Arc::new(adapter), &config, generator, cooldown, autochat, commands)
                .await;
        });
    } else {
        // Console bot (dev mode)
        rt.block_on(async {
            let adapter = Arc::new(ConsoleAdapter::new(config.bot.name.clone()));
            run_console_bot(adapter, &config, generator, cooldown, autochat, commands).await;
        });
    }
}

async fn run_telegram_bot(
    adapter: Arc<TelegramAdapter>,
    config: &Config,
    generator: Option<Arc<dyn TextGenerator>>,
    cooldown: Arc<RateLimiter>,
    autochat: Arc<AutoChatState>,
    commands: CommandService,
) {
    let info = adapter.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let router = MessageRouter::new(Arc::clone(&adapter), generator, cooldown, autochat.clone());
    let parser = Arc::new(MessageParser::new(config.bot.prefix.clone()));
    let commands = Arc::new(commands);

    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match adapter.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(msg) = &update.message else { continue };
                    let message = adapter.to_domain(msg);

                    // Media-only updates carry no text to route
                    if message.content.text().map_or(true, str::is_empty) {
                        continue;
                    }

                    // Handling may suspend on the inference call; other
                    // messages keep flowing while it does.
                    let router = router.clone();
                    let adapter = Arc::clone(&adapter);
                    let parser = Arc::clone(&parser);
                    let commands = Arc::clone(&commands);
                    let autochat = Arc::clone(&autochat);
                    tokio::spawn(async move {
                        match router.route(message).await {
                            Ok(Disposition::Command(message)) => {
                                dispatch_telegram_command(
                                    &adapter, &parser, &commands, &autochat, message,
                                )
                                .await;
                            }
                            Ok(_) => {}
                            Err(e) => tracing::error!("Failed to handle message: {}", e),
                        }
                    });
                }

                if !updates.is_empty() {
                    offset = TelegramAdapter::get_next_offset(&updates);
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(
    adapter: Arc<ConsoleAdapter>,
    config: &Config,
    generator: Option<Arc<dyn TextGenerator>>,
    cooldown: Arc<RateLimiter>,
    autochat: Arc<AutoChatState>,
    commands: CommandService,
) {
    tracing::info!("Console mode; Ctrl-D to exit");

    let router = MessageRouter::new(Arc::clone(&adapter), generator, cooldown, autochat.clone());
    let parser = MessageParser::new(config.bot.prefix.clone());
    let user = entities::User::new("console-user").with_username("console_user");

    while let Some(line) = adapter.read_line("> ") {
        if line.is_empty() {
            continue;
        }

        let mentions = entities::extract_mentions(&line);
        let message = entities::Message::from_text("console", line)
            .with_sender(user.clone())
            .with_mentions(mentions);

        match router.route(message).await {
            Ok(Disposition::Command(message)) => {
                let Some(text) = message.content.text().map(str::to_string) else {
                    continue;
                };
                if !parser.is_command(&text) {
                    continue;
                }
                let parsed = parser.parse(message.chat_id.clone(), text, message.sender.clone());
                // The console operator is always an admin
                if let Some(response) = run_command(&commands, &autochat, true, &parsed) {
                    if let Err(e) = adapter.send_message(&parsed.chat_id, &response).await {
                        tracing::error!("Failed to send response: {}", e);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Failed to handle message: {}", e),
        }
    }
}

async fn dispatch_telegram_command(
    adapter: &TelegramAdapter,
    parser: &MessageParser,
    commands: &CommandService,
    autochat: &AutoChatState,
    message: entities::Message,
) {
    let Some(text) = message.content.text().map(str::to_string) else {
        return;
    };
    // Non-command chatter outside the auto-chat channel is dropped
    if !parser.is_command(&text) {
        return;
    }

    let sender = message.sender.clone();
    let parsed = parser.parse(message.chat_id.clone(), text, sender.clone());

    // Only the auto-chat designation commands need the admin check
    let is_admin = if is_settings_command(&parsed.content) {
        match sender {
            Some(user) => adapter
                .is_admin(&parsed.chat_id, &user.id)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Admin check failed for {}: {}", user.id, e);
                    false
                }),
            None => false,
        }
    } else {
        true
    };

    if let Some(response) = run_command(commands, autochat, is_admin, &parsed) {
        if let Err(e) = adapter.send_message(&parsed.chat_id, &response).await {
            tracing::error!("Failed to send response: {}", e);
        }
    }
}

fn is_settings_command(content: &Content) -> bool {
    matches!(
        content,
        Content::Command { name, .. } if name == "setchannel" || name == "clearchannel"
    )
}

/// Resolve a parsed command into a reply. The auto-chat designation
/// commands mutate shared state here; everything else goes through the
/// command registry.
fn run_command(
    commands: &CommandService,
    autochat: &AutoChatState,
    is_admin: bool,
    message: &entities::Message,
) -> Option<String> {
    let Content::Command { name, .. } = &message.content else {
        return None;
    };

    match name.as_str() {
        "setchannel" => Some(if is_admin {
            autochat.set(message.chat_id.clone());
            tracing::info!("Auto-chat enabled in chat {}", message.chat_id);
            "Auto-chat enabled in this chat.".to_string()
        } else {
            ADMIN_ONLY_NOTICE.to_string()
        }),
        "clearchannel" => Some(if is_admin {
            autochat.clear();
            tracing::info!("Auto-chat disabled");
            "Auto-chat disabled.".to_string()
        } else {
            ADMIN_ONLY_NOTICE.to_string()
        }),
        _ => match commands.handle(message) {
            Ok(response) => response,
            Err(CommandError::NotFound(name)) => Some(format!("Unknown command: /{}", name)),
            Err(e) => Some(format!("Error: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Message;

    fn service() -> CommandService {
        let mut commands = CommandService::new();
        commands.register_defaults();
        commands
    }

    #[test]
    fn setchannel_designates_the_current_chat_for_admins() {
        let commands = service();
        let autochat = AutoChatState::new();

        let msg = Message::from_command("100", "setchannel", vec![]);
        let response = run_command(&commands, &autochat, true, &msg);

        assert_eq!(response, Some("Auto-chat enabled in this chat.".to_string()));
        assert!(autochat.is_designated("100"));
    }

    #[test]
    fn setchannel_is_refused_for_non_admins() {
        let commands = service();
        let autochat = AutoChatState::new();

        let msg = Message::from_command("100", "setchannel", vec![]);
        let response = run_command(&commands, &autochat, false, &msg);

        assert_eq!(response, Some(ADMIN_ONLY_NOTICE.to_string()));
        assert_eq!(autochat.get(), None);
    }

    #[test]
    fn clearchannel_removes_the_designation() {
        let commands = service();
        let autochat = AutoChatState::new();
        autochat.set("100");

        let msg = Message::from_command("100", "clearchannel", vec![]);
        run_command(&commands, &autochat, true, &msg);

        assert_eq!(autochat.get(), None);
    }

    #[test]
    fn unknown_commands_get_a_notice() {
        let commands = service();
        let autochat = AutoChatState::new();

        let msg = Message::from_command("100", "dance", vec![]);
        let response = run_command(&commands, &autochat, true, &msg);

        assert_eq!(response, Some("Unknown command: /dance".to_string()));
    }

    #[test]
    fn registry_commands_are_dispatched() {
        let commands = service();
        let autochat = AutoChatState::new();

        let msg = Message::from_command("100", "ping", vec![]);
        let response = run_command(&commands, &autochat, true, &msg);

        assert_eq!(response, Some("Pong!".to_string()));
    }
}
