//! Configuration management

use crate::application::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub adapters: AdaptersConfig,
    pub autochat: AutoChatConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// Auto-chat throttling settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutoChatConfig {
    /// Minimum seconds between served auto-chat requests per user
    pub cooldown_seconds: u64,
}

/// Text-generation backend settings. Generation parameters are fixed
/// configuration, never per-request input.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InferenceConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "relay-bot".to_string(),
                prefix: "/".to_string(),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
            autochat: AutoChatConfig {
                cooldown_seconds: 5,
            },
            inference: InferenceConfig {
                model: "EleutherAI/gpt-neo-2.7B".to_string(),
                api_key: None,
                max_length: 200,
                temperature: 0.9,
                do_sample: true,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.into(), content)
            .map_err(|e| ConfigError::Parse(format!("Failed to write config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut tg) = config.adapters.telegram {
                tg.token = Some(token);
                tg.enabled = true;
            }
        }

        if let Ok(key) = std::env::var("HF_API_KEY") {
            config.inference.api_key = Some(key);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cooldown_is_five_seconds() {
        let config = Config::default();
        assert_eq!(config.autochat.cooldown_seconds, 5);
        assert!(config.inference.do_sample);
    }

    #[test]
    fn parses_kebab_case_yaml() {
        let yaml = r#"
bot:
  name: relay-bot
  prefix: "/"
adapters:
  telegram:
    enabled: true
    token: "123:abc"
  console:
    enabled: false
autochat:
  cooldown-seconds: 10
inference:
  model: gpt2
  api-key: hf_test
  max-length: 120
  temperature: 0.7
  do-sample: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.autochat.cooldown_seconds, 10);
        assert_eq!(config.inference.model, "gpt2");
        assert_eq!(config.inference.api_key.as_deref(), Some("hf_test"));
        assert!(!config.inference.do_sample);
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.bot.name, "relay-bot");
        assert_eq!(config.autochat.cooldown_seconds, 5);
    }
}
