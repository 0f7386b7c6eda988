use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{
    ChatConfig, DomainError, SamplingParams, UserMessages, DEFAULT_HISTORY_LENGTH,
    DEFAULT_MAX_TOKENS, DEFAULT_REQUEST_TIMEOUT_SECS,
};

pub const CONFIG_FILE: &str = "MagnusLiber.json";
/// Developer override, preferred over [`CONFIG_FILE`] when present.
pub const DEV_CONFIG_FILE: &str = "MagnusLiber.dev.json";
pub const MESSAGES_FILE: &str = "Messages.json";
pub const SYSTEM_MESSAGE_FILE: &str = "SystemMessage.txt";

pub const ENV_URL: &str = "OPENAI_URL";
pub const ENV_KEY: &str = "OPENAI_KEY";
pub const ENV_DEPLOYMENT: &str = "OPENAI_DEPLOYMENT";
pub const ENV_HISTORY_LENGTH: &str = "OPENAI_HISTORY_LENGTH";
pub const ENV_MAX_TOKENS: &str = "OPENAI_MAX_TOKENS";

/// On-disk JSON configuration (camelCase keys).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    open_ai_uri: String,
    open_ai_key: String,
    deployment: String,
    history_length: usize,
    max_tokens: u32,
    temperature: Option<f32>,
    top_p: Option<f32>,
    presence_penalty: Option<f32>,
    frequency_penalty: Option<f32>,
    request_timeout_secs: Option<u64>,
}

impl FileConfig {
    fn into_chat_config(self) -> ChatConfig {
        let defaults = SamplingParams::default();
        let sampling = SamplingParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            presence_penalty: self.presence_penalty.unwrap_or(defaults.presence_penalty),
            frequency_penalty: self.frequency_penalty.unwrap_or(defaults.frequency_penalty),
        };

        ChatConfig::new(self.open_ai_uri, self.open_ai_key, self.deployment)
            .with_history_length(self.history_length)
            .with_max_tokens(self.max_tokens)
            .with_sampling(sampling)
            .with_request_timeout(Duration::from_secs(
                self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ))
    }
}

/// Where the session configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

/// Everything read once at start-up.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub config: ChatConfig,
    pub messages: UserMessages,
    pub system_prompt: String,
}

/// Locates and reads the configuration file, user messages and system prompt.
///
/// Files are looked up in `data_dir` unless an explicit path was given.
pub struct ConfigLoader {
    data_dir: PathBuf,
    config_path: Option<PathBuf>,
    messages_path: Option<PathBuf>,
    system_message_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            config_path: None,
            messages_path: None,
            system_message_path: None,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_messages_path(mut self, path: Option<PathBuf>) -> Self {
        self.messages_path = path;
        self
    }

    pub fn with_system_message_path(mut self, path: Option<PathBuf>) -> Self {
        self.system_message_path = path;
        self
    }

    pub fn load(&self) -> Result<SessionSettings, DomainError> {
        let config = self.load_config()?;
        let messages = self.load_messages()?;
        let system_prompt = self.load_system_message()?;
        Ok(SessionSettings {
            config,
            messages,
            system_prompt,
        })
    }

    pub fn resolve_source(&self) -> ConfigSource {
        if let Some(path) = &self.config_path {
            return ConfigSource::File(path.clone());
        }

        [DEV_CONFIG_FILE, CONFIG_FILE]
            .iter()
            .map(|name| self.data_dir.join(name))
            .find(|path| path.is_file())
            .map(ConfigSource::File)
            .unwrap_or(ConfigSource::Environment)
    }

    pub fn load_config(&self) -> Result<ChatConfig, DomainError> {
        self.load_config_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::load_config`] with an injectable environment lookup.
    pub fn load_config_with<F>(&self, lookup: F) -> Result<ChatConfig, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match self.resolve_source() {
            ConfigSource::File(path) => {
                info!("Loading configuration from {}", path.display());
                let file: FileConfig = serde_json::from_str(&read_file(&path)?)
                    .map_err(|e| DomainError::config(format!("{}: {e}", path.display())))?;
                file.into_chat_config()
            }
            ConfigSource::Environment => {
                info!("No configuration file found, reading environment variables");
                config_from_env(lookup)?
            }
        };

        config.validate()?;
        debug!("Configuration: {}", config.summary());
        Ok(config)
    }

    pub fn load_messages(&self) -> Result<UserMessages, DomainError> {
        let path = match &self.messages_path {
            Some(path) => path.clone(),
            None => {
                let path = self.data_dir.join(MESSAGES_FILE);
                if !path.is_file() {
                    debug!("{} not found, using built-in messages", path.display());
                    return Ok(UserMessages::default());
                }
                path
            }
        };

        serde_json::from_str(&read_file(&path)?)
            .map_err(|e| DomainError::config(format!("{}: {e}", path.display())))
    }

    pub fn load_system_message(&self) -> Result<String, DomainError> {
        let path = self
            .system_message_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(SYSTEM_MESSAGE_FILE));
        read_file(&path)
    }
}

pub fn config_from_json(text: &str) -> Result<ChatConfig, DomainError> {
    let file: FileConfig = serde_json::from_str(text)
        .map_err(|e| DomainError::config(format!("Invalid configuration: {e}")))?;
    Ok(file.into_chat_config())
}

pub fn config_from_env<F>(lookup: F) -> Result<ChatConfig, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DomainError::config(format!("Environment variable {key} must be set")))
    };

    let endpoint = required(ENV_URL)?;
    let api_key = required(ENV_KEY)?;
    let deployment = required(ENV_DEPLOYMENT)?;

    let history_length =
        parse_optional(&lookup, ENV_HISTORY_LENGTH)?.unwrap_or(DEFAULT_HISTORY_LENGTH);
    let max_tokens = parse_optional(&lookup, ENV_MAX_TOKENS)?.unwrap_or(DEFAULT_MAX_TOKENS);

    Ok(ChatConfig::new(endpoint, api_key, deployment)
        .with_history_length(history_length)
        .with_max_tokens(max_tokens))
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DomainError::config(format!("Environment variable {key}: {e}")))
        })
        .transpose()
}

fn read_file(path: &Path) -> Result<String, DomainError> {
    std::fs::read_to_string(path)
        .map_err(|e| DomainError::config(format!("Could not read {}: {e}", path.display())))
}
