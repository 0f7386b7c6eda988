use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    AzureOpenAiClient, ChatSessionUseCase, CompletionClient, ConfigLoader,
    ConversationBuffer, MockCompletion, SessionSettings, UserMessages,
};

pub struct ContainerConfig {
    pub data_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub messages_path: Option<PathBuf>,
    pub system_message_path: Option<PathBuf>,
    /// Answer locally with [`MockCompletion`] instead of calling the service.
    pub mock_completions: bool,
}

pub struct Container {
    completion_client: Arc<dyn CompletionClient>,
    settings: SessionSettings,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let loader = ConfigLoader::new(&config.data_dir)
            .with_config_path(config.config_path)
            .with_messages_path(config.messages_path)
            .with_system_message_path(config.system_message_path);

        let settings = loader.load()?;
        Self::with_settings(settings, config.mock_completions)
    }

    /// Build from settings that were already loaded.
    pub fn with_settings(settings: SessionSettings, mock_completions: bool) -> Result<Self> {
        settings.config.validate()?;

        let completion_client: Arc<dyn CompletionClient> = if mock_completions {
            info!("Using mock completion service");
            Arc::new(MockCompletion::new())
        } else {
            let client = AzureOpenAiClient::new(&settings.config)?;
            debug!("Using Azure OpenAI at {}", client.url());
            Arc::new(client)
        };

        Ok(Self {
            completion_client,
            settings,
        })
    }

    /// Replace the completion backend, e.g. with a test double.
    pub fn with_completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion_client = client;
        self
    }

    pub fn chat_session_use_case(&self) -> ChatSessionUseCase {
        let conversation = ConversationBuffer::new(
            self.settings.system_prompt.clone(),
            self.settings.config.history_length(),
        );
        ChatSessionUseCase::new(self.completion_client.clone(), conversation)
    }

    pub fn messages(&self) -> &UserMessages {
        &self.settings.messages
    }

    pub fn model_name(&self) -> &str {
        self.completion_client.model_name()
    }
}
