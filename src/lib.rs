pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{ChatSessionUseCase, CompletionClient, UserInput};

pub use connector::{
    AzureOpenAiClient, ChatController, ConfigLoader, ConfigSource, Container, ContainerConfig,
    LoopControl, MockCompletion, SessionSettings,
};

pub use domain::{
    ChatConfig, ConversationBuffer, DomainError, Role, SamplingParams, Turn, UserMessages,
};

pub use cli::Cli;
