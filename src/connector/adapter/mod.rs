mod azure_openai_client;
mod config_loader;
mod mock_completion;

pub use azure_openai_client::*;
pub use config_loader::*;
pub use mock_completion::*;
