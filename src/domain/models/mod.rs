mod chat_config;
mod conversation;
mod turn;
mod user_messages;

pub use chat_config::*;
pub use conversation::*;
pub use turn::*;
pub use user_messages::*;
