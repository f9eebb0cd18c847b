mod anthropic;
mod error;
mod http_chat;
mod retry;

pub use anthropic::AnthropicSource;
pub use error::Error;
pub use http_chat::HttpChatSource;
