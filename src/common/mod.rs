pub mod commands;
pub mod events;
pub mod types;

pub use commands::ApiCommand;
pub use events::ApiEvent;
pub use types::{Chat, ChatMessage, ConnectionState, SendOutcome, Sender, StatusReport};
