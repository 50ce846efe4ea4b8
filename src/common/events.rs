use crate::api::ApiError;
use crate::common::types::{Chat, ChatMessage, ConnectionState, SendOutcome};

/// Events the API worker sends up to the UI.
///
/// Status-scoped events carry the epoch of the connection state they were
/// produced under; the view drops anything tagged with a stale epoch.
/// Chat-scoped events carry the chat id instead.
#[derive(Debug)]
pub enum ApiEvent {
    Status {
        state: ConnectionState,
        message: Option<String>,
        epoch: u64,
    },
    Chats {
        chats: Vec<Chat>,
        epoch: u64,
    },
    Messages {
        chat_id: String,
        messages: Vec<ChatMessage>,
    },
    SendResult {
        chat_id: String,
        outcome: SendOutcome,
    },
    Qr {
        result: Result<Vec<u8>, ApiError>,
        epoch: u64,
    },
}
