use serde::{Deserialize, Serialize};

/// Session state as reported by the bridge backend. The backend is
/// authoritative; the client only reacts to what each poll returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    WaitingForQr,
}

/// Outcome of a single status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub state: ConnectionState,
    pub message: Option<String>,
}

impl StatusReport {
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            message: Some(message.into()),
        }
    }
}

/// A conversation as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_message: Option<String>,
    /// Last-activity time, milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub sender: Sender,
}

/// Result of posting a message. Failures are reported in-band rather than as
/// an `Err` so the compose flow always has a user-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
