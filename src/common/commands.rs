/// Commands the UI sends down to the API worker.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Load the message list for one chat, replacing whatever is shown.
    LoadMessages { chat_id: String },
    /// Post a message; on success the worker reloads that chat's messages.
    SendMessage { chat_id: String, content: String },
    /// User-initiated QR re-request. Ignored unless the bridge is still
    /// waiting for pairing.
    RefreshQr,
    /// Stop the worker loop on view teardown.
    Shutdown,
}
