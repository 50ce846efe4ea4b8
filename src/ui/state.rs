use eframe::egui;

use crate::common::{ApiCommand, ApiEvent, Chat, ChatMessage, ConnectionState};

/// The pairing QR as an owned resource: the PNG bytes plus the GPU texture
/// uploaded on first paint. At most one lives per view; replacing or clearing
/// the `Option` drops the previous handle and frees the texture with it.
pub struct QrImage {
    png: Vec<u8>,
    texture: Option<egui::TextureHandle>,
    decode_failed: bool,
}

impl QrImage {
    pub fn new(png: Vec<u8>) -> Self {
        Self {
            png,
            texture: None,
            decode_failed: false,
        }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Upload the texture on first use. A PNG that will not decode is
    /// remembered so a bad payload does not retry every frame.
    pub fn texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.texture.is_none() && !self.decode_failed {
            match decode_png(&self.png) {
                Ok(img) => {
                    self.texture =
                        Some(ctx.load_texture("pairing-qr", img, egui::TextureOptions::LINEAR));
                }
                Err(err) => {
                    log::error!("Failed to decode QR image: {err}");
                    self.decode_failed = true;
                }
            }
        }
        self.texture.as_ref()
    }
}

fn decode_png(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let size = [decoded.width() as usize, decoded.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        decoded.as_raw(),
    ))
}

/// All mutable UI state, owned by the view and mutated in exactly two ways:
/// `apply` for worker events and the action helpers for user input. Both
/// return the command to send (if any) so the logic stays testable without a
/// UI or a worker.
pub struct AppState {
    pub status: ConnectionState,
    pub status_message: Option<String>,
    epoch: u64,
    pub chats: Vec<Chat>,
    pub selected_chat: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    /// Chat-list load outstanding after entering `Connected`.
    pub syncing: bool,
    pub loading_messages: bool,
    pub sending: bool,
    pub qr: Option<QrImage>,
    pub qr_pending: bool,
    pub qr_error: Option<String>,
    pub error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: ConnectionState::Disconnected,
            status_message: None,
            epoch: 0,
            chats: Vec::new(),
            selected_chat: None,
            messages: Vec::new(),
            draft: String::new(),
            syncing: false,
            loading_messages: false,
            sending: false,
            qr: None,
            qr_pending: false,
            qr_error: None,
            error: None,
        }
    }

    /// Single entry point for worker events. Results tagged with a stale
    /// epoch or a no-longer-selected chat are discarded here.
    pub fn apply(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Status {
                state,
                message,
                epoch,
            } => {
                self.epoch = epoch;
                self.status = state;
                self.status_message = message;
                match state {
                    ConnectionState::Connected => {
                        self.release_qr();
                        self.syncing = true;
                    }
                    ConnectionState::WaitingForQr => {
                        // The worker fetches on entry; drop the handle from
                        // any previous pairing round while that is in flight.
                        self.release_qr();
                        self.qr_pending = true;
                    }
                    ConnectionState::Disconnected => {
                        self.release_qr();
                        self.syncing = false;
                    }
                }
            }
            ApiEvent::Chats { chats, epoch } => {
                if epoch != self.epoch {
                    log::debug!("Dropping chat list from stale epoch {epoch}");
                    return;
                }
                self.chats = chats;
                self.syncing = false;
            }
            ApiEvent::Messages { chat_id, messages } => {
                if self.selected_chat.as_deref() != Some(chat_id.as_str()) {
                    log::debug!("Dropping messages for unselected chat {chat_id}");
                    return;
                }
                self.messages = messages;
                self.loading_messages = false;
            }
            ApiEvent::SendResult { chat_id, outcome } => {
                self.sending = false;
                if outcome.success {
                    if self.selected_chat.as_deref() == Some(chat_id.as_str()) {
                        self.draft.clear();
                    }
                    self.error = None;
                } else {
                    // Draft stays put so the user can retry.
                    self.error = Some(outcome.message);
                }
            }
            ApiEvent::Qr { result, epoch } => {
                if epoch != self.epoch || self.status != ConnectionState::WaitingForQr {
                    log::debug!("Dropping QR result from stale epoch {epoch}");
                    return;
                }
                self.qr_pending = false;
                match result {
                    Ok(png) => {
                        self.qr_error = None;
                        self.qr = Some(QrImage::new(png));
                    }
                    Err(err) => self.qr_error = Some(err.to_string()),
                }
            }
        }
    }

    pub fn select_chat(&mut self, chat_id: String) -> ApiCommand {
        self.selected_chat = Some(chat_id.clone());
        self.messages.clear();
        self.loading_messages = true;
        ApiCommand::LoadMessages { chat_id }
    }

    /// Rejects empty/whitespace drafts and double-submits client-side; no
    /// request leaves this process for those.
    pub fn submit_draft(&mut self) -> Option<ApiCommand> {
        if self.sending || self.draft.trim().is_empty() {
            return None;
        }
        let chat_id = self.selected_chat.clone()?;
        self.sending = true;
        Some(ApiCommand::SendMessage {
            chat_id,
            content: self.draft.trim().to_string(),
        })
    }

    /// Manual pairing refresh: discard the held image first, then re-request.
    /// No-op while a fetch is already pending.
    pub fn request_qr_refresh(&mut self) -> Option<ApiCommand> {
        if self.qr_pending {
            return None;
        }
        self.release_qr();
        self.qr_pending = true;
        Some(ApiCommand::RefreshQr)
    }

    pub fn release_qr(&mut self) {
        self.qr = None;
        self.qr_pending = false;
        self.qr_error = None;
    }
}
