use std::future::Future;

use reqwest::header;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::types::{Chat, ChatMessage, ConnectionState, SendOutcome, StatusReport};

use super::error::ApiError;

/// Backend surface the worker talks to. Behind a trait so the polling loop
/// can be driven by a scripted fake in tests.
pub trait BridgeApi: Send + Sync {
    /// Fail-soft: any transport or decode problem becomes `Disconnected`
    /// with a reason, because this runs unattended on the poll timer.
    fn check_status(&self) -> impl Future<Output = StatusReport> + Send;
    /// Fail-soft to an empty list.
    fn list_chats(&self) -> impl Future<Output = Vec<Chat>> + Send;
    /// Fail-soft to an empty list.
    fn list_messages(&self, chat_id: &str) -> impl Future<Output = Vec<ChatMessage>> + Send;
    /// Failures come back as `success = false` with a reason, never a panic.
    fn send_message(
        &self,
        chat_id: &str,
        content: &str,
    ) -> impl Future<Output = SendOutcome> + Send;
    /// Fail-hard: the pairing view must tell "fetch broken" apart from
    /// "nothing to show yet".
    fn fetch_qr(&self) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl BridgeApi for HttpApi {
    async fn check_status(&self) -> StatusReport {
        let url = self.url("/api/status");
        match self.http.get(url.as_str()).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<RawStatus>().await {
                Ok(raw) => decode_status(raw),
                Err(err) => {
                    log::warn!("Unreadable status payload from {url}: {err}");
                    StatusReport::disconnected(format!("Bad status response: {err}"))
                }
            },
            Ok(resp) => {
                log::warn!("Status endpoint {url} returned HTTP {}", resp.status());
                StatusReport::disconnected(format!("Status check returned HTTP {}", resp.status()))
            }
            Err(err) => {
                log::debug!("Status check against {url} failed: {err}");
                StatusReport::disconnected(format!("Cannot reach backend: {err}"))
            }
        }
    }

    async fn list_chats(&self) -> Vec<Chat> {
        self.fetch_list(&self.url("/api/chats")).await
    }

    async fn list_messages(&self, chat_id: &str) -> Vec<ChatMessage> {
        self.fetch_list(&self.url(&format!("/api/messages/{chat_id}")))
            .await
    }

    async fn send_message(&self, chat_id: &str, content: &str) -> SendOutcome {
        let url = self.url(&format!("/api/messages/{chat_id}"));
        let body = serde_json::json!({ "content": content });
        match self.http.post(url.as_str()).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                // The backend may echo the input or return {message}; the UI
                // only needs success plus a short note.
                let note = resp
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("message")?.as_str().map(str::to_owned));
                SendOutcome::sent(note.unwrap_or_else(|| "Message sent".to_string()))
            }
            Ok(resp) => {
                log::warn!("Send to {url} returned HTTP {}", resp.status());
                SendOutcome::failure(format!("Send failed: HTTP {}", resp.status()))
            }
            Err(err) => {
                log::warn!("Send to {url} failed: {err}");
                SendOutcome::failure(format!("Send failed: {err}"))
            }
        }
    }

    async fn fetch_qr(&self) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/qr"))
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/png") {
            return Err(ApiError::NotAPng(content_type));
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::EmptyQr);
        }
        Ok(bytes.to_vec())
    }
}

impl HttpApi {
    async fn fetch_list<T: DeserializeOwned>(&self, url: &str) -> Vec<T> {
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<Value>().await {
                Ok(value) => decode_list(value),
                Err(err) => {
                    log::warn!("Unreadable list payload from {url}: {err}");
                    Vec::new()
                }
            },
            Ok(resp) => {
                log::warn!("List endpoint {url} returned HTTP {}", resp.status());
                Vec::new()
            }
            Err(err) => {
                log::debug!("List fetch from {url} failed: {err}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Unknown status strings count as disconnected; the poller must never see a
/// hard error out of a status check.
fn decode_status(raw: RawStatus) -> StatusReport {
    let state = match raw.status.as_str() {
        "connected" => ConnectionState::Connected,
        "waiting_for_qr" => ConnectionState::WaitingForQr,
        "disconnected" => ConnectionState::Disconnected,
        other => {
            log::warn!("Backend reported unknown status `{other}`; treating as disconnected");
            ConnectionState::Disconnected
        }
    };
    StatusReport {
        state,
        message: raw.message,
    }
}

/// A non-array body (or one that does not decode) counts as an empty list so
/// the view renders an empty state instead of crashing.
fn decode_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    if !value.is_array() {
        log::warn!("Expected a JSON array from the backend, got something else");
        return Vec::new();
    }
    match serde_json::from_value(value) {
        Ok(items) => items,
        Err(err) => {
            log::warn!("Failed to decode list items: {err}");
            Vec::new()
        }
    }
}
