use thiserror::Error;

/// Errors the QR fetch surfaces to the caller.
///
/// Unlike the status/list calls, the pairing flow needs to distinguish "no QR
/// yet" from "QR fetch broken", so these propagate instead of collapsing into
/// a fallback value.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("expected a PNG image, got content type `{0}`")]
    NotAPng(String),
    #[error("backend returned an empty QR image")]
    EmptyQr,
}
