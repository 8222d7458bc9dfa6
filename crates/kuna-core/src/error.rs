// ── Core error types ──
//
// User-facing errors from kuna-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<kuna_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Authentication timed out after {timeout_secs}s")]
    AuthenticationTimeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Camera not found: {serial}")]
    CameraNotFound { serial: String },

    #[error("Camera {serial} has no owner email; cannot toggle notifications")]
    OwnerUnknown { serial: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kuna_api::Error> for CoreError {
    fn from(err: kuna_api::Error) -> Self {
        match err {
            kuna_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            kuna_api::Error::Unauthorized => CoreError::AuthenticationFailed {
                message: "token empty or expired -- re-authentication required".into(),
            },
            kuna_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            kuna_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            kuna_api::Error::Api { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            kuna_api::Error::MissingRedirect { url } => CoreError::Api {
                message: format!("no redirect location for {url}"),
                status: None,
            },
            kuna_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
