use thiserror::Error;

/// Top-level error type for the `kuna-api` crate.
///
/// Covers every failure mode of the cloud API surface: authentication,
/// transport, vendor-side rejections, and payload decoding.
/// `kuna-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, no token in the auth response).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The token was rejected mid-session (403 on an authenticated call).
    /// Re-authenticating may resolve it.
    #[error("Unauthorized: token empty or expired")]
    Unauthorized,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Vendor API ──────────────────────────────────────────────────
    /// Any non-2xx status other than 403, with the response body attached.
    #[error("Kuna API error (HTTP {status})")]
    Api { status: u16, body: String },

    /// The redirect-suppressed media request came back without a
    /// `Location` header, so no signed download URL could be read.
    #[error("No redirect location in media response: {url}")]
    MissingRedirect { url: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the bearer token was rejected
    /// and re-authentication might resolve it.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}
