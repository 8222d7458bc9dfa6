// Shared transport configuration for building reqwest::Client instances.
//
// The download-link flow reads the `Location` header instead of following
// it, and reqwest's redirect policy is fixed per client -- so the config
// builds two clients from the same timeout settings.

use std::time::Duration;

/// User agent for JSON API calls. The vendor gates some behavior on the
/// mobile app's UA string.
pub const USER_AGENT: &str = "Kuna/2.4.4 (iPhone; iOS 12.1; Scale/3.00)";

/// User agent for thumbnail and media-redirect calls -- the image CDN
/// expects the CFNetwork UA, not the app UA.
pub const USER_AGENT_THUMBNAIL: &str = "Kuna/156 CFNetwork/975.0.3 Darwin/18.2.0";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build the primary `reqwest::Client` (follows redirects).
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(crate::error::Error::Transport)
    }

    /// Build a `reqwest::Client` with redirect-following disabled.
    ///
    /// Used to resolve signed media URLs: the API answers with a 3xx whose
    /// `Location` header is the payload, so the redirect must not be taken.
    pub fn build_client_no_redirect(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT_THUMBNAIL)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
