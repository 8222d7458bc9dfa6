// ── Runtime account configuration ──
//
// These types describe *how* to reach a Kuna account. They carry
// credential data and polling cadence, but never touch disk. The host
// framework constructs an `AccountConfig` and hands it in; validation
// and any configuration UI stay on the host side.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default roster refresh cadence in seconds.
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 15;

/// Default recording scan cadence in seconds. Also the trailing window a
/// scan looks back over, so consecutive scans tile the timeline.
pub const DEFAULT_RECORDING_SCAN_SECS: u64 = 7200;

/// Configuration for a single Kuna account.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// API base URL. Overridable for tests; the default is the vendor cloud.
    pub base_url: Url,
    /// Account email (the login identity).
    pub email: String,
    /// Account password.
    pub password: SecretString,
    /// Request timeout.
    pub timeout: Duration,
    /// How often to refresh the camera roster (seconds). 0 = never.
    pub update_interval_secs: u64,
    /// How often to scan for new recordings (seconds). 0 = never.
    /// Doubles as the trailing window of each scan.
    pub recording_scan_secs: u64,
}

impl AccountConfig {
    /// Config for the given credentials with vendor-default cadence.
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
            ..Self::default()
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            base_url: kuna_api::client::API_URL.parse().expect("valid vendor URL"),
            email: String::new(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(30),
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            recording_scan_secs: DEFAULT_RECORDING_SCAN_SECS,
        }
    }
}
