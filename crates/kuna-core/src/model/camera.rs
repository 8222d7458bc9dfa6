use chrono::{DateTime, Utc};

/// A Kuna camera as seen at the last poll.
///
/// Snapshots are immutable: a refresh replaces the whole object in the
/// store rather than mutating fields in place, so holders of an
/// `Arc<Camera>` always see one consistent poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Stable device identifier; the primary key across polling cycles.
    pub serial_number: String,
    pub name: String,
    /// Whether the camera is reachable from the cloud.
    pub online: bool,
    /// Light bulb state.
    pub light_on: bool,
    /// Status LED state.
    pub led_on: bool,
    pub notifications_enabled: bool,
    /// Motion currently being recorded.
    pub recording_active: bool,
    /// Speaker volume, 0..=100.
    pub volume: Option<u8>,
    pub brightness: Option<u8>,
    pub sensitivity: Option<i64>,
    /// Firmware build string.
    pub firmware_build: Option<String>,
    /// Email of the owning user; the key for notification toggles.
    pub owner_email: Option<String>,
    pub ip_address: Option<String>,
    pub timezone: Option<String>,
    pub location_address: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
