// Kuna API response types
//
// Models for the vendor's JSON payloads. Fields use `#[serde(default)]`
// liberally because the API is inconsistent about field presence across
// firmware and app versions. Timestamps stay raw strings at this layer;
// `kuna-core` parses them into strong types.

use serde::{Deserialize, Serialize};

// ── List envelope ────────────────────────────────────────────────────

/// Standard Kuna list envelope: `{ "results": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

// ── Camera ───────────────────────────────────────────────────────────

/// Full camera object from `user/cameras` or `cameras/{serial}/`.
///
/// The API returns 40+ fields per camera. We model the commonly needed
/// ones explicitly; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub serial_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    /// Whether the camera is reachable from the cloud.
    #[serde(default)]
    pub status: bool,
    /// Light bulb state: true = on.
    #[serde(default)]
    pub bulb_on: bool,
    /// Status LED state: true = on.
    #[serde(default)]
    pub led_mask: bool,
    #[serde(default)]
    pub notifications_enabled: bool,
    /// Motion detection state: true = motion currently recorded.
    #[serde(default)]
    pub recording_active: bool,
    /// Speaker volume, 0..=100.
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub brightness: Option<i64>,
    #[serde(default)]
    pub sensitivity: Option<i64>,
    /// Firmware build of the device.
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub recordings_url: Option<String>,
    #[serde(default)]
    pub users_url: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Account owner reference embedded in a camera object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Partial camera property update for `PATCH cameras/{serial}/`.
///
/// Only the keys the caller sets are serialized; the server applies the
/// patch to the present keys and leaves everything else untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CameraPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulb_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_mask: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
}

impl CameraPatch {
    /// A patch toggling only the light bulb.
    pub fn light(on: bool) -> Self {
        Self {
            bulb_on: Some(on),
            ..Self::default()
        }
    }
}

// ── Recording ────────────────────────────────────────────────────────

/// Stored recording from `cameras/{serial}/recordings/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: i64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub camera: Option<RecordingCamera>,
    /// Capture time, `%Y-%m-%dT%H:%M:%S.%fZ`.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub classification: Option<String>,
    /// Media endpoint that answers with a signed redirect.
    #[serde(default)]
    pub mp4: Option<String>,
    #[serde(default)]
    pub m3u8: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Camera reference embedded in a recording object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingCamera {
    pub serial_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
