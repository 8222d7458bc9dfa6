// ── Recording events ──
//
// One event per recording whose download link resolved during a scan.
// Broadcast as `Arc<RecordingEvent>`; slow consumers lag, they do not
// block the scan.

use chrono::{DateTime, Utc};

/// Event category for resolved recordings.
pub const CATEGORY_RECORDING: &str = "recording";

/// A newly discovered recording with its resolved download URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingEvent {
    /// Always [`CATEGORY_RECORDING`]; lets hosts multiplex one event bus.
    pub category: &'static str,
    pub camera_name: String,
    pub serial_number: String,
    pub label: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
    /// Signed download URL; short-lived, consume promptly.
    pub url: String,
}
