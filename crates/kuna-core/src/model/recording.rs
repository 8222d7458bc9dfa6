use chrono::{DateTime, Utc};

/// A stored recording, resolved to its owning camera by serial number.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub id: i64,
    pub label: String,
    /// Serial number of the camera that captured this recording.
    pub serial_number: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Length in seconds.
    pub duration_secs: Option<i64>,
    /// Media endpoint that answers with a signed redirect; `None` when the
    /// vendor has not (yet) transcoded the clip.
    pub media_url: Option<String>,
}
