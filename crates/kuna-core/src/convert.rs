// ── API-to-domain type conversions ──
//
// Bridges raw `kuna_api` response types into canonical `kuna_core::model`
// domain types. Each conversion normalizes field names, parses vendor
// timestamp strings into strong types, and fills sensible defaults for
// missing optional data.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::{Camera, Recording};

/// Timestamp format used across the vendor API.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an optional vendor timestamp, silently dropping unparseable values.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// Narrow an optional vendor integer into `u8` range, dropping out-of-range
/// values rather than clamping.
fn narrow_u8(raw: Option<i64>) -> Option<u8> {
    raw.and_then(|v| u8::try_from(v).ok())
}

// ── Camera ─────────────────────────────────────────────────────────

impl From<kuna_api::Camera> for Camera {
    fn from(c: kuna_api::Camera) -> Self {
        let owner_email = c.owner.and_then(|o| o.email);

        Self {
            name: c.name.unwrap_or_else(|| c.serial_number.clone()),
            serial_number: c.serial_number,
            online: c.status,
            light_on: c.bulb_on,
            led_on: c.led_mask,
            notifications_enabled: c.notifications_enabled,
            recording_active: c.recording_active,
            volume: narrow_u8(c.volume),
            brightness: narrow_u8(c.brightness),
            sensitivity: c.sensitivity,
            firmware_build: c.build,
            owner_email,
            ip_address: c.ip_address,
            timezone: c.timezone,
            location_address: c.location_address,
            updated_at: parse_timestamp(c.updated_at.as_deref()),
        }
    }
}

// ── Recording ──────────────────────────────────────────────────────

/// Convert a raw recording, resolving the owning camera's serial number.
///
/// The vendor embeds a camera reference in each recording; when it is
/// absent, `fallback_serial` (the serial the listing was fetched for)
/// fills in.
pub(crate) fn recording_from_api(r: kuna_api::Recording, fallback_serial: &str) -> Recording {
    let serial_number = r
        .camera
        .map_or_else(|| fallback_serial.to_owned(), |c| c.serial_number);

    Recording {
        id: r.id,
        label: r.label.unwrap_or_default(),
        serial_number,
        timestamp: parse_timestamp(r.timestamp.as_deref()),
        duration_secs: r.duration,
        media_url: r.mp4,
    }
}
