// Camera endpoints
//
// Roster listing, single-camera fetch, thumbnail retrieval, property
// patching, per-user notification toggles, and recording listings.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Camera, CameraPatch, Page, Recording};

const CAMERAS_ENDPOINT: &str = "user/cameras";
const CAMERA_ENDPOINT: &str = "cameras";
const THUMBNAIL_SEGMENT: &str = "thumbnail";
const USERS_SEGMENT: &str = "users";
const RECORDINGS_SEGMENT: &str = "recordings";

/// Format of every timestamp the vendor API emits.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

impl ApiClient {
    /// List every camera on the account.
    ///
    /// `GET user/cameras/`
    pub async fn list_cameras(&self) -> Result<Vec<Camera>, Error> {
        debug!("listing cameras");
        let page: Page<Camera> = self.get(CAMERAS_ENDPOINT, &[]).await?;
        Ok(page.results)
    }

    /// Fetch one camera's full state by serial number.
    ///
    /// `GET cameras/{serial}/?live=1` -- the live flag makes the cloud poll
    /// the device instead of serving its cached state.
    pub async fn get_camera(&self, serial: &str) -> Result<Camera, Error> {
        debug!(serial, "fetching camera");
        self.get(&format!("{CAMERA_ENDPOINT}/{serial}"), &[("live", "1")])
            .await
    }

    /// Fetch a thumbnail snapshot for a camera.
    ///
    /// `GET cameras/{serial}/thumbnail/?live=1`, binary body.
    pub async fn get_thumbnail(&self, serial: &str) -> Result<Vec<u8>, Error> {
        debug!(serial, "fetching thumbnail");
        self.get_bytes(
            &format!("{CAMERA_ENDPOINT}/{serial}/{THUMBNAIL_SEGMENT}"),
            &[("live", "1")],
        )
        .await
    }

    /// Apply a partial property update to a camera.
    ///
    /// `PATCH cameras/{serial}/` -- only the keys set on the patch are sent;
    /// the server leaves absent keys untouched.
    pub async fn set_camera_properties(
        &self,
        serial: &str,
        patch: &CameraPatch,
    ) -> Result<(), Error> {
        debug!(serial, ?patch, "patching camera properties");
        let _: serde_json::Value = self
            .patch(&format!("{CAMERA_ENDPOINT}/{serial}"), patch)
            .await?;
        Ok(())
    }

    /// Toggle the light bulb on a camera.
    pub async fn set_light(&self, serial: &str, on: bool) -> Result<(), Error> {
        self.set_camera_properties(serial, &CameraPatch::light(on))
            .await
    }

    /// Set motion notifications for the owning user of a camera.
    ///
    /// `POST cameras/{serial}/users/{email}/` -- the toggle is a per-user
    /// sub-resource keyed by the owner's email, not a camera property.
    pub async fn set_notifications(
        &self,
        serial: &str,
        owner_email: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        debug!(serial, enabled, "setting notifications");
        let body = serde_json::json!({ "notifications_enabled": enabled });
        let _: serde_json::Value = self
            .post(
                &format!("{CAMERA_ENDPOINT}/{serial}/{USERS_SEGMENT}/{owner_email}"),
                &body,
            )
            .await?;
        Ok(())
    }

    /// List all stored recordings for a camera.
    ///
    /// `GET cameras/{serial}/recordings/` -- one page, newest first. The
    /// vendor API offers no server-side time filter and we do not chase
    /// pagination; cost grows with the page the server chooses to return.
    pub async fn list_recordings(&self, serial: &str) -> Result<Vec<Recording>, Error> {
        debug!(serial, "listing recordings");
        let page: Page<Recording> = self
            .get(&format!("{CAMERA_ENDPOINT}/{serial}/{RECORDINGS_SEGMENT}"), &[])
            .await?;
        Ok(page.results)
    }

    /// List recordings whose capture time falls within the trailing
    /// `window` ending now.
    ///
    /// Filtering is client-side over the full listing. A recording exactly
    /// `window` old is excluded (strict comparison); recordings with
    /// missing or unparseable timestamps are dropped with a warning.
    pub async fn recordings_within(
        &self,
        serial: &str,
        window: TimeDelta,
    ) -> Result<Vec<Recording>, Error> {
        let recordings = self.list_recordings(serial).await?;
        Ok(filter_recent(recordings, window, Utc::now()))
    }
}

/// Keep recordings whose age relative to `now` is strictly less than
/// `window`.
fn filter_recent(recordings: Vec<Recording>, window: TimeDelta, now: DateTime<Utc>) -> Vec<Recording> {
    recordings
        .into_iter()
        .filter(|rec| match parse_timestamp(rec.timestamp.as_deref()) {
            Some(ts) => now - ts < window,
            None => {
                warn!(id = rec.id, "dropping recording with unparseable timestamp");
                false
            }
        })
        .collect()
}

/// Parse a vendor timestamp (`%Y-%m-%dT%H:%M:%S.%fZ`) into UTC.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    chrono::NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(id: i64, timestamp: Option<&str>) -> Recording {
        Recording {
            id,
            label: None,
            camera: None,
            timestamp: timestamp.map(ToOwned::to_owned),
            duration: None,
            classification: None,
            mp4: None,
            m3u8: None,
            extra: serde_json::Map::new(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        parse_timestamp(Some("2020-06-01T12:00:00.000000Z")).expect("valid fixture timestamp")
    }

    #[test]
    fn filter_keeps_recordings_inside_the_window() {
        let recs = vec![
            recording(1, Some("2020-06-01T11:30:00.000000Z")),
            recording(2, Some("2020-06-01T09:00:00.000000Z")),
        ];

        let kept = filter_recent(recs, TimeDelta::hours(2), fixed_now());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn filter_excludes_the_exact_boundary() {
        let recs = vec![recording(1, Some("2020-06-01T10:00:00.000000Z"))];

        let kept = filter_recent(recs, TimeDelta::hours(2), fixed_now());

        assert!(kept.is_empty());
    }

    #[test]
    fn filter_drops_missing_and_unparseable_timestamps() {
        let recs = vec![
            recording(1, None),
            recording(2, Some("not-a-timestamp")),
            recording(3, Some("2020-06-01T11:59:00.000000Z")),
        ];

        let kept = filter_recent(recs, TimeDelta::hours(2), fixed_now());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 3);
    }

    #[test]
    fn parse_timestamp_handles_fractional_seconds() {
        let ts = parse_timestamp(Some("2019-03-04T01:02:03.456789Z")).expect("parse");
        assert_eq!(ts.timestamp_subsec_micros(), 456_789);
    }
}
