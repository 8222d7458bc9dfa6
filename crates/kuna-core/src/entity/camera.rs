// Camera entity: recording state, device attributes, and thumbnail
// snapshots.

use std::sync::Arc;

use serde_json::json;

use crate::account::Account;
use crate::error::CoreError;
use crate::listener::ListenerHandle;
use crate::model::Camera;

use super::{CameraRef, EntityHost};

/// Brand string surfaced to host frameworks.
pub const BRAND: &str = "Kuna";

/// Camera view over a roster entry.
pub struct CameraEntity {
    camera: CameraRef,
    name: String,
    unique_id: String,
    _listener: ListenerHandle,
}

impl CameraEntity {
    /// Build the entity and register it for update fan-out. Dropping the
    /// entity unsubscribes it.
    pub fn new(account: &Account, camera: Arc<Camera>, host: Arc<dyn EntityHost>) -> Self {
        let name = format!("{} Camera", camera.name);
        let unique_id = format!("{}-Camera", camera.serial_number);

        let listener = {
            let uid = unique_id.clone();
            account.add_update_listener(move || host.schedule_update(&uid))
        };

        Self {
            camera: CameraRef::new(account.clone(), camera),
            name,
            unique_id,
            _listener: listener,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn brand(&self) -> &'static str {
        BRAND
    }

    pub fn available(&self) -> bool {
        self.camera.current().online
    }

    /// Whether the camera is currently recording motion.
    pub fn is_recording(&self) -> bool {
        self.camera.current().recording_active
    }

    /// Extra state attributes for the host to render.
    pub fn state_attributes(&self) -> serde_json::Value {
        let camera = self.camera.current();
        json!({
            "serial_number": camera.serial_number,
            "notifications_enabled": camera.notifications_enabled,
            "volume": camera.volume,
        })
    }

    /// Fetch a live thumbnail snapshot.
    ///
    /// Throttling (the host's thumbnail refresh interval) is the host's
    /// concern; every call here hits the cloud.
    pub async fn image(&self) -> Result<Vec<u8>, CoreError> {
        self.camera
            .account()
            .thumbnail(self.camera.serial())
            .await
    }

    /// Re-resolve the backing camera from the store.
    pub fn refresh(&self) {
        self.camera.refresh();
    }
}
