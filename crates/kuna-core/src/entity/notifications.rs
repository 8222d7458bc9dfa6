// Notifications switch backed by the owner's per-camera toggle.

use std::sync::Arc;

use crate::account::Account;
use crate::error::CoreError;
use crate::listener::ListenerHandle;
use crate::model::Camera;

use super::{CameraRef, EntityHost};

/// Switch that toggles motion notifications for the owning user.
pub struct NotificationsSwitch {
    camera: CameraRef,
    name: String,
    unique_id: String,
    _listener: ListenerHandle,
}

impl NotificationsSwitch {
    /// Build the switch and register it for update fan-out. Dropping the
    /// switch unsubscribes it.
    pub fn new(account: &Account, camera: Arc<Camera>, host: Arc<dyn EntityHost>) -> Self {
        let name = format!("{} Notifications", camera.name);
        let unique_id = format!("{}-Notifications", camera.serial_number);

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

    pub fn should_poll(&self) -> bool {
        false
    }

    pub fn available(&self) -> bool {
        self.camera.current().online
    }

    /// Notification state from the last refresh.
    pub fn is_on(&self) -> bool {
        self.camera.current().notifications_enabled
    }

    /// Enable notifications, then refresh the roster.
    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.camera
            .account()
            .set_notifications(self.camera.serial(), true)
            .await?;
        self.camera.account().update().await
    }

    /// Disable notifications, then refresh the roster.
    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.camera
            .account()
            .set_notifications(self.camera.serial(), false)
            .await?;
        self.camera.account().update().await
    }

    /// Re-resolve the backing camera from the store.
    pub fn refresh(&self) {
        self.camera.refresh();
    }
}
