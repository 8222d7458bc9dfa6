// Light switch backed by a camera's bulb.

use std::sync::Arc;

use crate::account::Account;
use crate::error::CoreError;
use crate::listener::ListenerHandle;
use crate::model::Camera;

use super::{CameraRef, EntityHost};

/// Switch that toggles the camera's light bulb.
pub struct LightSwitch {
    camera: CameraRef,
    name: String,
    unique_id: String,
    _listener: ListenerHandle,
}

impl LightSwitch {
    /// Build the switch and register it for update fan-out. Dropping the
    /// switch unsubscribes it.
    pub fn new(account: &Account, camera: Arc<Camera>, host: Arc<dyn EntityHost>) -> Self {
        let name = format!("{} Switch", camera.name);
        let unique_id = format!("{}-Switch", camera.serial_number);

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

    /// Bulb state from the last refresh.
    pub fn is_on(&self) -> bool {
        self.camera.current().light_on
    }

    /// Turn the bulb on, then refresh the roster so every entity sees
    /// the new state.
    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.camera.account().light_on(self.camera.serial()).await?;
        self.camera.account().update().await
    }

    /// Turn the bulb off, then refresh the roster.
    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.camera.account().light_off(self.camera.serial()).await?;
        self.camera.account().update().await
    }

    /// Re-resolve the backing camera from the store.
    pub fn refresh(&self) {
        self.camera.refresh();
    }
}
