// Motion binary sensor backed by a camera's recording-active flag.

use std::sync::Arc;

use crate::account::Account;
use crate::listener::ListenerHandle;
use crate::model::Camera;

use super::{CameraRef, EntityHost};

/// Binary sensor that turns on while the camera records motion.
pub struct MotionSensor {
    camera: CameraRef,
    name: String,
    unique_id: String,
    _listener: ListenerHandle,
}

impl MotionSensor {
    /// Build the sensor and register it for update fan-out. Dropping the
    /// sensor unsubscribes it.
    pub fn new(account: &Account, camera: Arc<Camera>, host: Arc<dyn EntityHost>) -> Self {
        let name = format!("{} Motion", camera.name);
        let unique_id = format!("{}-Motion", camera.serial_number);

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

    pub fn device_class(&self) -> &'static str {
        "motion"
    }

    /// Entities poll nothing themselves; state arrives via the fan-out.
    pub fn should_poll(&self) -> bool {
        false
    }

    pub fn available(&self) -> bool {
        self.camera.current().online
    }

    /// Motion state from the last refresh.
    pub fn is_on(&self) -> bool {
        self.camera.current().recording_active
    }

    /// Re-resolve the backing camera from the store.
    pub fn refresh(&self) {
        self.camera.refresh();
    }
}
