// ── Entity layer ──
//
// Host-framework-facing views over the camera roster: a motion binary
// sensor, a light switch, a notifications switch, and a camera. Entities
// are passive -- they cache the camera snapshot from the last refresh and
// ask the host to re-render when the account's update fan-out fires.
//
// The host side of the contract is the `EntityHost` capability trait, so
// any automation framework can adapt these without a framework-specific
// dependency here.

pub mod camera;
pub mod light;
pub mod motion;
pub mod notifications;

pub use camera::CameraEntity;
pub use light::LightSwitch;
pub use motion::MotionSensor;
pub use notifications::NotificationsSwitch;

use std::sync::{Arc, RwLock};

use tracing::error;

use crate::account::Account;
use crate::model::Camera;

/// Capability surface a host automation framework provides to entities.
pub trait EntityHost: Send + Sync {
    /// Ask the host to refresh and re-render the entity with the given
    /// unique id. Called from the account's synchronous update fan-out;
    /// implementations should queue work, not block.
    fn schedule_update(&self, unique_id: &str);
}

/// Shared entity plumbing: the account, the stable serial key, and the
/// cached camera snapshot from the last refresh.
pub(crate) struct CameraRef {
    account: Account,
    serial: String,
    camera: RwLock<Arc<Camera>>,
}

impl CameraRef {
    pub(crate) fn new(account: Account, camera: Arc<Camera>) -> Self {
        Self {
            account,
            serial: camera.serial_number.clone(),
            camera: RwLock::new(camera),
        }
    }

    pub(crate) fn account(&self) -> &Account {
        &self.account
    }

    pub(crate) fn serial(&self) -> &str {
        &self.serial
    }

    /// The snapshot from the last refresh.
    pub(crate) fn current(&self) -> Arc<Camera> {
        self.camera
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Re-resolve the camera from the store.
    ///
    /// A camera that has left the account is logged and the stale
    /// snapshot kept -- the entity keeps rendering its last-known state
    /// until the roster lists the camera again.
    pub(crate) fn refresh(&self) {
        match self.account.camera(&self.serial) {
            Some(camera) => {
                *self
                    .camera
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner) = camera;
            }
            None => {
                error!(
                    serial = %self.serial,
                    "update failed: camera no longer in the account?"
                );
            }
        }
    }
}
