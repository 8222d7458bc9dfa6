// ── Reactive camera store ──
//
// Concurrent storage for the account's camera roster, keyed by serial
// number. Each poll replaces the roster wholesale; mutations rebuild an
// `Arc` snapshot broadcast to subscribers via a `watch` channel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::Camera;

/// Concurrent, reactive storage for the camera roster.
///
/// Reads are wait-free snapshots; writes use `DashMap`'s per-shard locks.
/// The roster is replaced wholesale on every account refresh -- there is
/// no incremental merge, so the key set always equals exactly the serial
/// set of the most recent listing.
pub struct CameraStore {
    by_serial: DashMap<String, Arc<Camera>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<Camera>>>>,
}

impl CameraStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_serial: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Replace the entire roster with a fresh listing.
    ///
    /// Cameras absent from `cameras` are removed; nothing from the
    /// previous cycle survives. One snapshot rebuild covers the whole
    /// replacement.
    pub(crate) fn replace_all(&self, cameras: Vec<Camera>) {
        self.by_serial.clear();
        for camera in cameras {
            self.by_serial
                .insert(camera.serial_number.clone(), Arc::new(camera));
        }
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Insert or refresh a single camera (single-camera live fetch).
    pub(crate) fn upsert(&self, camera: Camera) {
        self.by_serial
            .insert(camera.serial_number.clone(), Arc::new(camera));
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Look up a camera by serial number.
    ///
    /// `None` means the camera has left the account since the caller last
    /// saw it -- callers decide whether that is an error.
    pub fn get(&self, serial: &str) -> Option<Arc<Camera>> {
        self.by_serial.get(serial).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<Camera>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Camera>>>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_serial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_serial.is_empty()
    }

    /// All serial numbers currently in the roster.
    pub fn serials(&self) -> Vec<String> {
        self.by_serial.iter().map(|r| r.key().clone()).collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all cameras into a snapshot vec and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Camera>> = self
            .by_serial
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for CameraStore {
    fn default() -> Self {
        Self::new()
    }
}
