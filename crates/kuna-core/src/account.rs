// ── Account abstraction ──
//
// Full lifecycle management for one Kuna account: authentication with
// transparent token refresh, roster polling with listener fan-out,
// recording scans with event broadcast, and write-through mutators for
// the entity layer.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use kuna_api::transport::TransportConfig;
use kuna_api::{ApiClient, CameraPatch};

use crate::config::AccountConfig;
use crate::convert::recording_from_api;
use crate::error::CoreError;
use crate::event::{CATEGORY_RECORDING, RecordingEvent};
use crate::listener::{ListenerHandle, ListenerRegistry};
use crate::model::Camera;
use crate::store::CameraStore;

const EVENT_CHANNEL_SIZE: usize = 256;

/// The authentication call is time-bounded independently of the request
/// timeout; a hung login must not wedge the refresh cycle.
const AUTH_TIMEOUT: Duration = Duration::from_secs(30);

// ── Account ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<AccountInner>`. Owns the API client, the
/// reactive camera store, the update-listener registry, and the recording
/// event channel. Timer-driven consumers call [`update`](Self::update) and
/// [`scan_for_recordings`](Self::scan_for_recordings) directly, or let
/// [`start`](Self::start) drive both on the configured intervals.
#[derive(Clone)]
pub struct Account {
    inner: Arc<AccountInner>,
}

struct AccountInner {
    config: AccountConfig,
    client: ApiClient,
    store: CameraStore,
    listeners: ListenerRegistry,
    event_tx: broadcast::Sender<Arc<RecordingEvent>>,
    /// Single-flight guard: overlapping cycles that both hit a 403 must
    /// not race each other through the token exchange.
    auth_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Account {
    /// Create a new Account from configuration. Does NOT authenticate --
    /// call [`authenticate()`](Self::authenticate) before polling.
    pub fn new(config: AccountConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = ApiClient::with_base_url(config.base_url.clone(), &transport)?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(AccountInner {
                config,
                client,
                store: CameraStore::new(),
                listeners: ListenerRegistry::new(),
                event_tx,
                auth_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the account configuration.
    pub fn config(&self) -> &AccountConfig {
        &self.inner.config
    }

    /// Access the underlying camera store.
    pub fn store(&self) -> &CameraStore {
        &self.inner.store
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Exchange the configured credentials for a bearer token.
    ///
    /// Single-flight per account: concurrent callers queue on the auth
    /// lock and the losers simply run with the fresh token. Time-bounded
    /// by [`AUTH_TIMEOUT`].
    pub async fn authenticate(&self) -> Result<(), CoreError> {
        let _guard = self.inner.auth_lock.lock().await;

        let config = &self.inner.config;
        match tokio::time::timeout(
            AUTH_TIMEOUT,
            self.inner.client.authenticate(&config.email, &config.password),
        )
        .await
        {
            Ok(Ok(())) => {
                info!("authenticated with the Kuna cloud");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(CoreError::AuthenticationTimeout {
                timeout_secs: AUTH_TIMEOUT.as_secs(),
            }),
        }
    }

    // ── Roster refresh ───────────────────────────────────────────────

    /// Refresh the camera roster and fan out change notifications.
    ///
    /// The roster is replaced wholesale from a fresh listing; listeners
    /// run synchronously, in registration order, after the store is
    /// updated. A rejected token triggers one re-authentication instead
    /// -- that cycle's listing is lost and the next timer tick retries.
    pub async fn update(&self) -> Result<(), CoreError> {
        debug!("refreshing camera roster");

        match self.inner.client.list_cameras().await {
            Ok(raw) => {
                let cameras: Vec<Camera> = raw.into_iter().map(Camera::from).collect();
                self.inner.store.replace_all(cameras);
                debug!(cameras = self.inner.store.len(), "roster refresh complete");
                self.inner.listeners.notify_all();
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                warn!("authorization rejected during roster refresh; refreshing token");
                self.authenticate().await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Re-fetch one camera's live state and refresh it in the store.
    pub async fn refresh_camera(&self, serial: &str) -> Result<Arc<Camera>, CoreError> {
        let raw = self.inner.client.get_camera(serial).await?;
        let camera = Camera::from(raw);
        self.inner.store.upsert(camera);
        self.inner
            .store
            .get(serial)
            .ok_or_else(|| CoreError::CameraNotFound {
                serial: serial.to_owned(),
            })
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Look up a camera by serial number.
    ///
    /// `None` means the camera has left the account since the last poll.
    pub fn camera(&self, serial: &str) -> Option<Arc<Camera>> {
        self.inner.store.get(serial)
    }

    /// Snapshot of the current roster.
    pub fn cameras_snapshot(&self) -> Arc<Vec<Arc<Camera>>> {
        self.inner.store.snapshot()
    }

    pub fn camera_count(&self) -> usize {
        self.inner.store.len()
    }

    /// Fetch a live thumbnail for a camera.
    pub async fn thumbnail(&self, serial: &str) -> Result<Vec<u8>, CoreError> {
        Ok(self.inner.client.get_thumbnail(serial).await?)
    }

    // ── Mutators (write through to the cloud) ────────────────────────

    /// Apply a partial property update to a camera.
    pub async fn set_property(&self, serial: &str, patch: &CameraPatch) -> Result<(), CoreError> {
        Ok(self.inner.client.set_camera_properties(serial, patch).await?)
    }

    /// Toggle the light bulb.
    pub async fn set_light(&self, serial: &str, on: bool) -> Result<(), CoreError> {
        Ok(self.inner.client.set_light(serial, on).await?)
    }

    pub async fn light_on(&self, serial: &str) -> Result<(), CoreError> {
        self.set_light(serial, true).await
    }

    pub async fn light_off(&self, serial: &str) -> Result<(), CoreError> {
        self.set_light(serial, false).await
    }

    /// Set the speaker volume (0..=100).
    pub async fn set_volume(&self, serial: &str, volume: u8) -> Result<(), CoreError> {
        let patch = CameraPatch {
            volume: Some(i64::from(volume)),
            ..CameraPatch::default()
        };
        self.set_property(serial, &patch).await
    }

    /// Set the light brightness.
    pub async fn set_brightness(&self, serial: &str, brightness: u8) -> Result<(), CoreError> {
        let patch = CameraPatch {
            brightness: Some(i64::from(brightness)),
            ..CameraPatch::default()
        };
        self.set_property(serial, &patch).await
    }

    /// Toggle the status LED.
    pub async fn set_status_led(&self, serial: &str, on: bool) -> Result<(), CoreError> {
        let patch = CameraPatch {
            led_mask: Some(on),
            ..CameraPatch::default()
        };
        self.set_property(serial, &patch).await
    }

    /// Toggle motion notifications for one camera.
    ///
    /// The toggle targets a per-user sub-resource keyed by the owner's
    /// email, resolved from the camera's last snapshot.
    pub async fn set_notifications(&self, serial: &str, enabled: bool) -> Result<(), CoreError> {
        let camera = self
            .camera(serial)
            .ok_or_else(|| CoreError::CameraNotFound {
                serial: serial.to_owned(),
            })?;
        let owner_email = camera
            .owner_email
            .as_deref()
            .ok_or_else(|| CoreError::OwnerUnknown {
                serial: serial.to_owned(),
            })?;

        Ok(self
            .inner
            .client
            .set_notifications(serial, owner_email, enabled)
            .await?)
    }

    /// Toggle motion notifications for every camera on the account.
    ///
    /// Per-camera failures are logged and skipped; one camera's error
    /// never blocks the rest.
    pub async fn set_all_notifications(&self, enabled: bool) {
        for camera in self.cameras_snapshot().iter() {
            if let Err(e) = self.set_notifications(&camera.serial_number, enabled).await {
                error!(
                    serial = %camera.serial_number,
                    error = %e,
                    "failed to toggle notifications"
                );
            }
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a callback invoked after every successful roster refresh.
    ///
    /// Callbacks run synchronously, in registration order. Drop the
    /// returned handle to unsubscribe, or `detach()` it to keep the
    /// listener for the account's lifetime.
    pub fn add_update_listener(
        &self,
        listener: impl Fn() + Send + Sync + 'static,
    ) -> ListenerHandle {
        self.inner.listeners.register(listener)
    }

    /// Subscribe to the recording event broadcast stream.
    pub fn recording_events(&self) -> broadcast::Receiver<Arc<RecordingEvent>> {
        self.inner.event_tx.subscribe()
    }

    // ── Recording scan ───────────────────────────────────────────────

    /// Scan every camera for recordings in the trailing window and emit
    /// one event per recording whose download link resolves.
    ///
    /// Cameras are processed sequentially. A camera whose listing fails
    /// is skipped with a log; a recording whose link cannot be resolved
    /// is dropped with a log. Neither stops the scan for the rest -- only
    /// a rejected token aborts the cycle, since nothing else would
    /// succeed either.
    pub async fn scan_for_recordings(&self) -> Result<(), CoreError> {
        debug!("scanning for recordings");
        let window = self.recording_window();

        for camera in self.cameras_snapshot().iter() {
            let serial = camera.serial_number.as_str();

            let recordings = match self.inner.client.recordings_within(serial, window).await {
                Ok(recordings) => recordings,
                Err(e) if e.is_unauthorized() => return Err(e.into()),
                Err(e) => {
                    error!(serial, error = %e, "recording scan failed for camera");
                    continue;
                }
            };

            for raw in recordings {
                let url = match self.inner.client.get_download_link(&raw).await {
                    Ok(url) => url,
                    Err(e) => {
                        error!(
                            serial,
                            recording = raw.id,
                            error = %e,
                            "failed to resolve recording download link"
                        );
                        continue;
                    }
                };

                let recording = recording_from_api(raw, serial);
                let Some(owner) = self.inner.store.get(&recording.serial_number) else {
                    error!(
                        serial = %recording.serial_number,
                        "recording references a camera no longer in the account"
                    );
                    continue;
                };

                let event = RecordingEvent {
                    category: CATEGORY_RECORDING,
                    camera_name: owner.name.clone(),
                    serial_number: recording.serial_number,
                    label: recording.label,
                    timestamp: recording.timestamp,
                    duration_secs: recording.duration_secs,
                    url,
                };
                let _ = self.inner.event_tx.send(Arc::new(event));
            }
        }

        Ok(())
    }

    /// The trailing window each scan looks back over.
    pub fn recording_window(&self) -> TimeDelta {
        TimeDelta::seconds(i64::try_from(self.inner.config.recording_scan_secs).unwrap_or(i64::MAX))
    }

    // ── Background driving ───────────────────────────────────────────

    /// Spawn the periodic roster refresh and recording scan tasks.
    ///
    /// Either interval set to 0 disables that task. The first recording
    /// scan runs immediately (startup catch-up); roster refreshes start
    /// after one full interval.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;

        let update_secs = self.inner.config.update_interval_secs;
        if update_secs > 0 {
            let account = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(update_task(account, update_secs, cancel)));
        }

        let scan_secs = self.inner.config.recording_scan_secs;
        if scan_secs > 0 {
            let account = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(scan_task(account, scan_secs, cancel)));
        }
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("background tasks stopped");
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodically refresh the camera roster.
async fn update_task(account: Account, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = account.update().await {
                    warn!(error = %e, "periodic roster refresh failed");
                }
            }
        }
    }
}

/// Periodically scan for new recordings. The interval's immediate first
/// tick doubles as the startup scan.
async fn scan_task(account: Account, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = account.scan_for_recordings().await {
                    warn!(error = %e, "recording scan failed");
                }
            }
        }
    }
}
