// ── Update listener registry ──
//
// Entities register a zero-argument callback that fires after every
// successful roster refresh, synchronously and in registration order.
// Registration returns an RAII handle: dropping it unsubscribes, which
// is what entity teardown needs; `detach()` opts into account-lifetime
// registration instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

type EntryList = Mutex<Vec<(u64, Callback)>>;

pub(crate) struct ListenerRegistry {
    entries: Arc<EntryList>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a callback, returning the handle that owns the
    /// registration.
    pub(crate) fn register(&self, callback: impl Fn() + Send + Sync + 'static) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        ListenerHandle {
            id,
            entries: Arc::downgrade(&self.entries),
            detached: false,
        }
    }

    /// Invoke every registered callback, in registration order.
    ///
    /// Callbacks run outside the registry lock, so a callback may
    /// register or unsubscribe listeners; such changes take effect from
    /// the next notification.
    pub(crate) fn notify_all(&self) {
        let callbacks: Vec<Callback> = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

/// Owns one listener registration.
///
/// Dropping the handle removes the listener; [`detach`](Self::detach)
/// leaves it registered for the lifetime of the account.
#[must_use = "dropping the handle unsubscribes the listener"]
pub struct ListenerHandle {
    id: u64,
    entries: Weak<EntryList>,
    detached: bool,
}

impl ListenerHandle {
    /// Consume the handle, leaving the listener registered forever.
    pub fn detach(mut self) {
        self.detached = true;
    }

    /// Remove the listener now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(entries) = self.entries.upgrade() {
            entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("detached", &self.detached)
            .finish()
    }
}
