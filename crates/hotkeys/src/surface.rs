//! The global key-event surface listeners attach to.

use std::sync::{Arc, Weak};

use keycombo::KeyInput;
use parking_lot::Mutex;
use tracing::trace;

/// A key-event listener. May call [`KeyInput::prevent_default`].
pub type Listener = Arc<dyn Fn(&mut KeyInput) + Send + Sync>;

/// Registry of attached listeners.
#[derive(Default)]
struct Listeners {
    /// Monotonic id source.
    next_id: u64,
    /// Attached listeners in attach order.
    entries: Vec<(u64, Listener)>,
}

/// Window-wide source of keyboard events.
///
/// Every event delivered through [`InputSurface::dispatch`] reaches every
/// attached listener in attach order.
#[derive(Clone, Default)]
pub struct InputSurface {
    /// Shared registry.
    inner: Arc<Mutex<Listeners>>,
}

/// Keeps a listener attached; detaches it on drop.
#[must_use = "dropping the guard detaches the listener"]
pub struct ListenerGuard {
    /// Surface the listener is attached to.
    surface: Weak<Mutex<Listeners>>,
    /// Registration id.
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.surface.upgrade() {
            inner.lock().entries.retain(|(id, _)| *id != self.id);
            trace!(id = self.id, "listener detached");
        }
    }
}

impl InputSurface {
    /// Create a surface with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` until the returned guard is dropped.
    pub fn add_listener(&self, listener: Listener) -> ListenerGuard {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.push((id, listener));
        trace!(id, total = inner.entries.len(), "listener attached");
        ListenerGuard {
            surface: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Deliver `event` to every listener and return it, so the caller can see
    /// whether default handling was prevented.
    ///
    /// Listeners run outside the registry lock, so they may attach or detach
    /// listeners; such changes take effect from the next event.
    pub fn dispatch(&self, mut event: KeyInput) -> KeyInput {
        let listeners: Vec<Listener> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(&mut event);
        }
        event
    }
}
