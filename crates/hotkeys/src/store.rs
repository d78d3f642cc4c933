//! Lazy, reactive loader for the hotkey configuration.
//!
//! The store is a single reactive cell (`tokio::sync::watch`) describing the
//! current load state, the active binding list and the last load error.
//! Transitions are `Idle → Loading → Ready` or `Idle → Loading → ReadyWithError`;
//! a reload re-enters `Loading` from either ready state.
//!
//! Loading never leaves the user without shortcuts: an empty result and a failed
//! fetch both settle on the default table, and only the error field differs.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::{FutureExt, future::BoxFuture};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::{BindingRecord, HotkeyGateway, Result, Translator, default_hotkeys};

/// Fallback message when a failed fetch renders as an empty string.
/// Load state of a [`BindingStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Never enabled; nothing fetched.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Configuration loaded (saved list or defaults).
    Ready,
    /// Fetch failed; defaults are active and `error` is set.
    ReadyWithError,
}

/// Point-in-time view of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Current load state.
    pub state: LoadState,
    /// Active configuration; `None` until the first load completes.
    pub hotkeys: Option<Arc<Vec<BindingRecord>>>,
    /// Message describing the most recent fetch failure.
    pub error: Option<String>,
}

impl StoreSnapshot {
    /// True while a fetch is in flight.
    pub fn loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// Shared state behind a [`BindingStore`] handle.
struct Inner {
    /// Persistence boundary.
    gateway: Arc<dyn HotkeyGateway>,
    /// Label lookup used when falling back to defaults.
    translate: RwLock<Translator>,
    /// Whether the consumer has signalled readiness.
    enabled: AtomicBool,
    /// The reactive cell.
    cell: watch::Sender<StoreSnapshot>,
}

/// Reactive loader for the hotkey configuration.
///
/// Cloning yields another handle onto the same cell. The store does not fetch
/// until [`BindingStore::set_enabled`] (or [`BindingStore::reload`]) is called.
#[derive(Clone)]
pub struct BindingStore {
    /// Shared cell and configuration.
    inner: Arc<Inner>,
}

/// Decide the active configuration for a fetch outcome.
///
/// Non-empty results are used as-is. Empty results and failures both yield the
/// default table; only a failure produces an error message.
pub(crate) fn settle(
    outcome: Result<Vec<BindingRecord>>,
    translate: &dyn Fn(&str) -> String,
) -> (Vec<BindingRecord>, Option<String>) {
    match outcome {
        Ok(list) if !list.is_empty() => (list, None),
        Ok(_) => {
            debug!("no saved hotkeys; using defaults");
            (default_hotkeys(translate), None)
        }
        Err(e) => {
            let msg = e.to_string();
            warn!(error = %msg, "hotkey fetch failed; using defaults");
            (default_hotkeys(translate), Some(msg))
        }
    }
}

impl BindingStore {
    /// Create an idle store over `gateway`.
    pub fn new(gateway: Arc<dyn HotkeyGateway>, translate: Translator) -> Self {
        let (cell, _rx) = watch::channel(StoreSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                gateway,
                translate: RwLock::new(translate),
                enabled: AtomicBool::new(false),
                cell,
            }),
        }
    }

    /// Current state of the cell.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.cell.borrow().clone()
    }

    /// Subscribe to changes of the cell.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.cell.subscribe()
    }

    /// Active configuration, if loaded.
    pub fn hotkeys(&self) -> Option<Arc<Vec<BindingRecord>>> {
        self.inner.cell.borrow().hotkeys.clone()
    }

    /// Whether the consumer has enabled loading.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Signal (or withdraw) readiness.
    ///
    /// Returns the load to drive when this call enables a previously disabled
    /// store; otherwise `None`.
    pub fn set_enabled(&self, enabled: bool) -> Option<BoxFuture<'static, ()>> {
        let was = self.inner.enabled.swap(enabled, Ordering::SeqCst);
        (enabled && !was).then(|| self.reload().boxed())
    }

    /// Replace the translator. Returns a reload when the store is enabled, so
    /// defaults pick up the new labels.
    pub fn set_translator(&self, translate: Translator) -> Option<BoxFuture<'static, ()>> {
        *self.inner.translate.write() = translate;
        self.is_enabled().then(|| self.reload().boxed())
    }

    /// Load the configuration. The cell enters `Loading` when the returned
    /// future is first polled and settles when it completes; a future dropped
    /// before polling leaves the cell untouched.
    ///
    /// The future holds only a weak reference to the store. If every handle is
    /// dropped before the fetch resolves, the result is discarded. Overlapping
    /// reloads are not coalesced; whichever completes last is what the cell shows.
    pub fn reload(&self) -> impl Future<Output = ()> + Send + 'static {
        let gateway = Arc::clone(&self.inner.gateway);
        let translate = Arc::clone(&*self.inner.translate.read());
        let owner = Arc::downgrade(&self.inner);
        async move {
            if let Some(inner) = owner.upgrade() {
                inner.cell.send_modify(|s| {
                    s.state = LoadState::Loading;
                    s.error = None;
                });
            }
            trace!("hotkey load started");
            let outcome = gateway.fetch_hotkeys().await;
            let Some(inner) = owner.upgrade() else {
                debug!("binding store dropped before fetch resolved; discarding result");
                return;
            };
            let (list, error) = settle(outcome, &*translate);
            let state = if error.is_some() {
                LoadState::ReadyWithError
            } else {
                LoadState::Ready
            };
            debug!(count = list.len(), ?state, "hotkey load settled");
            inner.cell.send_modify(|s| {
                s.state = state;
                s.hotkeys = Some(Arc::new(list));
                s.error = error;
            });
        }
    }

    /// Persist `list` through the gateway.
    ///
    /// The cell is not updated; call [`BindingStore::set_hotkeys`] or reload to
    /// reflect the save.
    pub async fn save(&self, list: &[BindingRecord]) -> Result<()> {
        let gateway = Arc::clone(&self.inner.gateway);
        match gateway.save_hotkeys(list).await {
            Ok(()) => {
                debug!(count = list.len(), "hotkeys saved");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "hotkey save failed");
                Err(e)
            }
        }
    }

    /// Replace the active configuration locally without touching the gateway.
    pub fn set_hotkeys(&self, list: Vec<BindingRecord>) {
        self.inner.cell.send_modify(|s| s.hotkeys = Some(Arc::new(list)));
    }
}
