//! Test support utilities: in-memory and controllable gateways.
//! These helpers are public so integration tests can use them via the
//! `test-utils` feature. They are intended for use by the test suite only.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};

use crate::{BindingRecord, Error, HotkeyGateway, Result};

/// Gateway holding the configuration in memory and counting calls.
#[derive(Default)]
pub struct MemoryGateway {
    /// Stored configuration.
    records: Mutex<Vec<BindingRecord>>,
    /// Fetch calls.
    fetches: AtomicUsize,
    /// Save calls.
    saves: AtomicUsize,
}

impl MemoryGateway {
    /// Gateway preloaded with `records`.
    pub fn with(records: Vec<BindingRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Current stored records.
    pub fn records(&self) -> Vec<BindingRecord> {
        self.records.lock().clone()
    }

    /// Number of fetch calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of save calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HotkeyGateway for MemoryGateway {
    async fn fetch_hotkeys(&self) -> Result<Vec<BindingRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records())
    }

    async fn save_hotkeys(&self, records: &[BindingRecord]) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}

/// Gateway whose every call fails with a backend error.
pub struct FailingGateway {
    /// Error text.
    message: String,
}

impl FailingGateway {
    /// Gateway failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl HotkeyGateway for FailingGateway {
    async fn fetch_hotkeys(&self) -> Result<Vec<BindingRecord>> {
        Err(Error::Backend(self.message.clone()))
    }

    async fn save_hotkeys(&self, _records: &[BindingRecord]) -> Result<()> {
        Err(Error::Backend(self.message.clone()))
    }
}

/// Gateway whose fetches stay pending until the test releases them.
///
/// Fetches are numbered in arrival order from 0.
#[derive(Default)]
pub struct GatedGateway {
    /// Reply channel per arrived fetch; `None` once released.
    pending: Mutex<Vec<Option<oneshot::Sender<Result<Vec<BindingRecord>>>>>>,
    /// Signalled on every arrival.
    arrived: Notify,
}

impl GatedGateway {
    /// Create a gateway with no pending fetches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until at least `n` fetches have arrived.
    pub async fn wait_for_fetches(&self, n: usize) {
        loop {
            let notified = self.arrived.notified();
            if self.pending.lock().len() >= n {
                return;
            }
            notified.await;
        }
    }

    /// Resolve fetch number `index` with `outcome`. Returns false if that
    /// fetch never arrived, was already released, or its caller went away.
    pub fn release(&self, index: usize, outcome: Result<Vec<BindingRecord>>) -> bool {
        let tx = self.pending.lock().get_mut(index).and_then(Option::take);
        tx.is_some_and(|tx| tx.send(outcome).is_ok())
    }
}

#[async_trait]
impl HotkeyGateway for GatedGateway {
    async fn fetch_hotkeys(&self) -> Result<Vec<BindingRecord>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(Some(tx));
        self.arrived.notify_waiters();
        rx.await.unwrap_or(Err(Error::Closed("gate")))
    }

    async fn save_hotkeys(&self, _records: &[BindingRecord]) -> Result<()> {
        Ok(())
    }
}
