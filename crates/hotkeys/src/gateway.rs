use async_trait::async_trait;
use tracing::debug;

use crate::{BindingRecord, JsonStore, Result};

/// Store key under which the hotkey list is persisted.
pub const HOTKEYS_KEY: &str = "hotkeys";

// ---- Configuration gateway abstraction ----

/// Load/save boundary for the hotkey configuration.
///
/// Implementations choose the transport (local file, RPC, ...). Failures are
/// reported as `Err` and are never retried here; retry policy belongs to the
/// caller.
#[async_trait]
pub trait HotkeyGateway: Send + Sync {
    /// Return the last saved configuration, or an empty list if none exists.
    async fn fetch_hotkeys(&self) -> Result<Vec<BindingRecord>>;

    /// Persist `records` as the whole configuration, replacing any prior
    /// value. An empty list clears every binding.
    async fn save_hotkeys(&self, records: &[BindingRecord]) -> Result<()>;
}

/// Gateway backed by the shell's JSON key-value store.
#[derive(Debug, Clone)]
pub struct StoreGateway {
    /// Underlying key-value store.
    store: JsonStore,
}

impl StoreGateway {
    /// Wrap an existing store.
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &JsonStore {
        &self.store
    }
}

#[async_trait]
impl HotkeyGateway for StoreGateway {
    async fn fetch_hotkeys(&self) -> Result<Vec<BindingRecord>> {
        let list: Vec<BindingRecord> = self.store.get(HOTKEYS_KEY).await?.unwrap_or_default();
        debug!(count = list.len(), "fetched hotkeys");
        Ok(list)
    }

    async fn save_hotkeys(&self, records: &[BindingRecord]) -> Result<()> {
        self.store.set(HOTKEYS_KEY, records).await?;
        debug!(count = records.len(), "saved hotkeys");
        Ok(())
    }
}
