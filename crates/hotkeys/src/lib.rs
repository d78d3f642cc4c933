//! Hotkeys
//!
//! The hotkeys crate owns the configurable keyboard shortcuts of the profile
//! shell:
//! - persisted binding records and the built-in default table
//! - a lazy, reactive [`BindingStore`] that loads configuration through a
//!   [`HotkeyGateway`] and falls back to defaults on empty or failed loads
//! - the pure [`build_dispatch_table`] derivation from bindings + handlers
//! - the [`HotkeyBinder`], which keeps exactly one listener attached to an
//!   [`InputSurface`] and swaps it whenever the dispatch table changes
//! - the request/acknowledge shapes the `toggle-run` action sends to the
//!   scheduler
//!
//! Combo parsing and canonicalization live in the `keycombo` crate and are
//! re-exported here for convenience.

mod action;
mod binder;
mod defaults;
mod dispatch;
mod error;
mod gateway;
mod record;
mod scheduler;
mod storage;
mod store;
mod surface;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use action::Action;
pub use binder::{HotkeyBinder, HotkeyScope};
pub use defaults::{Translator, default_hotkeys, identity_translator};
pub use dispatch::{DispatchMemo, DispatchTable, Handler, HotkeyHandlers, build_dispatch_table};
pub use error::{Error, Result};
pub use gateway::{HOTKEYS_KEY, HotkeyGateway, StoreGateway};
pub use keycombo::{Combo, KeyInput, Modifier, event_to_combo, normalize_combo};
pub use record::{BindingRecord, rebind};
pub use scheduler::{
    RunControls, SchedulerAck, SchedulerClient, SchedulerCommand, SchedulerRequest, Trigger,
};
pub use storage::{DEFAULT_STORE_FILE, JsonStore, STORE_ENV, default_store_path};
pub use store::{BindingStore, LoadState, StoreSnapshot};
pub use surface::{InputSurface, Listener, ListenerGuard};
