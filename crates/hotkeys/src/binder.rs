use std::sync::Arc;

use keycombo::KeyInput;
use tracing::{debug, trace};

use crate::{
    BindingRecord, DispatchMemo, DispatchTable, HotkeyHandlers, InputSurface, ListenerGuard,
};

/// Keeps exactly one key listener attached for the current dispatch table.
///
/// Binding a new table detaches the previous listener before attaching the
/// next one. Dropping the binder detaches unconditionally, including during
/// unwinding. Handler panics are not caught.
pub struct HotkeyBinder {
    /// Surface listeners attach to.
    surface: InputSurface,
    /// Table currently bound, with the guard keeping its listener attached.
    current: Option<(Arc<DispatchTable>, ListenerGuard)>,
    /// Skip OS auto-repeat events.
    ignore_repeat: bool,
}

impl HotkeyBinder {
    /// Create an unbound binder for `surface`.
    pub fn new(surface: InputSurface) -> Self {
        Self {
            surface,
            current: None,
            ignore_repeat: false,
        }
    }

    /// Skip auto-repeated events before matching. Applies from the next bind.
    pub fn ignore_repeat(mut self, ignore: bool) -> Self {
        self.ignore_repeat = ignore;
        self
    }

    /// Bind `table`. A no-op when the same table is already bound.
    pub fn bind(&mut self, table: Arc<DispatchTable>) {
        if let Some((cur, _)) = &self.current
            && Arc::ptr_eq(cur, &table)
        {
            return;
        }
        // Detach first so two listeners are never live at once.
        self.current = None;
        let ignore_repeat = self.ignore_repeat;
        let bound = Arc::clone(&table);
        let guard = self.surface.add_listener(Arc::new(move |event: &mut KeyInput| {
            if ignore_repeat && event.repeat {
                return;
            }
            let Some(handler) = bound.lookup(event) else {
                return;
            };
            trace!(key = %event.key, "hotkey matched");
            event.prevent_default();
            handler();
        }));
        debug!(combos = ?table.combos(), "hotkeys bound");
        self.current = Some((table, guard));
    }

    /// Detach the listener, if any.
    pub fn unbind(&mut self) {
        if self.current.take().is_some() {
            debug!("hotkeys unbound");
        }
    }

    /// The currently bound table.
    pub fn table(&self) -> Option<&Arc<DispatchTable>> {
        self.current.as_ref().map(|(t, _)| t)
    }
}

/// A screen's hotkey registration: derives the dispatch table from the
/// current bindings and handlers and keeps it bound.
///
/// Call [`HotkeyScope::update`] whenever either input may have changed; the
/// binder is only touched when the derived table changes identity.
pub struct HotkeyScope {
    /// Memoized derivation.
    memo: DispatchMemo,
    /// Live listener.
    binder: HotkeyBinder,
}

impl HotkeyScope {
    /// Create a scope on `surface`. Nothing is bound until the first update.
    pub fn new(surface: InputSurface) -> Self {
        Self::with_binder(HotkeyBinder::new(surface))
    }

    /// Create a scope around a configured binder.
    pub fn with_binder(binder: HotkeyBinder) -> Self {
        Self {
            memo: DispatchMemo::new(),
            binder,
        }
    }

    /// Re-derive and rebind for the given inputs.
    pub fn update(
        &mut self,
        hotkeys: Option<&Arc<Vec<BindingRecord>>>,
        handlers: &Arc<HotkeyHandlers>,
    ) {
        let table = self.memo.get(hotkeys, handlers);
        self.binder.bind(table);
    }

    /// The currently bound table.
    pub fn table(&self) -> Option<&Arc<DispatchTable>> {
        self.binder.table()
    }
}
