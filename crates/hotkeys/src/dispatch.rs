use std::{collections::HashMap, fmt, sync::Arc};

use keycombo::{Combo, KeyInput};
use tracing::{trace, warn};

use crate::BindingRecord;

/// Zero-argument action callback.
pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// Caller-supplied mapping from action id to callback.
#[derive(Clone, Default)]
pub struct HotkeyHandlers {
    /// Callbacks keyed by action id.
    map: HashMap<String, Handler>,
}

impl HotkeyHandlers {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of `f` for action `id`.
    pub fn on(mut self, id: impl Into<String>, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.insert(id, Arc::new(f));
        self
    }

    /// Register `handler` for action `id`, replacing any previous handler.
    pub fn insert(&mut self, id: impl Into<String>, handler: Handler) {
        self.map.insert(id.into(), handler);
    }

    /// Handler registered for `id`.
    pub fn get(&self, id: &str) -> Option<&Handler> {
        self.map.get(id)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for HotkeyHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.map.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("HotkeyHandlers").field("ids", &ids).finish()
    }
}

/// Derived mapping from canonical combo to handler.
///
/// Built from scratch by [`build_dispatch_table`]; never patched in place.
#[derive(Clone, Default)]
pub struct DispatchTable {
    /// Callbacks keyed by canonical combo.
    map: HashMap<String, Handler>,
}

impl DispatchTable {
    /// Handler bound to the canonical `combo`.
    pub fn get(&self, combo: &str) -> Option<&Handler> {
        self.map.get(combo)
    }

    /// Handler matching a live event, if any.
    pub fn lookup(&self, event: &KeyInput) -> Option<&Handler> {
        let combo = event.combo()?;
        self.map.get(&combo.to_string_canonical())
    }

    /// Bound combos, sorted.
    pub fn combos(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.map.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("combos", &self.combos())
            .finish()
    }
}

/// Derive the live dispatch table from a binding list and handler set.
///
/// Records are visited in list order. Unbound records, records without a
/// registered handler, and records whose combo cannot match a live event are
/// skipped. When two records normalize to the same combo the later one wins.
/// A `None` list (configuration not loaded yet) yields an empty table.
pub fn build_dispatch_table(
    hotkeys: Option<&[BindingRecord]>,
    handlers: &HotkeyHandlers,
) -> DispatchTable {
    let mut map = HashMap::new();
    let Some(hotkeys) = hotkeys else {
        return DispatchTable { map };
    };
    for rec in hotkeys {
        if !rec.is_bound() {
            continue;
        }
        let Some(handler) = handlers.get(&rec.id) else {
            continue;
        };
        let combo = Combo::parse_lossy(&rec.value);
        if !combo.is_actionable() {
            warn!(id = %rec.id, value = %rec.value, "skipping unparseable hotkey");
            continue;
        }
        let key = combo.to_string_canonical();
        if map.insert(key.clone(), Arc::clone(handler)).is_some() {
            trace!(combo = %key, id = %rec.id, "later binding overrides earlier one");
        }
    }
    DispatchTable { map }
}

/// Memoized [`build_dispatch_table`] keyed by the identity of its inputs.
///
/// Returns the same `Arc<DispatchTable>` for as long as the binding list and
/// handler set are the same allocations, and rebuilds when either changes.
#[derive(Default)]
pub struct DispatchMemo {
    /// Inputs and output of the last derivation.
    last: Option<MemoEntry>,
}

/// One cached derivation.
struct MemoEntry {
    /// Binding list the table was built from.
    hotkeys: Option<Arc<Vec<BindingRecord>>>,
    /// Handler set the table was built from.
    handlers: Arc<HotkeyHandlers>,
    /// The derived table.
    table: Arc<DispatchTable>,
}

impl MemoEntry {
    /// Whether both inputs are the allocations this entry was built from.
    fn matches(
        &self,
        hotkeys: Option<&Arc<Vec<BindingRecord>>>,
        handlers: &Arc<HotkeyHandlers>,
    ) -> bool {
        let same_list = match (&self.hotkeys, hotkeys) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_list && Arc::ptr_eq(&self.handlers, handlers)
    }
}

impl DispatchMemo {
    /// Create an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for these inputs, rebuilt only when an input changed identity.
    pub fn get(
        &mut self,
        hotkeys: Option<&Arc<Vec<BindingRecord>>>,
        handlers: &Arc<HotkeyHandlers>,
    ) -> Arc<DispatchTable> {
        if let Some(entry) = &self.last
            && entry.matches(hotkeys, handlers)
        {
            return Arc::clone(&entry.table);
        }
        let table = Arc::new(build_dispatch_table(
            hotkeys.map(|l| l.as_slice()),
            handlers,
        ));
        self.last = Some(MemoEntry {
            hotkeys: hotkeys.cloned(),
            handlers: Arc::clone(handlers),
            table: Arc::clone(&table),
        });
        table
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Handler) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&n);
        let h: Handler = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (n, h)
    }

    fn one_binding() -> Vec<BindingRecord> {
        vec![BindingRecord::new("a", "Ctrl+K")]
    }

    #[test]
    fn maps_canonical_combo_to_handler() {
        let (_, fa) = counter();
        let mut handlers = HotkeyHandlers::new();
        handlers.insert("a", Arc::clone(&fa));
        let table = build_dispatch_table(Some(one_binding().as_slice()), &handlers);
        let got = table.get("ctrl+k").expect("bound");
        assert!(Arc::ptr_eq(got, &fa));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_combo_last_record_wins() {
        let (_, fa) = counter();
        let (_, fb) = counter();
        let mut handlers = HotkeyHandlers::new();
        handlers.insert("a", Arc::clone(&fa));
        handlers.insert("b", Arc::clone(&fb));
        let list = vec![BindingRecord::new("a", "Ctrl+K"), BindingRecord::new("b", "ctrl+k")];
        let table = build_dispatch_table(Some(list.as_slice()), &handlers);
        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(table.get("ctrl+k").expect("bound"), &fb));
    }

    #[test]
    fn not_loaded_yields_empty_table() {
        let handlers = HotkeyHandlers::new().on("a", || {});
        assert!(build_dispatch_table(None, &handlers).is_empty());
    }

    #[test]
    fn skips_unbound_unhandled_and_malformed() {
        let handlers = HotkeyHandlers::new()
            .on("a", || {})
            .on("b", || {})
            .on("c", || {});
        let list = vec![
            BindingRecord::new("a", ""),
            BindingRecord::new("b", "ctrl+bogus"),
            BindingRecord::new("c", "alt+x"),
            BindingRecord::new("unhandled", "ctrl+u"),
        ];
        let table = build_dispatch_table(Some(list.as_slice()), &handlers);
        assert_eq!(table.combos(), vec!["alt+x"]);
    }

    #[test]
    fn lookup_by_event() {
        let (n, fa) = counter();
        let mut handlers = HotkeyHandlers::new();
        handlers.insert("a", fa);
        let table = build_dispatch_table(Some(one_binding().as_slice()), &handlers);
        let ev = KeyInput::new("K").with(keycombo::Modifier::Ctrl);
        (table.lookup(&ev).expect("match"))();
        assert_eq!(n.load(Ordering::SeqCst), 1);
        assert!(table.lookup(&KeyInput::new("k")).is_none());
    }

    #[test]
    fn memo_rebuilds_only_on_identity_change() {
        let mut memo = DispatchMemo::new();
        let list = Arc::new(one_binding());
        let handlers = Arc::new(HotkeyHandlers::new().on("a", || {}));

        let t1 = memo.get(Some(&list), &handlers);
        let t2 = memo.get(Some(&list), &handlers);
        assert!(Arc::ptr_eq(&t1, &t2));

        // Equal content, new allocation: rebuilt.
        let list2 = Arc::new(one_binding());
        let t3 = memo.get(Some(&list2), &handlers);
        assert!(!Arc::ptr_eq(&t2, &t3));

        let handlers2 = Arc::new(HotkeyHandlers::new().on("a", || {}));
        let t4 = memo.get(Some(&list2), &handlers2);
        assert!(!Arc::ptr_eq(&t3, &t4));

        let t5 = memo.get(None, &handlers2);
        assert!(t5.is_empty());
    }
}
