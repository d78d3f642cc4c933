//! One-shot commands: inspect and edit the stored bindings.

use std::io::Write;

use hotkeys::{
    Action, BindingRecord, BindingStore, Combo, StoreSnapshot, Translator, default_hotkeys,
    normalize_combo, rebind,
};
use tracing::info;

use crate::{
    error::{Error, Result},
    i18n,
};

/// Shown in place of an empty combo.
const UNBOUND: &str = "(unbound)";

/// Enable the store and wait for its first load to settle.
async fn load(store: &BindingStore) -> StoreSnapshot {
    if let Some(load) = store.set_enabled(true) {
        load.await;
    }
    store.snapshot()
}

/// Display label for a record: its own, else the English action label.
fn label_of(record: &BindingRecord) -> String {
    match &record.label {
        Some(l) => l.clone(),
        None => record
            .id
            .parse::<Action>()
            .map(|a| i18n::lookup(a.label_key()))
            .unwrap_or_default(),
    }
}

/// Print one line per record: id, canonical combo, label.
pub fn write_table(out: &mut impl Write, records: &[BindingRecord]) -> Result<()> {
    for r in records {
        let combo = r.combo();
        let combo = if combo.is_empty() { UNBOUND } else { combo.as_str() };
        writeln!(out, "{:<14} {:<22} {}", r.id, combo, label_of(r))?;
    }
    Ok(())
}

/// `show`: print the effective bindings.
pub async fn show(store: &BindingStore, out: &mut impl Write) -> Result<()> {
    let snap = load(store).await;
    let records = snap.hotkeys.as_deref().map(Vec::as_slice).unwrap_or_default();
    write_table(out, records)?;
    if let Some(err) = &snap.error {
        writeln!(out, "warning: {err}; showing built-in bindings")?;
    }
    Ok(())
}

/// `set`: bind `action` to `combo` and save the whole list.
///
/// Refuses to save when the stored configuration failed to load, so a
/// transient read error never overwrites it with defaults.
pub async fn set(
    store: &BindingStore,
    action: Action,
    combo: &str,
    out: &mut impl Write,
) -> Result<()> {
    let snap = load(store).await;
    if let Some(err) = snap.error {
        return Err(Error::NotLoaded(err));
    }
    let current = snap.hotkeys.unwrap_or_default();
    let next = rebind(&current, action.id(), combo);
    store.save(&next).await?;
    store.set_hotkeys(next);

    let canonical = normalize_combo(combo);
    info!(action = %action, combo = %canonical, "binding saved");
    if canonical.is_empty() {
        writeln!(out, "{action} = {UNBOUND}")?;
    } else {
        writeln!(out, "{action} = {canonical}")?;
        if !Combo::parse_lossy(&canonical).is_actionable() {
            writeln!(out, "warning: {canonical:?} can never be typed; the binding is inert")?;
        }
    }
    Ok(())
}

/// `clear`: unbind `action` and save.
pub async fn clear(store: &BindingStore, action: Action, out: &mut impl Write) -> Result<()> {
    set(store, action, "", out).await
}

/// `reset`: save the built-in table.
pub async fn reset(
    store: &BindingStore,
    translate: &Translator,
    out: &mut impl Write,
) -> Result<()> {
    let defaults = default_hotkeys(&**translate);
    store.save(&defaults).await?;
    store.set_hotkeys(defaults.clone());
    info!(count = defaults.len(), "bindings reset");
    write_table(out, &defaults)
}

/// `normalize`: print the canonical form of `combo`.
pub fn normalize(combo: &str, out: &mut impl Write) -> Result<()> {
    let canonical = normalize_combo(combo);
    if canonical.is_empty() {
        writeln!(out, "{UNBOUND}")?;
    } else {
        writeln!(out, "{canonical}")?;
    }
    Ok(())
}
