//! Built-in English labels.

use std::sync::Arc;

use hotkeys::Translator;

/// Label text per translation key.
const EN: &[(&str, &str)] = &[
    ("hotkey.toggleRun", "Start / stop run"),
    ("hotkey.exportLog", "Export log"),
    ("hotkey.toggleScroll", "Toggle auto-scroll"),
    ("hotkey.openHotkeys", "Open hotkey settings"),
];

/// Look up `key`, returning it unchanged when there is no entry.
pub fn lookup(key: &str) -> String {
    EN.iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| key.to_string(), |(_, v)| (*v).to_string())
}

/// Translator backed by the English table.
pub fn english() -> Translator {
    Arc::new(lookup)
}
