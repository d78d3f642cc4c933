// Built-in bindings used whenever no saved configuration is available.

use std::sync::Arc;

use crate::{Action, BindingRecord};

/// Translation lookup used for display labels.
pub type Translator = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A translator that returns every key unchanged.
pub fn identity_translator() -> Translator {
    Arc::new(str::to_string)
}

/// Default combo per action. Empty means unbound by default.
const DEFAULT_COMBOS: [(Action, &str); 4] = [
    (Action::ToggleRun, "f5"),
    (Action::ExportLog, "ctrl+e"),
    (Action::ToggleScroll, ""),
    (Action::OpenHotkeys, "ctrl+k"),
];

/// The built-in action → combo table.
///
/// Covers every [`Action`]. `translate` only supplies display labels.
pub fn default_hotkeys(translate: &dyn Fn(&str) -> String) -> Vec<BindingRecord> {
    DEFAULT_COMBOS
        .iter()
        .map(|(action, combo)| {
            BindingRecord::new(action.id(), *combo).with_label(translate(action.label_key()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use keycombo::normalize_combo;

    use super::*;

    #[test]
    fn covers_every_action() {
        let defaults = default_hotkeys(&*identity_translator());
        for action in Action::ALL {
            assert!(
                defaults.iter().any(|r| r.id == action.id()),
                "missing default for {action}"
            );
        }
        assert_eq!(defaults.len(), Action::ALL.len());
    }

    #[test]
    fn default_combos_are_canonical() {
        for rec in default_hotkeys(&*identity_translator()) {
            assert_eq!(normalize_combo(&rec.value), rec.value, "{}", rec.id);
        }
    }

    #[test]
    fn translation_only_touches_labels() {
        let plain = default_hotkeys(&*identity_translator());
        let shouty = default_hotkeys(&|k: &str| k.to_uppercase());
        for (a, b) in plain.iter().zip(&shouty) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.value, b.value);
        }
        assert_eq!(shouty[0].label.as_deref(), Some("HOTKEY.TOGGLERUN"));
    }

    #[test]
    fn toggle_scroll_is_unbound_by_default() {
        let defaults = default_hotkeys(&*identity_translator());
        let rec = defaults
            .iter()
            .find(|r| r.id == Action::ToggleScroll.id())
            .expect("present");
        assert!(!rec.is_bound());
    }
}
