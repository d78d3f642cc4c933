//! Property tests for the combo codec.

use keycombo::{Key, KeyInput, Modifier, event_to_combo, normalize_combo};
use proptest::prelude::*;

fn modifier_token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "ctrl", "Ctrl", "CONTROL", "alt", "Opt", "option", "shift", "SHIFT", "meta", "cmd",
        "Command", "super",
    ])
}

fn key_token() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(Key::ALL.to_vec()).prop_map(|k| k.to_spec().to_string()),
        prop::sample::select(vec![
            "K", "Enter", "Esc", "ArrowUp", "PgDn", "comma", "+", " ", "F12", "bogus", "",
        ])
        .prop_map(str::to_string),
        "[a-z0-9]{1,6}",
    ]
}

fn combo_text() -> impl Strategy<Value = String> {
    (prop::collection::vec(modifier_token(), 0..5), key_token()).prop_map(|(mods, key)| {
        let mut parts: Vec<String> = mods.into_iter().map(str::to_string).collect();
        parts.push(key);
        parts.join("+")
    })
}

fn lone_modifier_event() -> impl Strategy<Value = KeyInput> {
    (
        prop::sample::select(vec!["Control", "Shift", "Alt", "Meta", "AltGraph", "CapsLock"]),
        any::<[bool; 4]>(),
    )
        .prop_map(|(key, flags)| {
            let mut ev = KeyInput::new(key);
            for (on, m) in flags.into_iter().zip(Modifier::ALL) {
                if on {
                    ev = ev.with(m);
                }
            }
            ev
        })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in combo_text()) {
        let once = normalize_combo(&raw);
        prop_assert_eq!(normalize_combo(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_for_arbitrary_text(raw in ".{0,24}") {
        let once = normalize_combo(&raw);
        prop_assert_eq!(normalize_combo(&once), once);
    }

    #[test]
    fn lone_modifiers_never_match(ev in lone_modifier_event(), raw in combo_text()) {
        prop_assert_eq!(event_to_combo(&ev), None);
        let stored = normalize_combo(&raw);
        prop_assert!(event_to_combo(&ev).as_deref() != Some(stored.as_str()));
    }

    #[test]
    fn synthesized_events_match_their_combo(raw in combo_text()) {
        prop_assume!(!raw.trim().is_empty());
        let combo = keycombo::Combo::parse_lossy(&raw);
        let ev = KeyInput::from_combo(&combo);
        if combo.is_actionable() {
            prop_assert_eq!(event_to_combo(&ev), Some(normalize_combo(&raw)));
        } else {
            prop_assert_eq!(event_to_combo(&ev), None);
        }
    }
}
