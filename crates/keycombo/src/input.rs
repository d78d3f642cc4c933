//! Abstract keyboard input events and their conversion to canonical combos.

use crate::{Combo, Key, Modifier, is_modifier_key, modifiers::modifiers_from_flags};

/// A keyboard input event as delivered by the host input surface.
///
/// `key` carries the primary key value in DOM style ("k", "K", "Enter", "F5",
/// " ", "Control"). The modifier flags describe what was held when the key
/// went down. `repeat` and `composing` are carried for consumers that want to
/// filter auto-repeat or IME composition; they never affect matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Primary key value.
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Alt / Option held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
    /// Meta / Command held.
    pub meta: bool,
    /// Generated by OS auto-repeat.
    pub repeat: bool,
    /// Delivered during an IME composition session.
    pub composing: bool,
    /// Set by a listener to suppress the host's default action.
    default_prevented: bool,
}

impl KeyInput {
    /// Create an event for `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Synthesize the event a user would produce by pressing `combo`.
    pub fn from_combo(combo: &Combo) -> Self {
        let mut ev = Self::new(combo.key.to_spec());
        for m in &combo.modifiers {
            ev = ev.with(*m);
        }
        ev
    }

    /// Return this event with modifier `m` held.
    pub fn with(mut self, m: Modifier) -> Self {
        match m {
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Shift => self.shift = true,
            Modifier::Meta => self.meta = true,
        }
        self
    }

    /// Return this event marked as an auto-repeat.
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Suppress the host's default handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// True once a listener has called [`KeyInput::prevent_default`].
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The combo this event represents, or `None` when it carries no
    /// actionable non-modifier key (lone modifier, dead key, unknown key).
    pub fn combo(&self) -> Option<Combo> {
        if is_modifier_key(&self.key) {
            return None;
        }
        let raw = if self.shift {
            unshift(&self.key).unwrap_or(&self.key)
        } else {
            &self.key
        };
        let key = Key::from_spec(raw).filter(|k| k.is_identified())?;
        Some(Combo::new(
            modifiers_from_flags(self.ctrl, self.alt, self.shift, self.meta),
            key,
        ))
    }
}

/// Map a shifted US-layout symbol back to the key that produced it, so that
/// Shift+1 matches "shift+1" rather than an unnamed "!".
fn unshift(key: &str) -> Option<&'static str> {
    Some(match key {
        "!" => "1",
        "@" => "2",
        "#" => "3",
        "$" => "4",
        "%" => "5",
        "^" => "6",
        "&" => "7",
        "*" => "8",
        "(" => "9",
        ")" => "0",
        "_" => "-",
        "+" => "=",
        "{" => "[",
        "}" => "]",
        "|" => "\\",
        ":" => ";",
        "\"" => "'",
        "<" => ",",
        ">" => ".",
        "?" => "/",
        "~" => "`",
        _ => return None,
    })
}

/// Convert a live keyboard event to its canonical combo string.
///
/// Produces exactly what [`crate::normalize_combo`] produces for the equivalent
/// textual combo. Returns `None` for events without an actionable key; such
/// events can never equal a normalized stored binding.
pub fn event_to_combo(event: &KeyInput) -> Option<String> {
    event.combo().map(|c| c.to_string_canonical())
}
