use std::collections::BTreeSet;

/// Modifier keys, declared in canonical order.
///
/// The derived `Ord` is the canonical order used when rendering a combo, so a
/// `BTreeSet<Modifier>` iterates as `ctrl`, `alt`, `shift`, `meta`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Modifier {
    /// Control.
    Ctrl,
    /// Alt / Option.
    Alt,
    /// Shift.
    Shift,
    /// Meta / Command / Super / Windows.
    Meta,
}

impl Modifier {
    /// All modifiers in canonical order.
    pub const ALL: [Self; 4] = [Self::Ctrl, Self::Alt, Self::Shift, Self::Meta];

    /// Parses a modifier token, case-insensitive, accepting common aliases
    /// (control, opt/option, cmd/command, super, win).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "opt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "meta" | "cmd" | "command" | "super" | "win" | "os" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Returns the canonical spec token, always lowercase.
    pub const fn to_spec(self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Meta => "meta",
        }
    }
}

/// Construct a modifier set from individual event flags.
pub(crate) fn modifiers_from_flags(ctrl: bool, alt: bool, shift: bool, meta: bool) -> BTreeSet<Modifier> {
    [
        (ctrl, Modifier::Ctrl),
        (alt, Modifier::Alt),
        (shift, Modifier::Shift),
        (meta, Modifier::Meta),
    ]
    .into_iter()
    .filter_map(|(on, m)| on.then_some(m))
    .collect()
}

/// Returns true when a live event's key value names a modifier or lock key
/// pressed on its own ("Control", "Shift", "AltGraph", "CapsLock", ...).
///
/// Such presses carry no non-modifier key and never form an actionable combo.
pub fn is_modifier_key(key: &str) -> bool {
    if Modifier::from_spec(key).is_some() {
        return true;
    }
    matches!(
        key.to_ascii_lowercase().as_str(),
        "altgraph" | "capslock" | "fn" | "fnlock" | "hyper" | "numlock" | "scrolllock" | "symbol"
            | "symbollock"
    )
}
