use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Key, Modifier};

/// Separator between combo components.
pub const SEPARATOR: char = '+';

/// A key combo: a set of modifiers plus a single non-modifier key.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Combo {
    /// Modifier keys held down for this combo.
    pub modifiers: BTreeSet<Modifier>,
    /// The non-modifier key for this combo.
    pub key: Key,
}

/// Split a combo spec into its modifier prefix and key token.
///
/// A trailing `++` (or a lone `+`) names the plus key itself.
fn split_key(s: &str) -> (&str, &str) {
    if s.trim() == "+" {
        return ("", "+");
    }
    if let Some(prefix) = s.strip_suffix("++") {
        return (prefix, "+");
    }
    s.rsplit_once(SEPARATOR).unwrap_or(("", s))
}

impl Combo {
    /// Construct a combo from parts.
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// Parses a combo specification of the form "Ctrl+Shift+K".
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by "+"; the last component is always the key.
    /// - Modifier order in the input does not matter; duplicates collapse.
    ///
    /// Returns `None` when any component is unknown or empty.
    pub fn parse(s: &str) -> Option<Self> {
        let (mods_raw, key_raw) = split_key(s);
        let key = Key::from_spec(key_raw)?;
        let mut modifiers = BTreeSet::new();
        if !mods_raw.is_empty() {
            for m in mods_raw.split(SEPARATOR) {
                modifiers.insert(Modifier::from_spec(m)?);
            }
        }
        Some(Self { modifiers, key }.fold_shifted_plus())
    }

    /// Parses a combo, degrading anything unreadable to an `Unidentified` key.
    ///
    /// Modifiers that can be read are kept so the placeholder still renders
    /// recognisably. The result never matches a live event.
    pub fn parse_lossy(s: &str) -> Self {
        if let Some(combo) = Self::parse(s) {
            return combo;
        }
        Self {
            modifiers: s.split(SEPARATOR).filter_map(Modifier::from_spec).collect(),
            key: Key::Unidentified,
        }
    }

    /// Shift plus the plus key is what a US layout reports for Shift+`=`, so
    /// both spellings settle on `shift+=`.
    fn fold_shifted_plus(mut self) -> Self {
        if self.key == Key::Plus && self.modifiers.contains(&Modifier::Shift) {
            self.key = Key::Equal;
        }
        self
    }

    /// True when this combo can match a live event.
    pub fn is_actionable(&self) -> bool {
        self.key.is_identified()
    }

    /// Returns the canonical string form: modifiers in canonical order, then the
    /// key, all lowercase, joined by `+`.
    pub fn to_string_canonical(&self) -> String {
        let mut out: Vec<&str> = self.modifiers.iter().map(|m| m.to_spec()).collect();
        out.push(self.clone().fold_shifted_plus().key.to_spec());
        out.join("+")
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_canonical())
    }
}

impl From<String> for Combo {
    fn from(s: String) -> Self {
        Self::parse_lossy(&s)
    }
}

impl From<Combo> for String {
    fn from(c: Combo) -> Self {
        c.to_string_canonical()
    }
}

/// Normalize a stored or typed combo into canonical form.
///
/// Blank input stays blank (unbound). Everything else goes through
/// [`Combo::parse_lossy`], so the result is idempotent:
/// `normalize_combo(&normalize_combo(x)) == normalize_combo(x)`.
pub fn normalize_combo(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    Combo::parse_lossy(raw).to_string_canonical()
}
