//! keycombo: canonical key combos for shortcut matching.
//!
//! - `Key`: Enum of every non-modifier key a combo can end in.
//! - `Modifier`: The fixed, ordered modifier set (`ctrl`, `alt`, `shift`, `meta`).
//! - `Combo`: A modifier set plus one key, rendered in canonical form.
//! - `KeyInput`: An abstract keyboard event carrying modifier flags and a key value.
//!
//! The canonical string form is the only equality that matters: two combos are
//! the same binding iff their canonical strings are byte-equal. Both
//! [`normalize_combo`] (for stored/typed text) and [`event_to_combo`] (for live
//! events) funnel through [`Combo`] so that they cannot disagree.
//!
//! Nothing in this crate fails. Unknown tokens degrade to [`Key::Unidentified`],
//! which renders stably and never matches a live event.

mod key;
pub use key::Key;

mod modifiers;
pub use modifiers::{Modifier, is_modifier_key};

mod combo;
pub use combo::{Combo, SEPARATOR, normalize_combo};

mod input;
pub use input::{KeyInput, event_to_combo};

#[cfg(feature = "crossterm")]
mod term;
