use serde::{Deserialize, Deserializer, Serialize};

use keycombo::normalize_combo;

/// Persisted pairing of an action id and its configured combo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRecord {
    /// Stable action identifier, e.g. `"toggle-run"`. Unique within a list.
    pub id: String,

    /// Combo string; empty means unbound. Absent or `null` decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,

    /// Optional display text. Never consulted for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl BindingRecord {
    /// Construct an unlabelled record.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            label: None,
        }
    }

    /// Attach display text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True when the record carries a non-blank combo.
    pub fn is_bound(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Canonical form of this record's combo (empty when unbound).
    pub fn combo(&self) -> String {
        normalize_combo(&self.value)
    }
}

/// Return a copy of `list` with the record for `id` bound to `combo`.
///
/// The combo is stored in canonical form; a blank combo unbinds. When `id` is
/// absent from the list a new record is appended.
pub fn rebind(list: &[BindingRecord], id: &str, combo: &str) -> Vec<BindingRecord> {
    let value = normalize_combo(combo);
    let mut out = list.to_vec();
    match out.iter_mut().find(|r| r.id == id) {
        Some(rec) => rec.value = value,
        None => out.push(BindingRecord::new(id, value)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_missing_and_null_values_as_unbound() {
        let list: Vec<BindingRecord> = serde_json::from_str(
            r#"[{"id":"a"},{"id":"b","value":null},{"id":"c","value":"Ctrl+K","label":"C"}]"#,
        )
        .expect("decode");
        assert!(!list[0].is_bound());
        assert!(!list[1].is_bound());
        assert_eq!(list[2].combo(), "ctrl+k");
        assert_eq!(list[2].label.as_deref(), Some("C"));
    }

    #[test]
    fn label_is_omitted_when_absent() {
        let json = serde_json::to_string(&BindingRecord::new("a", "f5")).expect("encode");
        assert_eq!(json, r#"{"id":"a","value":"f5"}"#);
    }

    #[test]
    fn rebind_replaces_or_appends() {
        let list = vec![BindingRecord::new("a", "f5").with_label("A")];
        let edited = rebind(&list, "a", "Shift+Ctrl+X");
        assert_eq!(edited[0].value, "ctrl+shift+x");
        assert_eq!(edited[0].label.as_deref(), Some("A"));

        let cleared = rebind(&edited, "a", "");
        assert!(!cleared[0].is_bound());

        let appended = rebind(&list, "b", "ctrl+b");
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[1], BindingRecord::new("b", "ctrl+b"));
        // The input list is untouched.
        assert_eq!(list[0].value, "f5");
    }
}
