//! Render `tracing` events into level and message strings.

use std::fmt::{Debug, Write};

use tracing::{
    Event,
    field::{Field, Visit},
};

/// Fields extracted from a tracing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    /// Severity level (e.g., INFO, WARN) for the event.
    pub level: String,
    /// Event target (typically the module path).
    pub target: String,
    /// Message, followed by any remaining fields as `key=value`.
    pub message: String,
}

/// Collects the `message` field and the rest as `key=value` pairs.
#[derive(Default)]
struct MsgVisitor {
    /// Captured `message` field, if present.
    msg: Option<String>,
    /// Remaining fields.
    fields: String,
}

impl MsgVisitor {
    /// Append one non-message field.
    fn push_field(&mut self, name: &str, value: &dyn Debug) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ignored = write!(&mut self.fields, "{name}={value:?}");
    }
}

impl Visit for MsgVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.msg = Some(value.to_string());
        } else {
            self.push_field(field.name(), &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.msg = Some(format!("{value:?}"));
        } else {
            self.push_field(field.name(), value);
        }
    }
}

/// Extract level, target and message from an event.
///
/// The `message` field comes first; other fields follow as `key=value`.
pub fn render_event(event: &Event<'_>) -> RenderedLog {
    let meta = event.metadata();
    let mut vis = MsgVisitor::default();
    event.record(&mut vis);
    let message = match (vis.msg, vis.fields.is_empty()) {
        (Some(m), true) => m,
        (Some(m), false) => format!("{m} {}", vis.fields),
        (None, _) => vis.fields,
    };
    RenderedLog {
        level: meta.level().to_string(),
        target: meta.target().to_string(),
        message,
    }
}
