//! Conversion from terminal key events (crossterm) into [`KeyInput`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::KeyInput;

/// DOM-style key value for a lone modifier press.
fn modifier_key_name(code: ModifierKeyCode) -> &'static str {
    match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => "Meta",
        ModifierKeyCode::LeftHyper | ModifierKeyCode::RightHyper => "Hyper",
        ModifierKeyCode::IsoLevel3Shift | ModifierKeyCode::IsoLevel5Shift => "AltGraph",
    }
}

impl From<&KeyEvent> for KeyInput {
    fn from(ev: &KeyEvent) -> Self {
        let mut shift = ev.modifiers.contains(KeyModifiers::SHIFT);
        let key = match ev.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => {
                shift = true;
                "Tab".to_string()
            }
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::PrintScreen => "PrintScreen".to_string(),
            KeyCode::Pause => "Pause".to_string(),
            KeyCode::Menu => "ContextMenu".to_string(),
            KeyCode::CapsLock => "CapsLock".to_string(),
            KeyCode::NumLock => "NumLock".to_string(),
            KeyCode::ScrollLock => "ScrollLock".to_string(),
            KeyCode::Modifier(m) => modifier_key_name(m).to_string(),
            _ => "Unidentified".to_string(),
        };
        let mut out = Self::new(key);
        out.ctrl = ev.modifiers.contains(KeyModifiers::CONTROL);
        out.alt = ev.modifiers.contains(KeyModifiers::ALT);
        out.shift = shift;
        out.meta = ev.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META);
        out.repeat = ev.kind == KeyEventKind::Repeat;
        out
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(ev: KeyEvent) -> Self {
        Self::from(&ev)
    }
}
