//! Key names, canonical spec tokens, and parsing aliases.

// Central mapping between enum variants and canonical spec tokens. The
// canonical token is what `to_spec` emits and what a stored combo normalizes to.
macro_rules! define_keys {
    ( $( $k:ident => $s:literal, )* ) => {
        /// A non-modifier key that terminates a combo.
        ///
        /// `Unidentified` is the placeholder for anything the codec cannot name;
        /// it renders stably but is never produced by a live event.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $k, )*
        }

        impl Key {
            /// Every key, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$k, )* ];

            /// Returns the canonical spec token for this key, always lowercase.
            pub const fn to_spec(self) -> &'static str {
                match self {
                    $( Self::$k => $s, )*
                }
            }

            /// Exact match against canonical tokens.
            fn from_canonical(s: &str) -> Option<Self> {
                match s {
                    $( $s => Some(Self::$k), )*
                    _ => None,
                }
            }
        }
    };
}

// Aliases that only apply to parsing (never emitted by `to_spec`). Keys are
// matched after lowercasing, so DOM key values like "ArrowUp" land here too.
macro_rules! key_spec_aliases {
    ( $s:expr, $( $k:ident => $v:literal, )* ) => {
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    };
}

define_keys! {
    A => "a",
    B => "b",
    C => "c",
    D => "d",
    E => "e",
    F => "f",
    G => "g",
    H => "h",
    I => "i",
    J => "j",
    K => "k",
    L => "l",
    M => "m",
    N => "n",
    O => "o",
    P => "p",
    Q => "q",
    R => "r",
    S => "s",
    T => "t",
    U => "u",
    V => "v",
    W => "w",
    X => "x",
    Y => "y",
    Z => "z",
    Digit0 => "0",
    Digit1 => "1",
    Digit2 => "2",
    Digit3 => "3",
    Digit4 => "4",
    Digit5 => "5",
    Digit6 => "6",
    Digit7 => "7",
    Digit8 => "8",
    Digit9 => "9",
    F1 => "f1",
    F2 => "f2",
    F3 => "f3",
    F4 => "f4",
    F5 => "f5",
    F6 => "f6",
    F7 => "f7",
    F8 => "f8",
    F9 => "f9",
    F10 => "f10",
    F11 => "f11",
    F12 => "f12",
    F13 => "f13",
    F14 => "f14",
    F15 => "f15",
    F16 => "f16",
    F17 => "f17",
    F18 => "f18",
    F19 => "f19",
    F20 => "f20",
    F21 => "f21",
    F22 => "f22",
    F23 => "f23",
    F24 => "f24",
    Enter => "enter",
    Escape => "escape",
    Space => "space",
    Tab => "tab",
    Backspace => "backspace",
    Delete => "delete",
    Insert => "insert",
    Home => "home",
    End => "end",
    PageUp => "pageup",
    PageDown => "pagedown",
    Up => "up",
    Down => "down",
    Left => "left",
    Right => "right",
    PrintScreen => "printscreen",
    Pause => "pause",
    ContextMenu => "contextmenu",
    Minus => "-",
    Equal => "=",
    Plus => "plus",
    BracketLeft => "[",
    BracketRight => "]",
    Backslash => "\\",
    Semicolon => ";",
    Quote => "'",
    Comma => ",",
    Period => ".",
    Slash => "/",
    Backquote => "`",
    Unidentified => "unidentified",
}

/// Parses a key token. Case-insensitive; accepts canonical tokens and aliases.
pub(crate) fn from_spec(s: &str) -> Option<Key> {
    if s == " " {
        return Some(Key::Space);
    }
    let lowered = s.trim().to_ascii_lowercase();
    if let some @ Some(_) = Key::from_canonical(&lowered) {
        return some;
    }
    key_spec_aliases! { lowered.as_str(),
        // enter/escape/delete variants
        Enter => "return",
        Enter => "ret",
        Escape => "esc",
        Delete => "del",
        Insert => "ins",
        Backspace => "bksp",
        Space => "spacebar",

        // DOM key values
        Up => "arrowup",
        Down => "arrowdown",
        Left => "arrowleft",
        Right => "arrowright",
        ContextMenu => "menu",
        PageUp => "pgup",
        PageDown => "pgdn",

        // spelled-out punctuation
        Plus => "+",
        Minus => "minus",
        Equal => "equal",
        BracketLeft => "bracketleft",
        BracketRight => "bracketright",
        Backslash => "backslash",
        Semicolon => "semicolon",
        Quote => "quote",
        Comma => "comma",
        Period => "period",
        Slash => "slash",
        Backquote => "backquote",
        Backquote => "grave",
    }
}

impl Key {
    /// Parses a key specification string into a `Key`.
    ///
    /// Accepts canonical tokens in any case, symbol shorthands for digits and
    /// punctuation, and alias words (esc, return, del, pgup, arrowup, ...).
    /// Returns `None` if nothing matches; callers that must not fail use
    /// [`Key::from_spec_lossy`].
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Like [`Key::from_spec`], degrading unknown tokens to `Unidentified`.
    pub fn from_spec_lossy(s: &str) -> Self {
        from_spec(s).unwrap_or(Self::Unidentified)
    }

    /// True for every key except the `Unidentified` placeholder.
    pub fn is_identified(self) -> bool {
        self != Self::Unidentified
    }
}
