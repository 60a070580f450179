//! Reserved keys recognized by the engine before any mapping happens.
//!
//! Backspace always goes straight to the composer's backspace handling.
//! The remaining reserved keys are offered to the composer first through
//! `InputComposer::try_process_special_key`; if it declines, the engine
//! applies its default policy.

/// Backspace signal.
pub const BACKSPACE: char = '\u{8}';

/// Escape key.
pub const ESCAPE: char = '\u{1b}';

/// Reserved key offered to the composer before the default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// Newline or carriage return
    Enter,
    Space,
    Tab,
    Escape,
}

impl SpecialKey {
    /// Classify `key`, returning `None` for ordinary keys.
    pub fn from_char(key: char) -> Option<Self> {
        match key {
            '\n' | '\r' => Some(Self::Enter),
            ' ' => Some(Self::Space),
            '\t' => Some(Self::Tab),
            ESCAPE => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Check if `key` is reserved (newline, carriage return, space, tab, escape).
pub fn is_special_key(key: char) -> bool {
    SpecialKey::from_char(key).is_some()
}
