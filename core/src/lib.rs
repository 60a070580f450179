//! libcompose-core
//!
//! Keystroke composition engine shared by script-specific composers.
//!
//! The engine sits between a stream of key events and a host text buffer.
//! Scripts where several keystrokes combine into one unit (Hangul syllable
//! blocks, romaji to kana, code-table candidates) plug in as an
//! `InputComposer`; the engine sequences every key through it and reports
//! each step as an immutable `CompositionResult`.
//!
//! Public API:
//! - `Engine` / `EngineBuilder` - The facade hosts drive
//! - `InputComposer` - Composition strategy contract
//! - `KeyMapper` / `TableKeyMapper` - Optional raw key → token stage
//! - `CompositionState` / `CompositionContext` - Per-session composition state
//! - `CompositionResult` / `CompositionAction` - Result protocol
//! - `Config` - Default key policy settings
use serde::{Deserialize, Serialize};

pub mod result;
pub use result::{CompositionAction, CompositionResult};

pub mod state;
pub use state::{AnyState, CompositionState};

pub mod context;
pub use context::CompositionContext;

pub mod composer;
pub use composer::InputComposer;

pub mod key_mapper;
pub use key_mapper::{KeyMapper, TableKeyMapper};

pub mod keys;
pub use keys::{is_special_key, SpecialKey, BACKSPACE, ESCAPE};

pub mod error;
pub use error::{EngineError, LayoutError};

pub mod engine;
pub use engine::{Engine, EngineBuilder};

/// Engine configuration.
///
/// Controls the engine's default policy for reserved keys the composer did
/// not handle, and the flush behaviour for keys no composer accepts. The
/// defaults commit on enter/space, cancel on escape and pass every rejected
/// key through literally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Commit the pending composition on an unhandled Enter/CR
    pub commit_on_enter: bool,
    /// Commit the pending composition on an unhandled Space
    pub commit_on_space: bool,
    /// Cancel the pending composition on an unhandled Escape
    pub cancel_on_escape: bool,
    /// When a composing engine flushes before a key no composer accepts,
    /// append that key even if it is a control character.
    /// Printable keys are always appended.
    pub append_control_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commit_on_enter: true,
            commit_on_space: true,
            cancel_on_escape: true,
            append_control_keys: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
