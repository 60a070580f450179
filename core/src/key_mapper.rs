//! Key mapping: raw keys to logical tokens.
//!
//! A key mapper sits in front of the composer and translates one physical
//! key into at most one token (e.g. QWERTY 'r' → 'ㄱ' on a Korean two-set
//! layout). It is stateless; all composition state stays in the context.
//!
//! This crate ships no layout data. [`TableKeyMapper`] is a generic
//! table-driven mapper whose table is supplied by the host, either from
//! pairs or from a TOML document:
//!
//! ```toml
//! name = "Dubeolsik"
//! description = "Korean two-set layout"
//!
//! [keys]
//! r = "ㄱ"
//! k = "ㅏ"
//! ```

use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::LayoutError;

/// Translates raw keys into logical tokens for the composer.
pub trait KeyMapper: Send {
    /// Layout name, e.g. "Dubeolsik", "CheonJiIn".
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Map `key` to a token, or `None` if this layout does not cover it.
    fn try_map(&self, key: char) -> Option<String>;

    /// Check if `key` is covered by this layout.
    fn can_map(&self, key: char) -> bool {
        self.try_map(key).is_some()
    }

    /// All keys covered by this layout (for help screens).
    fn supported_keys(&self) -> Vec<char>;
}

/// On-disk shape of a layout table.
#[derive(Debug, Deserialize)]
struct LayoutFile {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keys: BTreeMap<String, String>,
}

/// Key mapper backed by a host-supplied table.
#[derive(Debug, Clone, Default)]
pub struct TableKeyMapper {
    name: String,
    description: String,
    table: AHashMap<char, String>,
}

impl TableKeyMapper {
    /// Create an empty mapper.
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            table: AHashMap::new(),
        }
    }

    /// Create a mapper from `(key, token)` pairs. Later pairs win.
    pub fn from_pairs<T, I, V>(name: T, pairs: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = (char, V)>,
        V: Into<String>,
    {
        let mut mapper = Self::new(name);
        for (key, token) in pairs {
            mapper.insert(key, token);
        }
        mapper
    }

    /// Load a layout from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a layout from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, LayoutError> {
        let file: LayoutFile = toml::from_str(content)?;
        let mut mapper = Self::new(file.name).with_description(file.description);

        for (key, token) in file.keys {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => mapper.insert(ch, token),
                _ => return Err(LayoutError::InvalidKey(key)),
            }
        }
        Ok(mapper)
    }

    pub fn with_description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = description.into();
        self
    }

    /// Insert or replace the token for `key`.
    pub fn insert<V: Into<String>>(&mut self, key: char, token: V) {
        self.table.insert(key, token.into());
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl KeyMapper for TableKeyMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn try_map(&self, key: char) -> Option<String> {
        self.table.get(&key).cloned()
    }

    fn can_map(&self, key: char) -> bool {
        self.table.contains_key(&key)
    }

    fn supported_keys(&self) -> Vec<char> {
        let mut keys: Vec<char> = self.table.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}
