//! Error types for engine construction and key layout loading.
//!
//! Composition failures are not errors: they are reported through
//! `CompositionResult`. Only conditions that make an engine unusable from
//! the start end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while constructing an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The builder finished without an input composer.
    #[error("engine requires an input composer")]
    MissingComposer,

    /// The composer created an initial state that is already composing.
    #[error("composer `{composer}` created an initial state that is already composing")]
    StaleInitialState { composer: String },
}

/// Errors that can occur while loading a key layout table.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Failed to read the layout file.
    #[error("failed to read key layout {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout document is not valid TOML or has the wrong shape.
    #[error("failed to parse key layout: {0}")]
    Parse(#[from] toml::de::Error),

    /// A layout key is not exactly one character.
    #[error("layout key '{0}' must be a single character")]
    InvalidKey(String),
}
