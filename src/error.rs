//! Error taxonomy for the resolution pipeline.
//!
//! Every failure mode has its own variant so callers can match on what went
//! wrong. All variants except `MissingKey` are detected during `init` and
//! abort it entirely; `MissingKey` is raised lazily on lookup.

use std::io;
use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Errors produced by configuration, resolution, caching, and lookup.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// Invalid configuration (malformed path template, empty separator, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No candidate language (including the fallback) has a source file.
    #[error("no language file found for any candidate: {candidates:?}")]
    NotFound { candidates: Vec<String> },

    /// A source file's extension has no registered parser.
    #[error("no parser registered for extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// A source file exists but could not be parsed.
    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// The cache artifact could not be persisted.
    #[error("could not write cache artifact to '{path}'")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A composite key is absent from the loaded catalog.
    #[error("translation key '{key}' not found in catalog")]
    MissingKey { key: String },

    /// Filesystem access failed during resolution.
    #[error("i/o error on '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
