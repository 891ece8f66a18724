//! Runtime-facing read API over a loaded catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compiler::format_args;
use crate::error::{I18nError, Result};

/// An initialized, immutable translation catalog.
///
/// Produced by [`crate::I18n::init`]; there is no way to mutate or
/// re-initialize one. A new resolution requires a new builder.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
    applied_langs: Vec<String>,
    fallback_lang: String,
    section_separator: String,
    cache_path: PathBuf,
}

impl Catalog {
    pub(crate) fn new(
        entries: BTreeMap<String, String>,
        applied_langs: Vec<String>,
        fallback_lang: String,
        section_separator: String,
        cache_path: PathBuf,
    ) -> Self {
        Self {
            entries,
            applied_langs,
            fallback_lang,
            section_separator,
            cache_path,
        }
    }

    /// Look up the literal string for a composite key.
    ///
    /// Keys are never pre-validated at load time; an absent key surfaces
    /// here, on first access, as [`I18nError::MissingKey`].
    pub fn raw(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| I18nError::MissingKey {
                key: key.to_string(),
            })
    }

    /// Look up a template and interpolate positional arguments into it.
    ///
    /// `{0}` is replaced by the first argument, `{1}` by the second, and so
    /// on.
    pub fn format(&self, key: &str, args: &[&str]) -> Result<String> {
        Ok(format_args(self.raw(key)?, args))
    }

    /// Whether a composite key is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The primary applied language (first candidate with a source file).
    pub fn applied_lang(&self) -> &str {
        &self.applied_langs[0]
    }

    /// Every applied language, highest priority first.
    pub fn applied_langs(&self) -> &[String] {
        &self.applied_langs
    }

    /// The configured fallback language.
    pub fn fallback_lang(&self) -> &str {
        &self.fallback_lang
    }

    /// Separator joining nested section keys into composite keys.
    pub fn section_separator(&self) -> &str {
        &self.section_separator
    }

    /// Path of the cache artifact backing this catalog.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Iterate over all composite keys, in stable order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
