//! Maps candidate languages to source file paths and determines which
//! candidates actually have a file on disk.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{I18nError, Result};

/// Placeholder the file-path template must contain exactly once.
pub const LANGUAGE_PLACEHOLDER: &str = "{LANGUAGE}";

/// A candidate language whose source file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLanguage {
    /// Normalized language tag.
    pub tag: String,

    /// Path of the existing source file.
    pub path: PathBuf,
}

/// Check that a file-path template contains exactly one language placeholder.
pub fn validate_template(template: &str) -> Result<()> {
    match template.matches(LANGUAGE_PLACEHOLDER).count() {
        1 => Ok(()),
        0 => Err(I18nError::Configuration(format!(
            "file path template '{template}' must contain the {LANGUAGE_PLACEHOLDER} placeholder"
        ))),
        n => Err(I18nError::Configuration(format!(
            "file path template '{template}' contains {n} {LANGUAGE_PLACEHOLDER} placeholders, expected exactly one"
        ))),
    }
}

/// Substitute a language tag into the file-path template.
pub fn lang_file_path(template: &str, tag: &str) -> PathBuf {
    PathBuf::from(template.replacen(LANGUAGE_PLACEHOLDER, tag, 1))
}

/// Collect every candidate whose source file exists, in candidate order.
///
/// All matches are kept, not just the first: later entries serve as the
/// fallback chain for keys the primary language does not define. An empty
/// result is a [`I18nError::NotFound`].
pub fn resolve(template: &str, candidates: &[String]) -> Result<Vec<AppliedLanguage>> {
    let mut applied = Vec::new();

    for tag in candidates {
        let path = lang_file_path(template, tag);
        if path.is_file() {
            applied.push(AppliedLanguage {
                tag: tag.clone(),
                path,
            });
        }
    }

    if applied.is_empty() {
        return Err(I18nError::NotFound {
            candidates: candidates.to_vec(),
        });
    }

    debug!(
        primary = %applied[0].tag,
        chain_len = applied.len(),
        "resolved applied languages"
    );
    Ok(applied)
}
