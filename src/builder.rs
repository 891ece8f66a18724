//! The `I18n` builder and the one-shot resolution pipeline.
//!
//! Configuration lives on the builder; [`I18n::init`] consumes it and
//! returns an immutable [`Catalog`]. Re-initialization or post-init mutation
//! is not expressible: a new resolution needs a new builder.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cache::CacheManager;
use crate::catalog::Catalog;
use crate::compiler;
use crate::error::{I18nError, Result};
use crate::formats::{FormatParser, ParserRegistry};
use crate::negotiator::{negotiate, RequestContext};
use crate::resolver::{self, validate_template};
use crate::tree::merge_chain;

/// Builder for one translation resolution.
///
/// # Example
///
/// ```no_run
/// use i18n_catalog::{I18n, RequestContext};
///
/// let ctx = RequestContext::new().with_accept_language(["fr-FR", "en"]);
/// let catalog = I18n::new()
///     .with_file_path("lang/lang_{LANGUAGE}.ini")
///     .with_cache_dir("langcache")
///     .with_fallback_lang("en")
///     .init(&ctx)?;
///
/// println!("{}", catalog.raw("greeting")?);
/// # Ok::<(), i18n_catalog::I18nError>(())
/// ```
pub struct I18n {
    file_path: String,
    cache_dir: PathBuf,
    fallback_lang: String,
    forced_lang: Option<String>,
    prefix: String,
    section_separator: String,
    cache_file_mode: u32,
    parsers: ParserRegistry,
}

impl I18n {
    /// Create a builder with the default configuration:
    /// `./lang/lang_{LANGUAGE}.ini` sources, `./langcache/` cache directory,
    /// fallback `en`, separator `_`.
    pub fn new() -> Self {
        Self {
            file_path: "./lang/lang_{LANGUAGE}.ini".to_string(),
            cache_dir: PathBuf::from("./langcache/"),
            fallback_lang: "en".to_string(),
            forced_lang: None,
            prefix: "i18n".to_string(),
            section_separator: "_".to_string(),
            cache_file_mode: 0o666,
            parsers: ParserRegistry::with_defaults(),
        }
    }

    /// Source file path template; must contain `{LANGUAGE}` exactly once.
    pub fn with_file_path(mut self, template: impl Into<String>) -> Self {
        self.file_path = template.into();
        self
    }

    /// Directory for cache artifacts.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Lowest-priority language, always appended to the candidate list.
    pub fn with_fallback_lang(mut self, lang: impl Into<String>) -> Self {
        self.fallback_lang = lang.into();
        self
    }

    /// Pin the language, overriding every request signal. Intended for
    /// testing and administrative pinning.
    pub fn with_forced_lang(mut self, lang: impl Into<String>) -> Self {
        self.forced_lang = Some(lang.into());
        self
    }

    /// Stem prefix for cache artifact file names (default `i18n`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Separator joining nested section keys into composite keys
    /// (default `_`).
    pub fn with_section_separator(mut self, separator: impl Into<String>) -> Self {
        self.section_separator = separator.into();
        self
    }

    /// Unix permission bits applied to written artifacts (default `0o666`,
    /// so any later process can regenerate; tighten per deployment policy).
    /// No effect on non-unix targets.
    pub fn with_cache_file_mode(mut self, mode: u32) -> Self {
        self.cache_file_mode = mode;
        self
    }

    /// Register an additional source-format parser for a file extension.
    pub fn with_parser(mut self, extension: &str, parser: Box<dyn FormatParser>) -> Self {
        self.parsers.register(extension, parser);
        self
    }

    /// Run the full resolution once: negotiate candidates, locate source
    /// files, and load (or regenerate) the cached catalog.
    ///
    /// Every failure here aborts initialization entirely; a partially usable
    /// catalog is never observable.
    pub fn init(self, ctx: &RequestContext) -> Result<Catalog> {
        validate_template(&self.file_path)?;
        if self.section_separator.is_empty() {
            return Err(I18nError::Configuration(
                "section separator must not be empty".to_string(),
            ));
        }
        if self.fallback_lang.is_empty() {
            return Err(I18nError::Configuration(
                "fallback language must not be empty".to_string(),
            ));
        }

        let candidates = negotiate(self.forced_lang.as_deref(), &self.fallback_lang, ctx);
        let applied = resolver::resolve(&self.file_path, &candidates)?;
        let primary = &applied[0];

        let cache = CacheManager::new(
            self.cache_dir,
            self.prefix,
            self.file_path.clone(),
            self.cache_file_mode,
        );
        let cache_path = cache.artifact_path(&primary.tag);

        let compiled = match cache.load_fresh(&cache_path, &primary.path)? {
            Some(compiled) => compiled,
            None => {
                info!(lang = %primary.tag, "compiling translation catalog");
                let mut trees = Vec::with_capacity(applied.len());
                for lang in &applied {
                    debug!(lang = %lang.tag, path = %lang.path.display(), "parsing source file");
                    trees.push(self.parsers.parse(&lang.path)?);
                }
                let merged = merge_chain(trees);
                let compiled =
                    compiler::compile(&merged, &self.section_separator, &primary.tag);
                cache.store(&cache_path, &compiled)?;
                compiled
            }
        };

        Ok(Catalog::new(
            compiled.entries,
            applied.into_iter().map(|a| a.tag).collect(),
            self.fallback_lang,
            self.section_separator,
            cache_path,
        ))
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}
