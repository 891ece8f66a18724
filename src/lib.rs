//! Language negotiation and cached translation catalogs.
//!
//! This crate resolves a user's preferred language from prioritized request
//! signals, locates the matching translation source files (INI, YAML, or
//! JSON), merges them along a fallback chain, and caches the compiled result
//! so parsing and merging happen at most once per (language, source-content)
//! pair.
//!
//! # Overview
//!
//! - [`RequestContext`]: explicit, read-only snapshot of the request's
//!   language signals (query parameter, session, Accept-Language entries).
//! - [`I18n`]: builder holding the configuration; its [`I18n::init`]
//!   consumes the builder and runs the whole pipeline exactly once.
//! - [`Catalog`]: the immutable runtime lookup API (`raw`, `format`).
//!
//! Resolution is synchronous and single-threaded. The cache directory may be
//! shared by any number of processes: regeneration is deterministic and
//! artifact replacement is atomic, so concurrent regeneration needs no
//! locking.

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod formats;
pub mod negotiator;
pub mod resolver;
pub mod tree;

pub use builder::I18n;
pub use catalog::Catalog;
pub use error::{I18nError, Result};
pub use formats::{FormatParser, ParserRegistry};
pub use negotiator::RequestContext;
pub use tree::{TranslationTree, TreeValue};
