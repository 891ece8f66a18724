//! Language negotiation: turns raw preference signals into an ordered,
//! deduplicated candidate list.
//!
//! Negotiation is a pure function of its inputs: the caller hands over an
//! explicit [`RequestContext`] instead of this module reading query/session
//! state from globals.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Read-only snapshot of the request-level language signals.
///
/// The web layer builds one of these per request; this subsystem never
/// mutates query or session state.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Explicit `lang` query parameter, if present.
    pub query_lang: Option<String>,

    /// Language stored in the session, if present.
    pub session_lang: Option<String>,

    /// Raw `Accept-Language`-style entries, in header order.
    pub accept_language: Vec<String>,
}

impl RequestContext {
    /// Create an empty context (no signals; negotiation yields the fallback).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query-parameter language
    pub fn with_query_lang(mut self, lang: impl Into<String>) -> Self {
        self.query_lang = Some(lang.into());
        self
    }

    /// Set the session-stored language
    pub fn with_session_lang(mut self, lang: impl Into<String>) -> Self {
        self.session_lang = Some(lang.into());
        self
    }

    /// Set the raw Accept-Language entries, in header order
    pub fn with_accept_language<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept_language = entries.into_iter().map(Into::into).collect();
        self
    }
}

// Tag pattern: two or more word chars, optionally followed by more
// dash-joined segments. Anything after (e.g. ";q=0.8") is ignored.
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"[a-z0-9_]{2,}(?:-[a-z0-9_]{2,})*").expect("tag regex is valid")
    })
}

/// Extract a normalized language tag and its parent tag from a raw entry.
///
/// The entry is lowercased, then matched against the tag pattern. If the
/// matched tag carries a region suffix (`fr-fr`), the parent is the portion
/// before the final segment (`fr`). Entries with no match fall back to their
/// first two characters and have no parent.
///
/// # Returns
/// `(primary_tag, parent_tag)`.
pub fn parse_lang_code(raw: &str) -> (String, Option<String>) {
    let lowered = raw.trim().to_lowercase();

    match tag_regex().find(&lowered) {
        Some(m) => {
            let primary = m.as_str().to_string();
            let parent = primary.rfind('-').map(|idx| primary[..idx].to_string());
            (primary, parent)
        }
        None => (lowered.chars().take(2).collect(), None),
    }
}

/// Normalize a tag: lowercase and strip everything outside `[a-z0-9_-]`.
fn sanitize(tag: &str) -> String {
    tag.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Build the ordered candidate list, highest priority first.
///
/// Priority: forced language, query parameter, session, Accept-Language
/// entries in textual order (each primary tag immediately followed by its
/// parent tag), then the fallback. Entries are normalized and deduplicated
/// preserving first occurrence, so the result is never empty and never
/// contains the same tag twice.
///
/// Note: Accept-Language quality weights (`;q=`) are not parsed; entries are
/// taken in the order the header lists them.
pub fn negotiate(forced: Option<&str>, fallback: &str, ctx: &RequestContext) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();

    if let Some(lang) = forced {
        raw.push(lang.to_string());
    }

    if let Some(lang) = &ctx.query_lang {
        raw.push(lang.clone());
    }

    if let Some(lang) = &ctx.session_lang {
        raw.push(lang.clone());
    }

    for entry in &ctx.accept_language {
        let (primary, parent) = parse_lang_code(entry);
        raw.push(primary);
        if let Some(parent) = parent {
            raw.push(parent);
        }
    }

    raw.push(fallback.to_string());

    let mut candidates: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let clean = sanitize(&tag);
        if !clean.is_empty() && !candidates.contains(&clean) {
            candidates.push(clean);
        }
    }

    debug!(?candidates, "negotiated language candidates");
    candidates
}
