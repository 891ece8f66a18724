//! Compiles a merged translation tree into the persistable catalog artifact.
//!
//! The artifact is a plain serialized mapping from composite key to literal
//! string, loaded back through serde. Serialization handles all escaping, so
//! values with embedded quotes round-trip untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{TranslationTree, TreeValue};

/// Version of the compiled catalog format. Bumping it invalidates every
/// existing cache artifact.
pub const CATALOG_FORMAT_VERSION: u32 = 1;

/// The persistable runtime artifact: a flat composite-key → string catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCatalog {
    /// Catalog format version; artifacts with another version are stale.
    pub version: u32,

    /// Primary applied language the catalog was compiled for.
    pub language: String,

    /// Flattened composite-key → literal string entries.
    pub entries: BTreeMap<String, String>,
}

/// Flatten a merged tree into composite keys joined by `separator`.
///
/// A branch at key `k` contributes children prefixed with `k<separator>`; a
/// leaf contributes its literal value. Keys are unique by construction, and
/// the underlying `BTreeMap` keeps sibling order stable, so identical input
/// always yields an identical artifact.
pub fn flatten(tree: &TranslationTree, separator: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    flatten_into(tree, separator, "", &mut entries);
    entries
}

fn flatten_into(
    tree: &TranslationTree,
    separator: &str,
    prefix: &str,
    entries: &mut BTreeMap<String, String>,
) {
    for (key, value) in tree {
        match value {
            TreeValue::Leaf(literal) => {
                entries.insert(format!("{prefix}{key}"), literal.clone());
            }
            TreeValue::Branch(section) => {
                let child_prefix = format!("{prefix}{key}{separator}");
                flatten_into(section, separator, &child_prefix, entries);
            }
        }
    }
}

/// Compile a merged tree into the artifact for `language`.
pub fn compile(tree: &TranslationTree, separator: &str, language: &str) -> CompiledCatalog {
    CompiledCatalog {
        version: CATALOG_FORMAT_VERSION,
        language: language.to_string(),
        entries: flatten(tree, separator),
    }
}

/// Interpolate positional arguments into a template.
///
/// `{0}` is replaced by the first argument, `{1}` by the second, and so on.
/// Placeholders referencing a missing argument, and braces that do not form
/// an indexed placeholder, are left intact.
pub fn format_args(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices();

    while let Some((start, c)) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }

        // Try to read "{<digits>}" starting at `start`.
        let rest = &template[start + 1..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        let closes = rest[digits.len()..].starts_with('}');

        if digits.is_empty() || !closes {
            out.push(c);
            continue;
        }

        match digits.parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => {
                out.push_str(arg);
                // Skip the digits and the closing brace.
                for _ in 0..digits.len() + 1 {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }

    out
}
