//! Nested translation tree and the fallback-chain merge.
//!
//! A tree maps keys to either literal strings or nested subtrees. `BTreeMap`
//! keeps sibling iteration stable, so flattening the same input always
//! produces the same artifact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node value in a translation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeValue {
    /// A literal translation string.
    Leaf(String),

    /// A nested section.
    Branch(TranslationTree),
}

/// A parsed translation source file: key → literal or nested section.
pub type TranslationTree = BTreeMap<String, TreeValue>;

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// When both sides hold a nested section under the same key the sections are
/// merged recursively; in every other case the overlay value replaces the
/// base entry wholesale. A higher-priority language can therefore override an
/// entire section with a scalar, or a scalar with a section.
pub fn merge_into(base: &mut TranslationTree, overlay: TranslationTree) {
    for (key, incoming) in overlay {
        match (base.get_mut(&key), incoming) {
            (Some(TreeValue::Branch(existing)), TreeValue::Branch(section)) => {
                merge_into(existing, section);
            }
            (_, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

/// Fold a fallback chain into one tree.
///
/// `trees` must be ordered highest priority first (the applied-language
/// order); they are merged lowest priority first so later, higher-priority
/// trees override earlier ones.
pub fn merge_chain(trees: Vec<TranslationTree>) -> TranslationTree {
    let mut merged = TranslationTree::new();
    for tree in trees.into_iter().rev() {
        merge_into(&mut merged, tree);
    }
    merged
}
