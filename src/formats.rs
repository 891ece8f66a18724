//! Source-file parsers and the extension-keyed registry.
//!
//! Formats are an explicit registry, not an open-ended switch: a file whose
//! extension has no registered parser is an [`I18nError::UnsupportedFormat`],
//! never a silent fallback. INI, YAML, and JSON are registered by default;
//! callers may add their own implementations of [`FormatParser`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{I18nError, Result};
use crate::tree::{TranslationTree, TreeValue};

/// A parser for one translation source format.
pub trait FormatParser: Send + Sync {
    /// Parse the file at `path` into a translation tree.
    fn parse(&self, path: &Path) -> Result<TranslationTree>;
}

/// Registry of format parsers, keyed by lowercase file extension.
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn FormatParser>>,
}

impl ParserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in formats: `ini`, `yml`, `yaml`,
    /// and `json`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("ini", Box::new(IniParser));
        registry.register("yml", Box::new(YamlParser));
        registry.register("yaml", Box::new(YamlParser));
        registry.register("json", Box::new(JsonParser));
        registry
    }

    /// Register (or replace) the parser for an extension.
    pub fn register(&mut self, extension: &str, parser: Box<dyn FormatParser>) {
        self.parsers.insert(extension.to_lowercase(), parser);
    }

    /// Parse a source file, selecting the parser by file extension.
    pub fn parse(&self, path: &Path) -> Result<TranslationTree> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match self.parsers.get(&extension) {
            Some(parser) => parser.parse(path),
            None => Err(I18nError::UnsupportedFormat { extension }),
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// INI sections map to one level of nesting; keys outside any section land at
/// the top of the tree.
pub struct IniParser;

impl FormatParser for IniParser {
    fn parse(&self, path: &Path) -> Result<TranslationTree> {
        let ini = ini::Ini::load_from_file(path).map_err(|e| I18nError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut tree = TranslationTree::new();
        for (section, properties) in ini.iter() {
            match section {
                None => {
                    for (key, value) in properties.iter() {
                        tree.insert(key.to_string(), TreeValue::Leaf(value.to_string()));
                    }
                }
                Some(name) => {
                    let mut branch = TranslationTree::new();
                    for (key, value) in properties.iter() {
                        branch.insert(key.to_string(), TreeValue::Leaf(value.to_string()));
                    }
                    tree.insert(name.to_string(), TreeValue::Branch(branch));
                }
            }
        }
        Ok(tree)
    }
}

/// YAML mappings nest arbitrarily deep; scalars are stringified.
pub struct YamlParser;

impl FormatParser for YamlParser {
    fn parse(&self, path: &Path) -> Result<TranslationTree> {
        let text = read_source(path)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|e| I18nError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        yaml_to_tree(&value, path)
    }
}

fn yaml_to_tree(value: &serde_yaml::Value, path: &Path) -> Result<TranslationTree> {
    let mut tree = TranslationTree::new();
    let mapping = match value {
        serde_yaml::Value::Mapping(m) => m,
        // An empty document parses as null; treat it as an empty tree.
        serde_yaml::Value::Null => return Ok(tree),
        other => {
            return Err(parse_error(
                path,
                format!("expected a mapping at the document root, got {other:?}"),
            ))
        }
    };

    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            other => return Err(parse_error(path, format!("unsupported key {other:?}"))),
        };
        let value = match value {
            serde_yaml::Value::String(s) => TreeValue::Leaf(s.clone()),
            serde_yaml::Value::Number(n) => TreeValue::Leaf(n.to_string()),
            serde_yaml::Value::Bool(b) => TreeValue::Leaf(b.to_string()),
            serde_yaml::Value::Null => TreeValue::Leaf(String::new()),
            serde_yaml::Value::Mapping(_) => TreeValue::Branch(yaml_to_tree(value, path)?),
            other => {
                return Err(parse_error(
                    path,
                    format!("unsupported value under key '{key}': {other:?}"),
                ))
            }
        };
        tree.insert(key, value);
    }
    Ok(tree)
}

/// JSON objects nest arbitrarily deep; scalars are stringified.
pub struct JsonParser;

impl FormatParser for JsonParser {
    fn parse(&self, path: &Path) -> Result<TranslationTree> {
        let text = read_source(path)?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| I18nError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        json_to_tree(&value, path)
    }
}

fn json_to_tree(value: &serde_json::Value, path: &Path) -> Result<TranslationTree> {
    let mut tree = TranslationTree::new();
    let object = match value {
        serde_json::Value::Object(o) => o,
        other => {
            return Err(parse_error(
                path,
                format!("expected an object at the document root, got {other}"),
            ))
        }
    };

    for (key, value) in object {
        let value = match value {
            serde_json::Value::String(s) => TreeValue::Leaf(s.clone()),
            serde_json::Value::Number(n) => TreeValue::Leaf(n.to_string()),
            serde_json::Value::Bool(b) => TreeValue::Leaf(b.to_string()),
            serde_json::Value::Null => TreeValue::Leaf(String::new()),
            serde_json::Value::Object(_) => TreeValue::Branch(json_to_tree(value, path)?),
            serde_json::Value::Array(_) => {
                return Err(parse_error(
                    path,
                    format!("unsupported array value under key '{key}'"),
                ))
            }
        };
        tree.insert(key.clone(), value);
    }
    Ok(tree)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, message: String) -> I18nError {
    I18nError::Parse {
        path: path.to_path_buf(),
        message,
    }
}
