//! Integration tests for the full resolution pipeline.
//!
//! These tests exercise the interaction between negotiation, file
//! resolution, merging, compilation, and the cache layer against real
//! temporary directories.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use tempfile::TempDir;

use i18n_catalog::{I18n, I18nError, RequestContext};

// ==================== Test Helpers ====================

/// A language directory plus an empty cache directory.
struct Fixture {
    _root: TempDir,
    lang_template: String,
    cache_dir: String,
}

impl Fixture {
    fn new(extension: &str) -> Fixture {
        let root = TempDir::new().expect("temp dir");
        let lang_dir = root.path().join("lang");
        let cache_dir = root.path().join("langcache");
        fs::create_dir_all(&lang_dir).expect("lang dir");

        Fixture {
            lang_template: format!("{}/lang_{{LANGUAGE}}.{extension}", lang_dir.display()),
            cache_dir: cache_dir.display().to_string(),
            _root: root,
        }
    }

    fn write_lang(&self, tag: &str, content: &str) {
        let path = self.lang_template.replace("{LANGUAGE}", tag);
        fs::write(path, content).expect("write lang file");
    }

    fn lang_path(&self, tag: &str) -> String {
        self.lang_template.replace("{LANGUAGE}", tag)
    }

    fn builder(&self) -> I18n {
        I18n::new()
            .with_file_path(&self.lang_template)
            .with_cache_dir(&self.cache_dir)
            .with_fallback_lang("en")
    }
}

fn bump_mtime(path: impl AsRef<Path>) {
    let file = fs::OpenOptions::new()
        .write(true)
        .open(path.as_ref())
        .expect("open for mtime bump");
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .expect("set mtime");
}

// ==================== End-to-End Resolution Tests ====================

#[test]
fn test_full_resolution_with_fallback_chain() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang(
        "en",
        "greeting = Hello\nfarewell = Bye\n[category]\nsomethingother = Something other\n",
    );
    fixture.write_lang("fr", "greeting = Bonjour\n");

    let ctx = RequestContext::new().with_accept_language(["fr-FR", "en;q=0.8"]);
    let catalog = fixture.builder().init(&ctx)?;

    // fr-fr has no file; fr is primary, en fills the gaps.
    assert_eq!(catalog.applied_lang(), "fr");
    assert_eq!(catalog.applied_langs(), ["fr", "en"]);
    assert_eq!(catalog.raw("greeting")?, "Bonjour");
    assert_eq!(catalog.raw("farewell")?, "Bye");
    assert_eq!(catalog.raw("category_somethingother")?, "Something other");
    Ok(())
}

#[test]
fn test_forced_language_wins() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting = Hello\n");
    fixture.write_lang("de", "greeting = Hallo\n");

    let ctx = RequestContext::new().with_query_lang("en");
    let catalog = fixture.builder().with_forced_lang("de").init(&ctx)?;

    assert_eq!(catalog.applied_lang(), "de");
    assert_eq!(catalog.raw("greeting")?, "Hallo");
    Ok(())
}

#[test]
fn test_positional_interpolation() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting_with_args = Hello {0}, today is {1}\n");

    let catalog = fixture.builder().init(&RequestContext::new())?;
    let result = catalog.format("greeting_with_args", &["world", "Monday"])?;
    assert_eq!(result, "Hello world, today is Monday");
    Ok(())
}

#[test]
fn test_yaml_sources_and_custom_separator() -> Result<()> {
    let fixture = Fixture::new("yml");
    fixture.write_lang("en", "section:\n  sub: value\n");

    let catalog = fixture
        .builder()
        .with_section_separator("-")
        .init(&RequestContext::new())?;

    assert_eq!(catalog.raw("section-sub")?, "value");
    assert!(!catalog.has("section_sub"));
    Ok(())
}

#[test]
fn test_json_sources() -> Result<()> {
    let fixture = Fixture::new("json");
    fixture.write_lang("en", r#"{"greeting": "Hello", "menu": {"open": "Open"}}"#);

    let catalog = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(catalog.raw("greeting")?, "Hello");
    assert_eq!(catalog.raw("menu_open")?, "Open");
    Ok(())
}

#[test]
fn test_quote_characters_round_trip() -> Result<()> {
    let fixture = Fixture::new("json");
    fixture.write_lang("en", r#"{"quoted": "she said \"it's done\""}"#);

    let catalog = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(catalog.raw("quoted")?, r#"she said "it's done""#);

    // Same value again through the cached artifact.
    let reloaded = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(reloaded.raw("quoted")?, r#"she said "it's done""#);
    Ok(())
}

// ==================== Cache Behavior Tests ====================

#[test]
fn test_second_resolution_reuses_artifact() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting = Hello\n");

    let first = fixture.builder().init(&RequestContext::new())?;
    let artifact_mtime = fs::metadata(first.cache_path())?.modified()?;

    let second = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(second.cache_path(), first.cache_path());
    assert_eq!(second.raw("greeting")?, "Hello");
    // Untouched source: the artifact was not rewritten.
    assert_eq!(fs::metadata(second.cache_path())?.modified()?, artifact_mtime);
    Ok(())
}

#[test]
fn test_touched_source_regenerates_artifact() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting = Hello\n");

    let first = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(first.raw("greeting")?, "Hello");

    fixture.write_lang("en", "greeting = Howdy\n");
    bump_mtime(fixture.lang_path("en"));

    let second = fixture.builder().init(&RequestContext::new())?;
    assert_eq!(second.raw("greeting")?, "Howdy");
    Ok(())
}

#[test]
fn test_artifacts_are_per_language() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting = Hello\n");
    fixture.write_lang("es", "greeting = Hola\n");

    let english = fixture.builder().init(&RequestContext::new())?;
    let spanish = fixture
        .builder()
        .init(&RequestContext::new().with_query_lang("es"))?;

    assert_ne!(english.cache_path(), spanish.cache_path());
    assert_eq!(english.raw("greeting")?, "Hello");
    assert_eq!(spanish.raw("greeting")?, "Hola");
    Ok(())
}

// ==================== Error Path Tests ====================

#[test]
fn test_no_source_file_fails_without_artifact() {
    let fixture = Fixture::new("ini");

    let err = fixture
        .builder()
        .init(&RequestContext::new())
        .expect_err("no language file exists");

    match err {
        I18nError::NotFound { candidates } => assert_eq!(candidates, vec!["en"]),
        other => panic!("expected NotFound, got {other:?}"),
    }
    // Initialization aborted before the cache layer: nothing was written.
    assert!(!Path::new(&fixture.cache_dir).exists());
}

#[test]
fn test_unsupported_extension_fails() {
    let fixture = Fixture::new("toml");
    fixture.write_lang("en", "greeting = \"Hello\"\n");

    let err = fixture
        .builder()
        .init(&RequestContext::new())
        .expect_err("toml has no registered parser");
    assert!(matches!(err, I18nError::UnsupportedFormat { .. }));
}

#[test]
fn test_malformed_source_fails() {
    let fixture = Fixture::new("json");
    fixture.write_lang("en", "{broken");

    let err = fixture
        .builder()
        .init(&RequestContext::new())
        .expect_err("broken json");
    assert!(matches!(err, I18nError::Parse { .. }));
}

#[test]
fn test_missing_key_is_lazy() -> Result<()> {
    let fixture = Fixture::new("ini");
    fixture.write_lang("en", "greeting = Hello\n");

    // Initialization succeeds even though most keys are "missing";
    // the error only surfaces on access.
    let catalog = fixture.builder().init(&RequestContext::new())?;
    assert!(matches!(
        catalog.raw("undefined_key"),
        Err(I18nError::MissingKey { .. })
    ));
    Ok(())
}
