//! Integration tests for the stylesheet registry, reloading and configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tessel_css::config::ConfigError;
use tessel_css::{
    MergedDeclarations, Origin, ParseErrorDestination, StyleConfig, StyleError, StyleResolver,
    StylesheetRegistry,
};
use tessel_dom::{ElementData, StyleTree};

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn color(merged: &MergedDeclarations) -> Option<String> {
    merged.get("color").map(|d| d.value_text())
}

fn label_color(resolver: &StyleResolver) -> Option<String> {
    let mut tree = StyleTree::new();
    let id = tree.alloc(ElementData::new("label"));
    color(&resolver.resolve(&tree.node(id), None))
}

#[test]
fn test_load_file_installs_and_caches() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.css", "label { color: red; }");
    let registry = StylesheetRegistry::new();

    let first = registry.load_file(&path, Origin::Application).unwrap();
    let second = registry.load_file(&path, Origin::Application).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.rule_sets().len(), 1);
    assert!(
        registry
            .stylesheet(Origin::Application)
            .is_some_and(|s| Arc::ptr_eq(&s, &first))
    );
}

#[test]
fn test_missing_file_changes_nothing() {
    let registry = StylesheetRegistry::new();
    let before = registry.generation();
    let result = registry.load_file(Path::new("/definitely/not/here.css"), Origin::User);
    assert!(matches!(result, Err(StyleError::Import { .. })));
    assert_eq!(registry.generation(), before);
    assert!(registry.stylesheet(Origin::User).is_none());
}

#[test]
fn test_reload_applies_new_content() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.css", "label { color: red; }");
    let registry = Arc::new(StylesheetRegistry::new());
    let _ = registry.load_file(&path, Origin::Application).unwrap();
    let resolver = StyleResolver::new(Arc::clone(&registry), StyleConfig::default());
    assert_eq!(label_color(&resolver).as_deref(), Some("red"));

    let generation = registry.generation();
    let _ = write(&dir, "app.css", "label { color: green; }");
    assert_eq!(registry.reload(&path).unwrap(), 1);
    assert!(registry.generation() > generation);
    assert_eq!(label_color(&resolver).as_deref(), Some("green"));
}

#[test]
fn test_reload_through_import() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.css", "label { color: red; }");
    let app = write(&dir, "app.css", "@import \"base.css\";\nbutton { color: blue; }");
    let registry = StylesheetRegistry::new();
    let _ = registry.load_file(&app, Origin::Application).unwrap();

    let watched = registry.watched_paths();
    assert_eq!(watched.len(), 2);

    let _ = write(&dir, "base.css", "label { color: purple; }");
    assert_eq!(registry.reload(&base).unwrap(), 1);
    let sheet = registry.stylesheet(Origin::Application).unwrap();
    let first = sheet.rule_sets()[0].declarations().get("color").map(|d| d.value_text());
    assert_eq!(first.as_deref(), Some("purple"));
}

#[test]
fn test_reload_of_unrelated_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.css", "label { color: red; }");
    let other = write(&dir, "other.css", "label { color: blue; }");
    let registry = StylesheetRegistry::new();
    let _ = registry.load_file(&path, Origin::Application).unwrap();
    let generation = registry.generation();
    assert_eq!(registry.reload(&other).unwrap(), 0);
    assert_eq!(registry.generation(), generation);
}

#[test]
fn test_snapshots_are_isolated() {
    let registry = StylesheetRegistry::new();
    let old_sheet = registry.load_source("label { color: red; }", Origin::Application);
    let old = registry.snapshot();

    let _ = registry.load_source("label { color: blue; }", Origin::Application);
    let _ = registry.load_source("label { color: white; }", Origin::User);

    assert!(
        old.stylesheet(Origin::Application)
            .is_some_and(|s| Arc::ptr_eq(s, &old_sheet))
    );
    assert!(old.stylesheet(Origin::User).is_none());
    assert!(registry.snapshot().generation() > old.generation());
    assert_eq!(registry.active_stylesheets().len(), 2);
}

#[test]
fn test_clear_origin_and_clear() {
    let registry = StylesheetRegistry::new();
    let _ = registry.load_source("label { color: red; }", Origin::Application);
    let _ = registry.load_source("label { color: blue; }", Origin::View);

    registry.clear_origin(Origin::View);
    assert!(registry.stylesheet(Origin::View).is_none());
    assert!(registry.stylesheet(Origin::Application).is_some());

    registry.clear();
    assert!(registry.active_stylesheets().is_empty());
}

#[test]
fn test_resolver_sees_cleared_origin() {
    let registry = Arc::new(StylesheetRegistry::new());
    let _ = registry.load_source("label { color: red; }", Origin::Application);
    let _ = registry.load_source("label { color: blue; }", Origin::User);
    let resolver = StyleResolver::new(Arc::clone(&registry), StyleConfig::default());
    assert_eq!(label_color(&resolver).as_deref(), Some("blue"));

    registry.clear_origin(Origin::User);
    assert_eq!(label_color(&resolver).as_deref(), Some("red"));
}

#[test]
fn test_config_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "tessel.json",
        r#"{ "parse-error-destination": "console", "style-cache-capacity": 8, "media": { "media-type": "print" } }"#,
    );
    let config = StyleConfig::from_json_file(&path).unwrap();
    assert_eq!(config.parse_error_destination, ParseErrorDestination::Console);
    assert_eq!(config.style_cache_capacity, 8);
    assert_eq!(config.media.media_type, "print");
    assert!(config.cache_styles);

    let missing = StyleConfig::from_json_file(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}
