//! Integration tests for stylesheet parsing and error recovery.

use std::path::Path;

use pretty_assertions::assert_eq;
use tessel_css::parser::MAX_IMPORT_DEPTH;
use tessel_css::stylesheet::{MediaContext, MediaExpression};
use tessel_css::{MemoryLoader, Origin, SourceLoader, StyleError, Stylesheet};

fn parse(source: &str) -> Stylesheet {
    Stylesheet::parse(source, Origin::Application)
}

fn parse_file(loader: &MemoryLoader, path: &str) -> Stylesheet {
    let path = Path::new(path);
    let source = loader.load(path).unwrap_or_default();
    Stylesheet::parse_with_loader(&source, Origin::Application, Some(path), loader)
}

#[test]
fn test_one_bad_rule_among_ten() {
    let source = "
        Label { color: red; }
        Button { color: blue; }
        .primary { font-size: 12px; }
        #title { opacity: 0.5; }
        Window > Label { padding: 4px; }
        Label + Button { margin: 2px; }
        Slider ~ Label { color: green; }
        Label:hover { color: white; }
        Label > { color: black; }
        [enabled] { color: gray; }
    ";
    let sheet = parse(source);
    assert_eq!(sheet.rule_sets().len(), 9);
    assert_eq!(sheet.errors().len(), 1);
    assert!(sheet.errors()[0].is_syntax());
}

#[test]
fn test_error_location_has_line_and_column() {
    let sheet = parse("Label { color: red; }\nButton >> Label { color: blue; }");
    assert_eq!(sheet.errors().len(), 1);
    let location = sheet.errors()[0].location();
    assert_eq!(location.line, 2);
    assert!(location.to_string().starts_with("<inline>:2:"));
}

#[test]
fn test_unclosed_block_keeps_declarations() {
    let sheet = parse("Label { color: red; width: 10px");
    assert_eq!(sheet.rule_sets().len(), 1);
    assert_eq!(sheet.rule_sets()[0].declarations().len(), 2);
    assert!(sheet.errors().iter().any(StyleError::is_syntax));
}

#[test]
fn test_important_flag() {
    let sheet = parse("Label { color: red !important; width: 1px; }");
    let declarations = sheet.rule_sets()[0].declarations();
    assert!(declarations.get("color").is_some_and(|d| d.important));
    assert!(declarations.get("width").is_some_and(|d| !d.important));
    assert_eq!(
        declarations.get("color").map(|d| d.value_text()),
        Some("red".to_string())
    );
}

#[test]
fn test_property_names_are_lowercased() {
    let sheet = parse("Label { Font-Size: 12px; }");
    assert!(sheet.rule_sets()[0].declarations().contains("font-size"));
}

#[test]
fn test_media_group() {
    let sheet = parse(
        "Label { color: red; }
         @media screen and (min-device-width: 600) { Label { color: blue; } Button { color: green; } }
         Slider { color: white; }",
    );
    assert_eq!(sheet.rule_sets().len(), 2);
    assert_eq!(sheet.media_groups().len(), 1);
    let group = &sheet.media_groups()[0];
    assert_eq!(group.rule_sets.len(), 2);
    assert!(matches!(&group.query, MediaExpression::And(terms) if terms.len() == 2));

    let orders: Vec<usize> = sheet
        .all_rule_sets()
        .iter()
        .map(|r| r.source_order())
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}

#[test]
fn test_media_lengths_are_in_points() {
    let sheet = parse("@media (min-device-width: 2in) { Label { color: blue; } }");
    let query = &sheet.media_groups()[0].query;
    let narrow = MediaContext {
        device_width: 100.0,
        ..MediaContext::default()
    };
    let wide = MediaContext {
        device_width: 200.0,
        ..MediaContext::default()
    };
    assert!(!query.matches(&narrow));
    assert!(query.matches(&wide));
}

#[test]
fn test_media_rejects_nested_at_rules() {
    let sheet = parse("@media screen { @media print { Label { color: red; } } Button { color: blue; } }");
    assert!(sheet.errors().iter().any(StyleError::is_syntax));
    assert!(
        sheet.media_groups()[0]
            .rule_sets
            .iter()
            .any(|r| r.target_type_selector().and_then(|t| t.type_name.as_deref()) == Some("Button"))
    );
}

#[test]
fn test_keyframes() {
    let sheet = parse(
        "@keyframes fade { from { opacity: 0; } 50%, 75% { opacity: 0.5; } to { opacity: 1; } }",
    );
    let keyframe = sheet.keyframe("fade");
    assert!(keyframe.is_some());
    let offsets: Vec<Vec<f64>> = keyframe
        .map(|k| k.blocks.iter().map(|b| b.offsets.clone()).collect())
        .unwrap_or_default();
    assert_eq!(offsets, vec![vec![0.0], vec![0.5, 0.75], vec![1.0]]);
}

#[test]
fn test_font_face() {
    let sheet = parse("@font-face { font-family: Body; src: url(body.ttf); }");
    assert_eq!(sheet.font_faces().len(), 1);
    assert_eq!(sheet.font_faces()[0].len(), 2);
}

#[test]
fn test_namespaces() {
    let sheet = parse("@namespace \"urn:ui\"; @namespace svg \"urn:svg\"; Label { color: red; }");
    assert_eq!(sheet.default_namespace(), Some("urn:ui"));
    assert_eq!(sheet.namespace_uri("svg"), Some("urn:svg"));
}

#[test]
fn test_import_is_inlined() {
    let loader = MemoryLoader::new()
        .with_file("/styles/app.css", "@import \"base.css\";\nButton { color: blue; }")
        .with_file("/styles/base.css", "Label { color: red; }");
    let sheet = parse_file(&loader, "/styles/app.css");
    assert!(sheet.errors().is_empty());
    assert_eq!(sheet.rule_sets().len(), 2);
    assert_eq!(sheet.imported_files(), &[Path::new("/styles/base.css").to_path_buf()]);
    let first = sheet.rule_sets()[0].target_type_selector().and_then(|t| t.type_name.clone());
    assert_eq!(first.as_deref(), Some("Label"));
}

#[test]
fn test_import_errors_name_the_file() {
    let loader = MemoryLoader::new()
        .with_file("/styles/app.css", "@import \"missing.css\";\nButton { color: blue; }");
    let sheet = parse_file(&loader, "/styles/app.css");
    assert_eq!(sheet.rule_sets().len(), 1);
    assert!(matches!(
        sheet.errors(),
        [StyleError::Import { path, .. }] if path.ends_with("missing.css")
    ));
}

#[test]
fn test_circular_import_is_reported() {
    let loader = MemoryLoader::new()
        .with_file("/styles/a.css", "@import \"b.css\";\nA { color: red; }")
        .with_file("/styles/b.css", "@import \"a.css\";\nB { color: blue; }");
    let sheet = parse_file(&loader, "/styles/a.css");
    assert_eq!(sheet.rule_sets().len(), 2);
    assert!(matches!(
        sheet.errors(),
        [StyleError::Import { reason, .. }] if reason.contains("circular")
    ));
}

#[test]
fn test_import_depth_is_bounded() {
    let mut loader = MemoryLoader::new();
    for level in 0..=MAX_IMPORT_DEPTH + 1 {
        loader = loader.with_file(
            format!("/deep/{level}.css"),
            &format!("@import \"{}.css\";\nL{level} {{ color: red; }}", level + 1),
        );
    }
    let sheet = parse_file(&loader, "/deep/0.css");
    assert!(
        sheet
            .errors()
            .iter()
            .any(|e| matches!(e, StyleError::Import { reason, .. } if reason.contains("deeper")))
    );
}
