//! Integration tests for the cascade, the resolution cache and the resolver.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tessel_css::cascade::{CacheKey, CacheTag};
use tessel_css::stylesheet::Orientation;
use tessel_css::values::Color;
use tessel_css::{
    MatchContext, MediaContext, MergedDeclarations, Origin, RuleSet, StyleConfig, StyleResolver,
    Stylesheet, StylesheetParser, StylesheetRegistry, MemoryLoader, Value, resolve,
};
use tessel_dom::{ElementData, NodeId, StyleTree};

fn parse(source: &str, origin: Origin) -> Stylesheet {
    Stylesheet::parse(source, origin)
}

fn text(merged: &MergedDeclarations, property: &str) -> Option<String> {
    merged.get(property).map(|d| d.value_text())
}

fn resolve_one(sheets: &[&Stylesheet], data: ElementData) -> MergedDeclarations {
    let mut tree = StyleTree::new();
    let id = tree.alloc(data);
    resolve(
        &tree.node(id),
        &MatchContext::default(),
        sheets.iter().copied(),
        &MediaContext::default(),
    )
}

fn resolver(source: &str) -> StyleResolver {
    let registry = Arc::new(StylesheetRegistry::new());
    let _ = registry.load_source(source, Origin::Application);
    StyleResolver::new(registry, StyleConfig::default())
}

/// `window > panel > [label, button]`
fn make_tree() -> (StyleTree, NodeId, NodeId, NodeId) {
    let mut tree = StyleTree::new();
    let window = tree.alloc(ElementData::new("window"));
    let panel = tree.add_child(window, ElementData::new("panel"));
    let label = tree.add_child(panel, ElementData::new("label").with_classes("title"));
    let _ = tree.add_child(panel, ElementData::new("button"));
    (tree, window, panel, label)
}

#[test]
fn test_id_beats_class_beats_element() {
    let sheet = parse(
        "#title { color: red; } .label { color: blue; } Label { color: green; }",
        Origin::Application,
    );
    let merged = resolve_one(
        &[&sheet],
        ElementData::new("Label").with_id("title").with_classes("label"),
    );
    assert_eq!(text(&merged, "color").as_deref(), Some("red"));
    assert_eq!(
        merged.value("color", "color"),
        Some(Value::Color(Color::rgba(255, 0, 0, 255)))
    );
}

#[test]
fn test_id_wins_regardless_of_source_order() {
    let sheet = parse(
        "#title { color: red; } .label { color: blue; }",
        Origin::Application,
    );
    let reversed = parse(
        ".label { color: blue; } #title { color: red; }",
        Origin::Application,
    );
    for sheet in [&sheet, &reversed] {
        let merged = resolve_one(&[sheet], ElementData::new("Label").with_id("title").with_classes("label"));
        assert_eq!(text(&merged, "color").as_deref(), Some("red"));
    }
}

#[test]
fn test_later_rule_wins_tie() {
    let sheet = parse(".a { color: red; } .b { color: blue; }", Origin::Application);
    let merged = resolve_one(&[&sheet], ElementData::new("Label").with_classes("a b"));
    assert_eq!(text(&merged, "color").as_deref(), Some("blue"));
}

#[test]
fn test_important_beats_specificity() {
    let sheet = parse(
        "#title { color: red; } Label { color: green !important; }",
        Origin::Application,
    );
    let merged = resolve_one(&[&sheet], ElementData::new("Label").with_id("title"));
    assert_eq!(text(&merged, "color").as_deref(), Some("green"));
}

#[test]
fn test_important_among_important_uses_specificity() {
    let sheet = parse(
        "#title { color: red !important; } Label { color: green !important; }",
        Origin::Application,
    );
    let merged = resolve_one(&[&sheet], ElementData::new("Label").with_id("title"));
    assert_eq!(text(&merged, "color").as_deref(), Some("red"));
}

#[test]
fn test_origin_dominates() {
    let application = parse("#title { color: red !important; }", Origin::Application);
    let user = parse("Label { color: blue; }", Origin::User);
    let view = parse("* { width: 10; }", Origin::View);
    let merged = resolve_one(&[&view, &application, &user], ElementData::new("Label").with_id("title"));
    assert_eq!(text(&merged, "color").as_deref(), Some("blue"));
    assert_eq!(text(&merged, "width").as_deref(), Some("10"));
}

#[test]
fn test_properties_merge_across_rule_sets() {
    let sheet = parse(
        "Label { color: red; width: 10; } .a { height: 5; } #b { color: blue; }",
        Origin::Application,
    );
    let merged = resolve_one(&[&sheet], ElementData::new("Label").with_classes("a").with_id("b"));
    assert_eq!(merged.len(), 3);
    assert_eq!(text(&merged, "color").as_deref(), Some("blue"));
    let specificities: Vec<_> = merged.rule_sets().iter().map(|r| r.specificity()).collect();
    let mut sorted = specificities.clone();
    sorted.sort();
    assert_eq!(specificities, sorted);
}

#[test]
fn test_unmatched_node_resolves_to_nothing() {
    let sheet = parse("Button { color: red; }", Origin::Application);
    let merged = resolve_one(&[&sheet], ElementData::new("Label"));
    assert!(merged.is_empty());
    assert!(merged.rule_sets().is_empty());
}

#[test]
fn test_media_groups_are_gated() {
    let sheet = parse(
        "Label { color: red; } @media (orientation: landscape) { Label { color: blue; } }",
        Origin::Application,
    );
    let mut tree = StyleTree::new();
    let id = tree.alloc(ElementData::new("Label"));
    let node = tree.node(id);

    let portrait = MediaContext::default();
    let landscape = MediaContext {
        orientation: Orientation::Landscape,
        ..MediaContext::default()
    };
    let context = MatchContext::default();
    let merged = resolve(&node, &context, [&sheet], &portrait);
    assert_eq!(text(&merged, "color").as_deref(), Some("red"));
    let merged = resolve(&node, &context, [&sheet], &landscape);
    assert_eq!(text(&merged, "color").as_deref(), Some("blue"));
}

#[test]
fn test_pseudo_state_selects_rules() {
    let sheet = parse(
        "Button { color: black; } Button:highlighted { color: white; }",
        Origin::Application,
    );
    let mut tree = StyleTree::new();
    let id = tree.alloc(ElementData::new("Button").with_supported_pseudo_classes("normal highlighted"));
    let node = tree.node(id);
    let media = MediaContext::default();

    let normal = resolve(&node, &MatchContext::with_state(None), [&sheet], &media);
    let highlighted = resolve(&node, &MatchContext::with_state(Some("highlighted")), [&sheet], &media);
    assert_eq!(text(&normal, "color").as_deref(), Some("black"));
    assert_eq!(text(&highlighted, "color").as_deref(), Some("white"));
}

#[test]
fn test_rule_set_merge() {
    let sheet = parse(
        "Label { color: red; width: 1; } Label.a { color: blue; } Label { width: 2 !important; }",
        Origin::User,
    );
    let merged = RuleSet::merge(sheet.rule_sets());
    assert_eq!(merged.origin(), Origin::User);
    let declarations = merged.declarations();
    assert_eq!(declarations.get("color").map(|d| d.value_text()).as_deref(), Some("blue"));
    assert_eq!(declarations.get("width").map(|d| d.value_text()).as_deref(), Some("2"));
}

#[test]
fn test_cache_hit_returns_same_object() {
    let resolver = resolver("label { color: red; }");
    let (tree, _, _, label) = make_tree();
    let node = tree.node(label);

    let first = resolver.resolve(&node, None);
    let second = resolver.resolve(&node, None);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(resolver.cache().stats().hits, 1);

    resolver.invalidate(&node);
    let third = resolver.resolve(&node, None);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}

#[test]
fn test_cache_is_keyed_by_state() {
    let resolver = resolver("label { color: red; } label:pressed { color: blue; }");
    let (tree, _, _, label) = make_tree();
    let node = tree.node(label);

    let normal = resolver.resolve(&node, None);
    let pressed = resolver.resolve(&node, Some("pressed"));
    assert!(!Arc::ptr_eq(&normal, &pressed));
    assert_eq!(text(&pressed, "color").as_deref(), Some("blue"));
    assert_eq!(resolver.cache().len(), 2);
}

#[test]
fn test_invalidate_descendants() {
    let resolver = resolver("* { color: red; }");
    let (tree, window, panel, label) = make_tree();
    for id in [window, panel, label] {
        let _ = resolver.resolve(&tree.node(id), None);
    }
    assert_eq!(resolver.cache().len(), 3);

    resolver.invalidate_descendants(&tree.node(panel));
    assert_eq!(resolver.cache().len(), 1);

    resolver.invalidate(&tree.node(window));
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_node_changes_need_explicit_invalidation() {
    let resolver = resolver("label { color: red; } .urgent { color: orange; }");
    let (mut tree, _, _, label) = make_tree();
    let before = resolver.resolve(&tree.node(label), None);
    assert_eq!(text(&before, "color").as_deref(), Some("red"));

    if let Some(data) = tree.element_mut(label) {
        data.style_classes.push("urgent".to_string());
    }
    // The class set is part of the key, so the changed node misses the cache.
    let after = resolver.resolve(&tree.node(label), None);
    assert_eq!(text(&after, "color").as_deref(), Some("orange"));
}

#[test]
fn test_registry_change_recomputes() {
    let resolver = resolver("label { color: red; }");
    let (tree, _, _, label) = make_tree();
    let node = tree.node(label);
    let first = resolver.resolve(&node, None);

    let _ = resolver
        .registry()
        .load_source("label { color: blue; }", Origin::User);
    let second = resolver.resolve(&node, None);
    assert_eq!(text(&first, "color").as_deref(), Some("red"));
    assert_eq!(text(&second, "color").as_deref(), Some("blue"));
}

#[test]
fn test_inline_styles_are_highest_and_uncached() {
    let resolver = resolver("#title { color: red !important; }");
    let mut tree = StyleTree::new();
    let id = tree.alloc(ElementData::new("label").with_id("title"));
    let node = tree.node(id);
    let inline = StylesheetParser::new(&MemoryLoader::new()).parse_inline("color: purple");

    let merged = resolver.resolve_with_inline(&node, None, &inline);
    assert_eq!(text(&merged, "color").as_deref(), Some("purple"));
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_disabled_cache() {
    let registry = Arc::new(StylesheetRegistry::new());
    let _ = registry.load_source("label { color: red; }", Origin::Application);
    let config = StyleConfig {
        cache_styles: false,
        ..StyleConfig::default()
    };
    let resolver = StyleResolver::new(registry, config);
    let (tree, _, _, label) = make_tree();
    let first = resolver.resolve(&tree.node(label), None);
    let second = resolver.resolve(&tree.node(label), None);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(resolver.cache().is_empty());
    assert!(!resolver.configuration().cache_styles);
}

#[test]
fn test_set_media_clears_cache() {
    let resolver = resolver("label { color: red; } @media print { label { color: black; } }");
    let (tree, _, _, label) = make_tree();
    let node = tree.node(label);
    assert_eq!(text(&resolver.resolve(&node, None), "color").as_deref(), Some("red"));

    resolver.set_media(MediaContext {
        media_type: "print".to_string(),
        ..MediaContext::default()
    });
    assert!(resolver.cache().is_empty());
    assert_eq!(text(&resolver.resolve(&node, None), "color").as_deref(), Some("black"));
}

#[test]
fn test_late_insert_from_old_media_is_ignored() {
    let resolver = resolver("label { color: red; } @media print { label { color: black; } }");
    let (tree, _, _, label) = make_tree();
    let node = tree.node(label);
    let screen = resolver.resolve(&node, None);
    assert_eq!(text(&screen, "color").as_deref(), Some("red"));

    resolver.set_media(MediaContext {
        media_type: "print".to_string(),
        ..MediaContext::default()
    });
    // A resolution that started before the media change finishes after it.
    let old_tag = CacheTag {
        registry: resolver.registry().generation(),
        media: 0,
    };
    resolver
        .cache()
        .insert(CacheKey::for_node(&node, &MatchContext::default()), old_tag, screen);

    assert_eq!(text(&resolver.resolve(&node, None), "color").as_deref(), Some("black"));
    assert_eq!(text(&resolver.resolve(&node, None), "color").as_deref(), Some("black"));
}
