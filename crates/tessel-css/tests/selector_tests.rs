//! Integration tests for selector parsing, matching and specificity.

use pretty_assertions::assert_eq;
use tessel_css::{MatchContext, Origin, Selector, Specificity, Stylesheet, parse_selector};
use tessel_dom::{ElementData, NodeId, StyleTree};

fn selector(text: &str) -> Selector {
    match parse_selector(text) {
        Ok(selector) => selector,
        Err(error) => panic!("'{text}' should parse: {error}"),
    }
}

fn element(name: &str) -> ElementData {
    ElementData::new(name)
}

/// `window > [label × 7]`
fn make_tree(children: usize) -> (StyleTree, NodeId, Vec<NodeId>) {
    let mut tree = StyleTree::new();
    let window = tree.alloc(element("window"));
    let ids = (0..children)
        .map(|_| tree.add_child(window, element("label")))
        .collect();
    (tree, window, ids)
}

fn matching_positions(tree: &StyleTree, ids: &[NodeId], text: &str) -> Vec<usize> {
    let selector = selector(text);
    ids.iter()
        .enumerate()
        .filter(|(_, id)| selector.matches(&tree.node(**id), &MatchContext::default()))
        .map(|(index, _)| index + 1)
        .collect()
}

#[test]
fn test_nth_child_odd_positions() {
    let (tree, _, ids) = make_tree(7);
    assert_eq!(matching_positions(&tree, &ids, "label:nth-child(2n+1)"), vec![1, 3, 5, 7]);
    assert_eq!(matching_positions(&tree, &ids, "label:nth-child(odd)"), vec![1, 3, 5, 7]);
    assert_eq!(matching_positions(&tree, &ids, "label:nth-child(even)"), vec![2, 4, 6]);
}

#[test]
fn test_nth_variants() {
    let (tree, _, ids) = make_tree(7);
    assert_eq!(matching_positions(&tree, &ids, ":nth-child(3)"), vec![3]);
    assert_eq!(matching_positions(&tree, &ids, ":nth-child(-n+3)"), vec![1, 2, 3]);
    assert_eq!(matching_positions(&tree, &ids, ":nth-last-child(1)"), vec![7]);
    assert_eq!(matching_positions(&tree, &ids, ":nth-of-type(3n)"), vec![3, 6]);
}

#[test]
fn test_structural_pseudo_classes() {
    let (tree, window, ids) = make_tree(3);
    assert_eq!(matching_positions(&tree, &ids, "label:first-child"), vec![1]);
    assert_eq!(matching_positions(&tree, &ids, "label:last-child"), vec![3]);
    assert!(matching_positions(&tree, &ids, "label:only-child").is_empty());

    let context = MatchContext::default();
    assert!(selector(":root").matches(&tree.node(window), &context));
    assert!(selector("label:empty").matches(&tree.node(ids[0]), &context));
    assert!(!selector("window:empty").matches(&tree.node(window), &context));
}

#[test]
fn test_combinators() {
    let mut tree = StyleTree::new();
    let window = tree.alloc(element("window"));
    let panel = tree.add_child(window, element("panel").with_classes("sidebar"));
    let title = tree.add_child(panel, element("label").with_id("title"));
    let button = tree.add_child(panel, element("button"));
    let slider = tree.add_child(panel, element("slider"));

    let context = MatchContext::default();
    let matches = |text: &str, id: NodeId| selector(text).matches(&tree.node(id), &context);

    assert!(matches("window label", title));
    assert!(matches("window > panel > label", title));
    assert!(!matches("window > label", title));
    assert!(matches("label + button", button));
    assert!(!matches("label + slider", slider));
    assert!(matches("label ~ slider", slider));
    assert!(matches(".sidebar #title", title));
    assert!(!matches("button ~ label", title));
}

#[test]
fn test_attribute_operators() {
    let mut tree = StyleTree::new();
    let node = tree.alloc(
        element("button")
            .with_attribute("role", "primary action")
            .with_attribute("lang", "en-US")
            .with_attribute("href", "https://example.com/page.html"),
    );
    let context = MatchContext::default();
    let matches = |text: &str| selector(text).matches(&tree.node(node), &context);

    assert!(matches("[role]"));
    assert!(!matches("[missing]"));
    assert!(matches("[role~=action]"));
    assert!(!matches("[role=action]"));
    assert!(matches("[lang|=en]"));
    assert!(matches("[href^=\"https\"]"));
    assert!(matches("[href$=\".html\"]"));
    assert!(matches("[href*=example]"));
}

#[test]
fn test_pseudo_class_state() {
    let mut tree = StyleTree::new();
    let node = tree.alloc(
        element("button")
            .with_supported_pseudo_classes("normal highlighted disabled")
            .with_active_pseudo_classes("disabled"),
    );
    let hover = selector("button:highlighted");
    assert!(!hover.matches(&tree.node(node), &MatchContext::default()));
    assert!(hover.matches(&tree.node(node), &MatchContext::with_state(Some("highlighted"))));
    assert!(selector("button:disabled").matches(&tree.node(node), &MatchContext::default()));
    assert!(!selector("button:focused").matches(
        &tree.node(node),
        &MatchContext::with_state(Some("focused"))
    ));
}

#[test]
fn test_pseudo_element_needs_request() {
    let mut tree = StyleTree::new();
    let node = tree.alloc(element("slider").with_pseudo_elements("thumb track"));
    let thumb = selector("slider::thumb");
    let element_context = MatchContext::default();
    let thumb_context = MatchContext {
        pseudo_state: None,
        pseudo_element: Some("thumb"),
    };
    assert!(!thumb.matches(&tree.node(node), &element_context));
    assert!(thumb.matches(&tree.node(node), &thumb_context));
    assert!(!selector("slider").matches(&tree.node(node), &thumb_context));
}

#[test]
fn test_not() {
    let mut tree = StyleTree::new();
    let node = tree.alloc(element("button").with_classes("primary"));
    let context = MatchContext::default();
    assert!(selector("button:not(.secondary)").matches(&tree.node(node), &context));
    assert!(!selector("button:not(.primary)").matches(&tree.node(node), &context));
}

#[test]
fn test_specificity_ordering() {
    let id = selector("#title").specificity();
    let classes = selector(".a.b.c.d").specificity();
    let element = selector("window label").specificity();
    assert!(id > classes);
    assert!(classes > element);
    assert_eq!(selector("window > label.a#b:hover").specificity(), Specificity::new(0, 1, 2, 2));
    assert_eq!(selector("*").specificity(), Specificity::default());
}

#[test]
fn test_display_is_reparseable() {
    for text in ["window > label.title", "button:not(.primary)", "label ~ slider[role=\"x\"]"] {
        let printed = selector(text).to_string();
        assert_eq!(selector(&printed), selector(text), "{printed}");
    }
}

#[test]
fn test_display_keeps_written_namespace() {
    assert_eq!(selector("*|label").to_string(), "*|label");
    assert_eq!(selector("|label").to_string(), "|label");
    assert_eq!(selector("label").to_string(), "label");

    let sheet = Stylesheet::parse(
        "@namespace \"urn:ui\"; *|label { color: red; } button { color: blue; }",
        Origin::Application,
    );
    let printed: Vec<String> = sheet
        .rule_sets()
        .iter()
        .map(|r| r.selectors()[0].to_string())
        .collect();
    assert_eq!(printed, vec!["*|label".to_string(), "button".to_string()]);
}

#[test]
fn test_invalid_selectors() {
    for text in ["", "label >", "label:nth-child(2n+)", ":hover()", "[role"] {
        assert!(parse_selector(text).is_err(), "'{text}' should not parse");
    }
}
