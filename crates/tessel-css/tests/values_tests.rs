//! Integration tests for the named value parsers.

#![allow(clippy::float_cmp)]

use pretty_assertions::assert_eq;
use tessel_css::values::{
    AnimationDirection, BorderStyle, Color, Dimension, DimensionUnit, GradientStop,
    LineBreakMode, Offsets, Paint, Size, TextAlignment, TextBorderStyle, TimingFunction,
    Transform, ValueLexer,
};
use tessel_css::{
    Declaration, MediaContext, MatchContext, Origin, ParsedValue, Stylesheet, Value, ValueParser,
    ValueParserRegistry, resolve,
};
use tessel_dom::{ElementData, StyleTree};

const RED: Color = Color::rgba(255, 0, 0, 255);
const BLUE: Color = Color::rgba(0, 0, 255, 255);

fn parse(parser: &str, value: &str) -> ParsedValue {
    Declaration::from_value("test", value).parse_as(parser)
}

fn value(parser: &str, value: &str) -> Option<Value> {
    parse(parser, value).value
}

#[test]
fn test_colors() {
    assert_eq!(value("color", "red"), Some(Value::Color(RED)));
    assert_eq!(value("color", "#00f"), Some(Value::Color(BLUE)));
    assert_eq!(value("color", "#0000ff"), Some(Value::Color(BLUE)));
    assert_eq!(value("color", "rgb(255, 0, 0)"), Some(Value::Color(RED)));
    assert_eq!(value("color", "rgba(0, 0, 255, 0)"), Some(Value::Color(Color::rgba(0, 0, 255, 0))));
    assert_eq!(value("color", "rgb(100%, 0%, 0%)"), Some(Value::Color(RED)));
}

#[test]
fn test_bad_color_reports_error() {
    let parsed = parse("color", "12px");
    assert_eq!(parsed.value, None);
    assert!(!parsed.errors.is_empty());

    let parsed = parse("color", "rgb(1, 2)");
    assert_eq!(parsed.value, None);
    assert!(!parsed.errors.is_empty());
}

#[test]
fn test_dimensions_keep_units() {
    assert_eq!(
        value("dimension", "12px"),
        Some(Value::Dimension(Dimension::new(12.0, DimensionUnit::Pixels)))
    );
    assert_eq!(
        value("dimension", "50%"),
        Some(Value::Dimension(Dimension::new(50.0, DimensionUnit::Percent)))
    );
    assert_eq!(
        value("size", "10 20pt"),
        Some(Value::Size(Size {
            width: Dimension::new(10.0, DimensionUnit::Number),
            height: Dimension::points(20.0),
        }))
    );
}

#[test]
fn test_offsets_shorthand() {
    let one = Dimension::new(1.0, DimensionUnit::Number);
    let two = Dimension::new(2.0, DimensionUnit::Number);
    assert_eq!(
        value("offsets", "1 2"),
        Some(Value::Offsets(Offsets {
            top: one,
            right: two,
            bottom: one,
            left: two,
        }))
    );
}

#[test]
fn test_paints() {
    assert_eq!(value("paint", "red"), Some(Value::Paint(Paint::solid(RED))));
    assert_eq!(
        value("paint", "none"),
        Some(Value::Paint(Paint::solid(Color::TRANSPARENT)))
    );
    assert_eq!(
        value("paint", "url(\"wood.png\")"),
        Some(Value::Paint(Paint::Image {
            url: "wood.png".to_string()
        }))
    );

    let Some(Value::Paint(Paint::LinearGradient(gradient))) =
        value("paint", "linear-gradient(to right, red, blue 50%)")
    else {
        panic!("expected a linear gradient");
    };
    assert_eq!(gradient.angle, 90.0);
    assert_eq!(
        gradient.stops,
        vec![
            GradientStop {
                color: RED,
                offset: None
            },
            GradientStop {
                color: BLUE,
                offset: Some(0.5)
            },
        ]
    );
}

#[test]
fn test_shadow_list() {
    let Some(Value::Shadow(shadows)) = value("shadow", "2 3 4 red, inset 1 1") else {
        panic!("expected shadows");
    };
    assert_eq!(shadows.len(), 2);
    assert_eq!(shadows[0].blur_distance, 4.0);
    assert_eq!(shadows[0].color, RED);
    assert!(shadows[1].inset);
    assert_eq!(shadows[1].color, Color::BLACK);
    assert_eq!(value("shadow", "none"), Some(Value::Shadow(Vec::new())));
}

#[test]
fn test_border() {
    let Some(Value::Border(border)) = value("border", "solid red 1px") else {
        panic!("expected a border");
    };
    assert_eq!(border.width, Dimension::new(1.0, DimensionUnit::Pixels));
    assert_eq!(border.style, BorderStyle::Solid);
    assert_eq!(border.paint, Some(Paint::solid(RED)));
}

#[test]
fn test_animation_shorthand_list() {
    let Some(Value::List(items)) = value(
        "animation-info",
        "fade 2s ease-in 1s infinite alternate, pulse 500ms",
    ) else {
        panic!("expected an animation list");
    };
    let infos: Vec<_> = items
        .into_iter()
        .filter_map(|v| match v {
            Value::Animation(info) => Some(info),
            _ => None,
        })
        .collect();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].name.as_deref(), Some("fade"));
    assert_eq!(infos[0].duration, Some(2.0));
    assert_eq!(infos[0].delay, Some(1.0));
    assert_eq!(infos[0].timing_function, Some(TimingFunction::EaseIn));
    assert_eq!(infos[0].iteration_count, Some(f64::INFINITY));
    assert_eq!(infos[0].direction, Some(AnimationDirection::Alternate));
    assert_eq!(infos[1].duration, Some(0.5));
}

#[test]
fn test_transition() {
    let Some(Value::List(items)) = value("transition-info", "opacity 250ms linear") else {
        panic!("expected a transition list");
    };
    let Some(Value::Transition(info)) = items.first() else {
        panic!("expected a transition");
    };
    assert_eq!(info.property, "opacity");
    assert_eq!(info.duration, 0.25);
    assert_eq!(info.timing_function, TimingFunction::Linear);
}

#[test]
fn test_transform() {
    assert_eq!(
        value("transform", "translate(10, 20)"),
        Some(Value::Transform(Transform::translate(10.0, 20.0)))
    );
    assert_eq!(value("transform", "none"), Some(Value::Transform(Transform::IDENTITY)));
    assert_eq!(value("transform", "wobble(1)"), None);
}

#[test]
fn test_scalar_accessors() {
    assert!(Declaration::from_value("enabled", "yes").boolean_value());
    assert!(!Declaration::from_value("enabled", "maybe").boolean_value());
    assert_eq!(Declaration::from_value("opacity", "0.5").float_value(), 0.5);
    assert_eq!(Declaration::from_value("title", "\"Hello\"").string_value(), "Hello");
    assert_eq!(Declaration::from_value("duration", "300ms").seconds_value(), 0.3);
    assert_eq!(
        Declaration::from_value("fonts", "body, heading").name_list_value(),
        vec!["body".to_string(), "heading".to_string()]
    );
}

#[test]
fn test_text_keywords() {
    assert_eq!(
        Declaration::from_value("line-break-mode", "word-wrap").line_break_mode_value(),
        LineBreakMode::WordWrap
    );
    assert_eq!(
        Declaration::from_value("line-break-mode", "sideways").line_break_mode_value(),
        LineBreakMode::EllipsisTail
    );
    assert_eq!(
        Declaration::from_value("text-align", "CENTER").text_alignment_value(),
        TextAlignment::Center
    );
    assert_eq!(
        Declaration::from_value("border-style", "rounded-rect").text_border_style_value(),
        TextBorderStyle::RoundedRect
    );
    assert_eq!(
        Declaration::from_value("text-transform", "capitalize").transform_string("tab one"),
        "Tab One"
    );
    assert_eq!(
        Declaration::from_value("text-transform", "bogus").transform_string("as is"),
        "as is"
    );
    assert!(!parse("text-alignment", "sideways").errors.is_empty());
}

#[test]
fn test_important_is_stripped_from_value() {
    let declaration = Declaration::from_value("color", "red !important");
    assert!(declaration.important);
    assert_eq!(declaration.parse_as("color").value, Some(Value::Color(RED)));
}

struct Percent;

impl ValueParser for Percent {
    fn can_parse(&self, cursor: &ValueLexer<'_>) -> bool {
        cursor.peek().is_some_and(|l| l.number().is_some())
    }

    fn parse(&self, cursor: &mut ValueLexer<'_>) -> Option<Value> {
        let number = cursor.next_lexeme()?.number()?;
        Some(Value::Float(number / 100.0))
    }
}

#[test]
fn test_custom_parser_through_resolution() {
    let sheet = Stylesheet::parse("Gauge { fill: 40; color: red; }", Origin::Application);
    let mut tree = StyleTree::new();
    let id = tree.alloc(ElementData::new("Gauge"));
    let merged = resolve(
        &tree.node(id),
        &MatchContext::default(),
        [&sheet],
        &MediaContext::default(),
    );

    let mut registry = ValueParserRegistry::with_builtins();
    registry.register("percent", Percent);
    let parsed = merged.parse_with(&registry, "fill", "percent");
    assert_eq!(parsed.and_then(|p| p.value), Some(Value::Float(0.4)));

    // The cached path uses the shared registry, which lacks the parser.
    assert_eq!(merged.value("fill", "percent"), None);
    assert_eq!(merged.value("color", "color"), Some(Value::Color(RED)));
    assert_eq!(merged.value("missing", "color"), None);
}
