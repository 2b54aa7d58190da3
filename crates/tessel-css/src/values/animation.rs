//! Animation and transition descriptors.
//!
//! [CSS Animations Level 1](https://www.w3.org/TR/css-animations-1/) and
//! [CSS Transitions](https://www.w3.org/TR/css-transitions-1/)

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::dimension::Dimension;
use super::ValueLexer;
use crate::lexer::TokenKind;

/// [§ 2 Easing functions](https://www.w3.org/TR/css-easing-1/#easing-functions)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingFunction {
    /// `ease`, the initial value.
    #[default]
    Ease,
    /// `linear`
    Linear,
    /// `ease-in`
    EaseIn,
    /// `ease-out`
    EaseOut,
    /// `ease-in-out`
    EaseInOut,
    /// `step-start`
    StepStart,
    /// `step-end`
    StepEnd,
    /// `steps(count[, start | end])`
    Steps {
        /// Number of intervals.
        count: u32,
        /// Jump at the start of each interval instead of the end.
        jump_start: bool,
    },
    /// `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl TimingFunction {
    fn from_keyword(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "ease" => Self::Ease,
            "linear" => Self::Linear,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "step-start" => Self::StepStart,
            "step-end" => Self::StepEnd,
            _ => return None,
        })
    }
}

/// [§ 3.6 'animation-direction'](https://www.w3.org/TR/css-animations-1/#animation-direction)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AnimationDirection {
    /// Every iteration plays forwards.
    #[default]
    Normal,
    /// Every iteration plays backwards.
    Reverse,
    /// Odd iterations forwards, even backwards.
    Alternate,
    /// Odd iterations backwards, even forwards.
    AlternateReverse,
}

/// [§ 3.9 'animation-fill-mode'](https://www.w3.org/TR/css-animations-1/#animation-fill-mode)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AnimationFillMode {
    /// No styles outside the active period.
    #[default]
    None,
    /// Keep the final keyframe after the end.
    Forwards,
    /// Apply the first keyframe during the delay.
    Backwards,
    /// Both of the above.
    Both,
}

/// [§ 3.7 'animation-play-state'](https://www.w3.org/TR/css-animations-1/#animation-play-state)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AnimationPlayState {
    /// Playing.
    #[default]
    Running,
    /// Paused.
    Paused,
}

/// One entry of the `animation` shorthand.
///
/// Fields left `None` were not given; [`set_undefined_properties`]
/// fills them from another descriptor and [`with_initial_values`] from the
/// CSS initial values.
///
/// [`set_undefined_properties`]: Self::set_undefined_properties
/// [`with_initial_values`]: Self::with_initial_values
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnimationInfo {
    /// `@keyframes` name; `none` disables the animation.
    pub name: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    /// Easing between keyframes.
    pub timing_function: Option<TimingFunction>,
    /// Iterations; `infinite` is [`f64::INFINITY`].
    pub iteration_count: Option<f64>,
    /// Playback direction.
    pub direction: Option<AnimationDirection>,
    /// Running or paused.
    pub play_state: Option<AnimationPlayState>,
    /// Delay in seconds.
    pub delay: Option<f64>,
    /// Fill behavior.
    pub fill_mode: Option<AnimationFillMode>,
}

impl AnimationInfo {
    /// Whether the descriptor names an animation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.is_empty() && !name.eq_ignore_ascii_case("none"))
    }

    /// Copy every field set on `other` that is unset here.
    pub fn set_undefined_properties(&mut self, other: &Self) {
        fn fill<T: Clone>(slot: &mut Option<T>, from: Option<&T>) {
            if slot.is_none() {
                *slot = from.cloned();
            }
        }
        fill(&mut self.name, other.name.as_ref());
        fill(&mut self.duration, other.duration.as_ref());
        fill(&mut self.timing_function, other.timing_function.as_ref());
        fill(&mut self.iteration_count, other.iteration_count.as_ref());
        fill(&mut self.direction, other.direction.as_ref());
        fill(&mut self.play_state, other.play_state.as_ref());
        fill(&mut self.delay, other.delay.as_ref());
        fill(&mut self.fill_mode, other.fill_mode.as_ref());
    }

    /// Fill unset fields with the CSS initial values.
    #[must_use]
    pub fn with_initial_values(mut self) -> Self {
        self.set_undefined_properties(&Self {
            name: Some("none".to_string()),
            duration: Some(0.0),
            timing_function: Some(TimingFunction::Ease),
            iteration_count: Some(1.0),
            direction: Some(AnimationDirection::Normal),
            play_state: Some(AnimationPlayState::Running),
            delay: Some(0.0),
            fill_mode: Some(AnimationFillMode::None),
        });
        self
    }
}

/// One entry of the `transition` shorthand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionInfo {
    /// Transitioned property; `all` by default.
    pub property: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Easing.
    pub timing_function: TimingFunction,
    /// Delay in seconds.
    pub delay: f64,
}

impl Default for TransitionInfo {
    fn default() -> Self {
        Self {
            property: "all".to_string(),
            duration: 0.0,
            timing_function: TimingFunction::Ease,
            delay: 0.0,
        }
    }
}

/// A duration: `ms`, `s`, or a bare number of seconds.
pub fn parse_seconds(cursor: &mut ValueLexer<'_>) -> Option<f64> {
    let lexeme = cursor.peek()?;
    if !matches!(lexeme.kind, TokenKind::Time | TokenKind::Number) {
        return None;
    }
    let seconds = Dimension::from_lexeme(lexeme)?.to_seconds();
    let _ = cursor.next_lexeme();
    Some(seconds)
}

/// A keyword, `steps()` or `cubic-bezier()`.
pub fn parse_timing_function(cursor: &mut ValueLexer<'_>) -> Option<TimingFunction> {
    if cursor.at_function("steps") {
        let start = cursor.position();
        let _ = cursor.next_lexeme();
        let _ = cursor.next_lexeme();
        let count = cursor.number().filter(|n| *n >= 1.0 && n.fract() == 0.0);
        let Some(count) = count else {
            cursor.error("steps() needs a positive integer");
            cursor.rewind(start);
            return None;
        };
        let jump_start = if cursor.eat(TokenKind::Comma) {
            if cursor.eat_ident("start") {
                true
            } else if cursor.eat_ident("end") {
                false
            } else {
                cursor.error("expected 'start' or 'end'");
                return None;
            }
        } else {
            false
        };
        let _ = cursor.expect(TokenKind::RightParen, "')' after steps()")?;
        // Checked to be a positive integer above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count.min(f64::from(u32::MAX)) as u32;
        return Some(TimingFunction::Steps { count, jump_start });
    }

    if cursor.at_function("cubic-bezier") {
        let _ = cursor.next_lexeme();
        let _ = cursor.next_lexeme();
        let mut points = Vec::with_capacity(4);
        while points.len() < 4 {
            let Some(value) = cursor.number() else { break };
            points.push(value);
            let _ = cursor.eat(TokenKind::Comma);
        }
        let _ = cursor.expect(TokenKind::RightParen, "')' after cubic-bezier()")?;
        let &[x1, y1, x2, y2] = points.as_slice() else {
            cursor.error("cubic-bezier() takes four numbers");
            return None;
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            cursor.error("cubic-bezier() x values must be in [0, 1]");
            return None;
        }
        return Some(TimingFunction::CubicBezier { x1, y1, x2, y2 });
    }

    let function = TimingFunction::from_keyword(cursor.peek()?.ident()?)?;
    let _ = cursor.next_lexeme();
    Some(function)
}

/// Parse a keyword enum such as [`AnimationDirection`].
pub(crate) fn parse_keyword<T: FromStr>(cursor: &mut ValueLexer<'_>) -> Option<T> {
    let value = T::from_str(cursor.peek()?.ident()?).ok()?;
    let _ = cursor.next_lexeme();
    Some(value)
}

/// One `animation` shorthand entry: the first time is the duration, the
/// second the delay; anything unrecognized is the name.
pub fn parse_animation_info(cursor: &mut ValueLexer<'_>) -> Option<AnimationInfo> {
    let mut info = AnimationInfo::default();
    while !cursor.is_at_end() {
        if let Some(seconds) = parse_seconds_unit(cursor) {
            if info.duration.is_none() {
                info.duration = Some(seconds);
            } else if info.delay.is_none() {
                info.delay = Some(seconds);
            } else {
                cursor.error("too many times in animation");
                return None;
            }
        } else if let Some(count) = cursor.number() {
            info.iteration_count = Some(count);
        } else if cursor.eat_ident("infinite") {
            info.iteration_count = Some(f64::INFINITY);
        } else if let Some(function) = parse_timing_function(cursor) {
            info.timing_function = Some(function);
        } else if let Some(direction) = parse_keyword(cursor) {
            info.direction = Some(direction);
        } else if let Some(play_state) = parse_keyword(cursor) {
            info.play_state = Some(play_state);
        } else if info.name.is_none() && cursor.peek().is_some_and(|l| l.is_ident("none")) {
            info.name = cursor.ident().map(str::to_string);
        } else if let Some(fill_mode) = parse_keyword(cursor) {
            info.fill_mode = Some(fill_mode);
        } else if info.name.is_none() && cursor.peek().and_then(|l| l.ident()).is_some() {
            info.name = cursor.ident().map(str::to_string);
        } else if info.name.is_none() && cursor.at(TokenKind::String) {
            info.name = cursor
                .next_lexeme()
                .and_then(|l| l.text_value())
                .map(str::to_string);
        } else {
            cursor.error("unexpected value in animation");
            return None;
        }
    }
    Some(info)
}

/// One `transition` shorthand entry.
pub fn parse_transition_info(cursor: &mut ValueLexer<'_>) -> Option<TransitionInfo> {
    let mut info = TransitionInfo::default();
    let (mut has_duration, mut has_property) = (false, false);
    while !cursor.is_at_end() {
        if let Some(seconds) = parse_seconds_unit(cursor) {
            if has_duration {
                info.delay = seconds;
            } else {
                info.duration = seconds;
                has_duration = true;
            }
        } else if let Some(function) = parse_timing_function(cursor) {
            info.timing_function = function;
        } else if !has_property && cursor.peek().and_then(|l| l.ident()).is_some() {
            info.property = cursor.ident().map(str::to_ascii_lowercase).unwrap_or_default();
            has_property = true;
        } else {
            cursor.error("unexpected value in transition");
            return None;
        }
    }
    Some(info)
}

/// A time with an explicit unit; bare numbers are iteration counts in
/// the shorthands.
fn parse_seconds_unit(cursor: &mut ValueLexer<'_>) -> Option<f64> {
    if cursor.at(TokenKind::Time) {
        parse_seconds(cursor)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex_all;

    fn animation(text: &str) -> Option<AnimationInfo> {
        let lexemes = lex_all(text, 1);
        parse_animation_info(&mut ValueLexer::new(&lexemes))
    }

    #[test]
    fn test_animation_shorthand() {
        let info = animation("spin 500ms linear 1s infinite alternate forwards");
        assert_eq!(
            info,
            Some(AnimationInfo {
                name: Some("spin".to_string()),
                duration: Some(0.5),
                timing_function: Some(TimingFunction::Linear),
                iteration_count: Some(f64::INFINITY),
                direction: Some(AnimationDirection::Alternate),
                play_state: None,
                delay: Some(1.0),
                fill_mode: Some(AnimationFillMode::Forwards),
            })
        );
        assert!(info.is_some_and(|i| i.is_valid()));
    }

    #[test]
    fn test_animation_none_is_invalid() {
        let info = animation("none").map(AnimationInfo::with_initial_values);
        assert!(info.as_ref().is_some_and(|i| !i.is_valid()));
        assert_eq!(info.and_then(|i| i.iteration_count), Some(1.0));
    }

    #[test]
    fn test_steps_and_cubic_bezier() {
        let lexemes = lex_all("steps(4, start)", 1);
        assert_eq!(
            parse_timing_function(&mut ValueLexer::new(&lexemes)),
            Some(TimingFunction::Steps {
                count: 4,
                jump_start: true
            })
        );

        let lexemes = lex_all("cubic-bezier(0.1, 0.7, 1.0, 0.1)", 1);
        assert!(matches!(
            parse_timing_function(&mut ValueLexer::new(&lexemes)),
            Some(TimingFunction::CubicBezier { .. })
        ));

        let lexemes = lex_all("cubic-bezier(2, 0, 1, 0)", 1);
        assert_eq!(parse_timing_function(&mut ValueLexer::new(&lexemes)), None);
    }

    #[test]
    fn test_set_undefined_properties() {
        let mut info = AnimationInfo {
            name: Some("fade".to_string()),
            ..AnimationInfo::default()
        };
        info.set_undefined_properties(&AnimationInfo {
            name: Some("other".to_string()),
            duration: Some(2.0),
            ..AnimationInfo::default()
        });
        assert_eq!(info.name.as_deref(), Some("fade"));
        assert_eq!(info.duration, Some(2.0));
    }
}
