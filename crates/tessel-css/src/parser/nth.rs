//! [§ 6.6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)

/// Parse `an+b`, `odd` or `even` into `(a, b)`.
///
/// Whitespace is ignored anywhere. Returns `None` for anything else.
///
/// ```
/// use tessel_css::parser::parse_an_plus_b;
///
/// assert_eq!(parse_an_plus_b("2n+1"), Some((2, 1)));
/// assert_eq!(parse_an_plus_b("even"), Some((2, 0)));
/// assert_eq!(parse_an_plus_b("-n + 3"), Some((-1, 3)));
/// assert_eq!(parse_an_plus_b("5"), Some((0, 5)));
/// ```
#[must_use]
pub fn parse_an_plus_b(text: &str) -> Option<(i32, i32)> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        "" => return None,
        _ => {}
    }

    let Some(n_at) = compact.find('n') else {
        return Some((0, parse_integer(&compact)?));
    };

    let modulus = match &compact[..n_at] {
        "" | "+" => 1,
        "-" => -1,
        coefficient => parse_integer(coefficient)?,
    };

    let rest = &compact[n_at + 1..];
    let remainder = if rest.is_empty() {
        0
    } else if rest.starts_with(['+', '-']) {
        parse_integer(rest)?
    } else {
        return None;
    };

    Some((modulus, remainder))
}

/// A signed integer; rejects `+-3` and similar.
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
