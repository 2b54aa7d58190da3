//! Integration tests for the context-sensitive stylesheet lexer.

use pretty_assertions::assert_eq;
use tessel_css::lexer::{StylesheetLexer, TokenKind, lex_all};

fn kinds(source: &str, nesting: usize) -> Vec<TokenKind> {
    lex_all(source, nesting).iter().map(|l| l.kind).collect()
}

#[test]
fn test_auto_depends_on_nesting() {
    assert_eq!(kinds("auto", 0), vec![TokenKind::Identifier]);
    assert_eq!(kinds("auto", 1), vec![TokenKind::Keyword]);
}

#[test]
fn test_hash_is_id_or_color() {
    assert_eq!(kinds("#abc", 0), vec![TokenKind::Id]);
    assert_eq!(kinds("#abc", 1), vec![TokenKind::HexColor]);
}

#[test]
fn test_nesting_follows_braces_when_driven() {
    let mut lexer = StylesheetLexer::new("Label { width: auto; }");
    let mut seen = Vec::new();
    while let Some(lexeme) = lexer.next_lexeme() {
        match lexeme.kind {
            TokenKind::LeftBrace => lexer.increase_nesting(),
            TokenKind::RightBrace => lexer.decrease_nesting(),
            _ => {}
        }
        seen.push(lexeme.kind);
    }
    assert_eq!(
        seen,
        vec![
            TokenKind::Identifier,
            TokenKind::LeftBrace,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Keyword,
            TokenKind::Semicolon,
            TokenKind::RightBrace,
        ]
    );
    assert_eq!(lexer.nesting(), 0);
}

#[test]
fn test_whitespace_is_a_flag() {
    let lexemes = lex_all("Window  Label", 0);
    assert_eq!(lexemes.len(), 2);
    assert!(!lexemes[0].follows_whitespace());
    assert!(lexemes[1].follows_whitespace());
}

#[test]
fn test_pushback_returns_same_lexeme() {
    let mut lexer = StylesheetLexer::new(".a .b");
    let first = lexer.next_lexeme();
    assert!(first.is_some());
    if let Some(lexeme) = first.clone() {
        lexer.push_lexeme(lexeme);
    }
    assert_eq!(lexer.next_lexeme(), first);
}

#[test]
fn test_push_source_resumes_outer_text() {
    let mut lexer = StylesheetLexer::new("A B");
    let a = lexer.next_lexeme();
    assert!(a.is_some_and(|l| l.is_ident("A")));
    lexer.push_source("C");
    let rest: Vec<String> = std::iter::from_fn(|| lexer.next_lexeme())
        .map(|l| l.text)
        .collect();
    assert_eq!(rest, vec!["C".to_string(), "B".to_string()]);
}

#[test]
fn test_whitespace_flag_after_pushed_source() {
    let mut lexer = StylesheetLexer::new("A;B");
    let _ = lexer.next_lexeme();
    lexer.push_source("C");
    let rest: Vec<(String, bool)> = std::iter::from_fn(|| lexer.next_lexeme())
        .map(|l| (l.text.clone(), l.follows_whitespace()))
        .collect();
    assert_eq!(
        rest,
        vec![
            ("C".to_string(), false),
            (";".to_string(), false),
            ("B".to_string(), false),
        ]
    );

    let mut lexer = StylesheetLexer::new("A ;B");
    let _ = lexer.next_lexeme();
    lexer.push_source("C");
    let _ = lexer.next_lexeme();
    assert!(lexer.next_lexeme().is_some_and(|l| l.follows_whitespace()));
}

#[test]
fn test_bad_input_is_error_token() {
    let lexemes = lex_all("Label ` Button", 0);
    assert!(lexemes.iter().any(|l| l.kind == TokenKind::Error && l.text == "`"));
    assert!(lexemes.last().is_some_and(|l| l.is_ident("Button")));
}

#[test]
fn test_dimension_literals() {
    let lexemes = lex_all("10px 50% 200ms", 1);
    let found: Vec<(TokenKind, Option<f64>)> =
        lexemes.iter().map(|l| (l.kind, l.number())).collect();
    assert_eq!(
        found,
        vec![
            (TokenKind::Length, Some(10.0)),
            (TokenKind::Percentage, Some(50.0)),
            (TokenKind::Time, Some(200.0)),
        ]
    );
}
