//! Text and JSON rendering of a stylesheet report.

use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::{Value as Json, json};
use tessel_css::lexer::{StylesheetLexer, TokenKind};
use tessel_css::{MergedDeclarations, RuleSet, SourceLocation, Stylesheet};

/// One lexeme as shown to the user.
pub struct LexemeRow {
    location: SourceLocation,
    kind: TokenKind,
    text: String,
}

/// Lex `source` the way the parser would, tracking block nesting.
pub fn lex(source: &str) -> Vec<LexemeRow> {
    let mut lexer = StylesheetLexer::new(source);
    let mut rows = Vec::new();
    while let Some(lexeme) = lexer.next_lexeme() {
        match lexeme.kind {
            TokenKind::LeftBrace => lexer.increase_nesting(),
            TokenKind::RightBrace => lexer.decrease_nesting(),
            _ => {}
        }
        rows.push(LexemeRow {
            location: SourceLocation::new(None, source, lexeme.range.start),
            kind: lexeme.kind,
            text: lexeme.text,
        });
    }
    rows
}

pub struct Report<'a> {
    pub path: &'a Path,
    pub sheet: &'a Stylesheet,
    pub lexemes: Option<&'a [LexemeRow]>,
    pub resolved: Option<(&'a str, &'a MergedDeclarations)>,
    pub values: Vec<(String, String)>,
}

impl Report<'_> {
    pub fn print(&self) {
        if let Some(lexemes) = self.lexemes {
            println!("{}", format!("=== Lexemes ({}) ===", lexemes.len()).bold());
            for row in lexemes {
                let kind = row.kind.to_string();
                println!(
                    "  {:>4}:{:<3} {kind:<14} {}",
                    row.location.line, row.location.column, row.text
                );
            }
            println!();
        }

        let errors = self.sheet.errors();
        if !errors.is_empty() {
            println!("{}", format!("=== Parse Errors ({}) ===", errors.len()).bold());
            for error in errors {
                println!("  {} {error}", format!("{}:", error.kind_name()).red());
            }
            println!();
        }

        let rule_sets = self.sheet.all_rule_sets();
        println!(
            "{}",
            format!("=== Rule Sets ({}) in {} ===", rule_sets.len(), self.path.display()).bold()
        );
        for rule_set in &rule_sets {
            print_rule_set(rule_set.as_ref());
        }
        for group in self.sheet.media_groups() {
            println!(
                "  {} {:?} gates {} rule set(s)",
                "@media".cyan(),
                group.query,
                group.rule_sets.len()
            );
        }
        let mut keyframes: Vec<&String> = self.sheet.keyframes().keys().collect();
        keyframes.sort();
        for name in keyframes {
            println!("  {} {name}", "@keyframes".cyan());
        }

        let Some((element, merged)) = self.resolved else {
            return;
        };
        println!();
        println!(
            "{}",
            format!("=== Resolved Styles for {element} ({} properties) ===", merged.len()).bold()
        );
        for declaration in merged {
            let important = if declaration.important { " !important" } else { "" };
            println!(
                "  {}: {}{}",
                declaration.name.green(),
                declaration.value_text(),
                important.red()
            );
        }
        println!(
            "  {}",
            format!("from {} matching rule set(s)", merged.rule_sets().len()).dimmed()
        );

        for (property, parser) in &self.values {
            match merged.parsed(property, parser) {
                None => println!("  {property} as {parser}: {}", "not set".dimmed()),
                Some(parsed) => {
                    match &parsed.value {
                        Some(value) => println!("  {property} as {parser}: {value:?}"),
                        None => println!("  {property} as {parser}: {}", "invalid".red()),
                    }
                    for error in &parsed.errors {
                        println!("    {} {error}", "!".yellow());
                    }
                }
            }
        }
    }

    pub fn to_json(&self) -> Json {
        let mut report = serde_json::Map::new();
        let _ = report.insert("file".to_string(), json!(self.path.display().to_string()));
        let _ = report.insert("origin".to_string(), json!(self.sheet.origin()));

        if let Some(lexemes) = self.lexemes {
            let lexemes: Vec<Json> = lexemes
                .iter()
                .map(|row| {
                    json!({
                        "line": row.location.line,
                        "column": row.location.column,
                        "kind": row.kind.to_string(),
                        "text": row.text,
                    })
                })
                .collect();
            let _ = report.insert("lexemes".to_string(), Json::Array(lexemes));
        }

        let errors: Vec<Json> = self
            .sheet
            .errors()
            .iter()
            .map(|error| {
                json!({
                    "kind": error.kind_name(),
                    "line": error.location().line,
                    "column": error.location().column,
                    "message": error.to_string(),
                })
            })
            .collect();
        let _ = report.insert("errors".to_string(), Json::Array(errors));

        let rule_sets: Vec<Json> = self
            .sheet
            .all_rule_sets()
            .into_iter()
            .map(|rule_set| rule_set_json(rule_set.as_ref()))
            .collect();
        let _ = report.insert("rule_sets".to_string(), Json::Array(rule_sets));

        if let Some((element, merged)) = self.resolved {
            let declarations: serde_json::Map<String, Json> = merged
                .iter()
                .map(|declaration| (declaration.name.clone(), json!(declaration.value_text())))
                .collect();
            let values: serde_json::Map<String, Json> = self
                .values
                .iter()
                .map(|(property, parser)| {
                    let value = merged
                        .value(property, parser)
                        .and_then(|value| serde_json::to_value(value).ok())
                        .unwrap_or(Json::Null);
                    (property.clone(), value)
                })
                .collect();
            let _ = report.insert(
                "resolved".to_string(),
                json!({
                    "element": element,
                    "declarations": declarations,
                    "values": values,
                    "matched_rule_sets": merged.rule_sets().len(),
                }),
            );
        }

        Json::Object(report)
    }
}

fn selector_text(rule_set: &RuleSet) -> String {
    rule_set
        .selectors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_rule_set(rule_set: &RuleSet) {
    println!(
        "  {} {} {{ {} declarations }}",
        selector_text(rule_set).cyan(),
        rule_set.specificity().to_string().dimmed(),
        rule_set.declarations().len()
    );
    for declaration in rule_set.declarations() {
        let important = if declaration.important { " !important" } else { "" };
        println!("    {}: {}{important}", declaration.name, declaration.value_text());
    }
}

fn rule_set_json(rule_set: &RuleSet) -> Json {
    let declarations: serde_json::Map<String, Json> = rule_set
        .declarations()
        .iter()
        .map(|declaration| {
            (
                declaration.name.clone(),
                json!({
                    "value": declaration.value_text(),
                    "important": declaration.important,
                }),
            )
        })
        .collect();
    json!({
        "selector": selector_text(rule_set),
        "specificity": rule_set.specificity().to_string(),
        "source_order": rule_set.source_order(),
        "declarations": declarations,
    })
}
