//! Property-based tests for the lexer and parser.
//!
//! 1. The lexer never panics and always ends with exactly one `Eof`.
//! 2. Every token's text is the input slice at its offset.
//! 3. `peek` is idempotent and `get` returns the peeked token.
//! 4. Rendering a parsed valid statement and re-parsing it is stable.
//! 5. Recovery terminates with at most one diagnostic or statement per `;`,
//!    plus one for a trailing unterminated statement.

use proptest::prelude::*;

use rdb::sql::lexer::EOF_TEXT;
use rdb::{parse_script, Lexer, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Lowercase names never collide with the uppercase keywords.
fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|v| v.to_string()),
        (-100_000i32..100_000, 0u32..1000).prop_map(|(int, frac)| format!("{int}.{frac}")),
        "[a-zA-Z0-9 ,;()<>=!]{0,12}".prop_map(|s| format!("\"{s}\"")),
    ]
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![identifier(), value()]
}

fn comparison() -> impl Strategy<Value = String> {
    (
        operand(),
        prop::sample::select(vec!["<", ">", "=", "<=", ">=", "!="]),
        operand(),
    )
        .prop_map(|(left, op, right)| format!("{left} {op} {right}"))
}

fn where_clause() -> impl Strategy<Value = String> {
    prop::option::of(comparison()).prop_map(|expr| match expr {
        Some(expr) => format!(" WHERE {expr}"),
        None => String::new(),
    })
}

fn statement() -> impl Strategy<Value = String> {
    let column_type = prop::sample::select(vec!["INT", "REAL", "TEXT"]);
    prop_oneof![
        (
            identifier(),
            prop::collection::vec((identifier(), column_type), 1..5)
        )
            .prop_map(|(table, cols)| {
                let cols: Vec<String> = cols.iter().map(|(n, t)| format!("{n} {t}")).collect();
                format!("CREATE TABLE {table} ({});", cols.join(", "))
            }),
        (
            prop::collection::vec(identifier(), 1..5),
            identifier(),
            where_clause()
        )
            .prop_map(|(cols, table, filter)| {
                format!("SELECT {} FROM {table}{filter};", cols.join(" "))
            }),
        (
            identifier(),
            prop::collection::vec(identifier(), 1..5),
            prop::collection::vec(value(), 1..5)
        )
            .prop_map(|(table, cols, values)| {
                format!(
                    "INSERT INTO {table} ({}) VALUES ({});",
                    cols.join(", "),
                    values.join(", ")
                )
            }),
        (identifier(), where_clause())
            .prop_map(|(table, filter)| format!("DELETE FROM {table}{filter};")),
        identifier().prop_map(|table| format!("DROP TABLE {table};")),
    ]
}

/// Fragments that often appear in broken scripts.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        statement(),
        prop::sample::select(vec![
            "DROP", "TABLE", "SELECT", "FROM", "(", ")", ",", ";", "\"", "!", "+", "x", "12",
        ])
        .prop_map(str::to_string),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn lexer_never_panics_and_ends_with_eof(input in any::<String>()) {
        let tokens = Lexer::new(&input).tokenize();
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        let last = tokens.last().unwrap();
        prop_assert!(last.is_eof());
        prop_assert_eq!(last.location.offset, input.len());
    }

    #[test]
    fn token_text_is_the_input_slice(input in "[ -~\t\n]{0,64}") {
        let mut previous_end = 0;
        for token in Lexer::new(&input) {
            if token.is_eof() {
                prop_assert_eq!(token.text, EOF_TEXT);
                continue;
            }
            let start = token.location.offset;
            prop_assert!(start >= previous_end);
            prop_assert!(!token.text.is_empty());
            prop_assert_eq!(&input[start..start + token.text.len()], token.text);
            previous_end = start + token.text.len();
        }
    }

    #[test]
    fn peek_is_idempotent(input in "[ -~\n]{0,48}", peeks in 1usize..5) {
        let mut lexer = Lexer::new(&input);
        let mut reference = Lexer::new(&input);
        loop {
            let first = lexer.peek();
            for _ in 1..peeks {
                prop_assert_eq!(lexer.peek(), first);
            }
            let got = lexer.get();
            prop_assert_eq!(got, first);
            prop_assert_eq!(got, reference.get());
            if got.is_eof() {
                break;
            }
        }
    }

    #[test]
    fn valid_statements_parse_cleanly(sql in statement()) {
        let outcome = parse_script(&sql);
        prop_assert!(outcome.is_ok(), "{:?} -> {:?}", sql, outcome.errors);
        prop_assert_eq!(outcome.script.len(), 1);
    }

    #[test]
    fn render_then_parse_is_stable(sql in statement()) {
        // Reals print with six decimals, so the first AST may differ from the
        // second (`0.0000001` renders as `0.000000`). From then on it is fixed.
        let first = parse_script(&sql);
        let rendered = first.script.to_string();

        let second = parse_script(&rendered);
        prop_assert!(second.is_ok(), "{:?} -> {:?}", rendered, second.errors);
        let rerendered = second.script.to_string();
        prop_assert_eq!(&rerendered, &rendered);

        let third = parse_script(&rerendered);
        prop_assert_eq!(third.script, second.script);
    }

    #[test]
    fn recovery_terminates_and_bounds_diagnostics(
        parts in prop::collection::vec(fragment(), 0..12)
    ) {
        let sql = parts.join(" ");
        let outcome = parse_script(&sql);
        // Every attempt but the last ends by consuming a `;`.
        let boundaries = Lexer::new(&sql)
            .filter(|t| t.kind == TokenKind::Semicolon)
            .count()
            + 1;
        prop_assert!(outcome.errors.len() + outcome.script.len() <= boundaries);
    }
}
