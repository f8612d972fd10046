//! # rdb
//!
//! Front end for a small SQL-like data definition and manipulation
//! language: a hand-written lexer and a recursive-descent parser with
//! per-statement error recovery.
//!
//! ```
//! let outcome = rdb::parse_script("DROP TABLE t; DROP; SELECT a FROM t WHERE a > 1;");
//! assert_eq!(outcome.script.len(), 2);
//! assert_eq!(outcome.errors, vec!["Expected KwTable, got Semicolon ';' 1:19"]);
//! assert_eq!(outcome.script.statements[1].to_string(), "SELECT a FROM t WHERE a > 1;");
//! ```
//!
//! The AST borrows identifiers and text literals from the input, so the
//! source string must outlive the [`ParseOutcome`].

pub mod error;
pub mod sql;

pub use error::{Result, SyntaxError};
pub use sql::{Lexer, Location, ParseOutcome, Parser, Script, Statement, Token, TokenKind};

/// Parse a whole script, collecting statements and diagnostics.
pub fn parse_script(sql: &str) -> ParseOutcome<'_> {
    Parser::parse(sql)
}
