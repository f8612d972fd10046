//! Error handling for the rdb SQL front end.
//!
//! The lexer never fails: malformed input becomes an `Unknown` token. The
//! parser reports grammar failures as a [`SyntaxError`], which each parse
//! rule propagates with `?` up to the script loop. There the error is
//! rendered to its diagnostic string and the parser resynchronizes at the
//! next statement boundary.
//!
//! A convenience [`Result<T>`] alias is re-exported so that parse rules can
//! write `Result<T>` instead of `std::result::Result<T, SyntaxError>`.

use thiserror::Error;

use crate::sql::lexer::{Location, Token, TokenKind};

/// A recoverable grammar failure inside one statement.
///
/// The `Display` form is the diagnostic text handed to callers:
/// `Expected <description>, got <Kind> '<lexeme>' <line>:<column>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected}, got {found} '{lexeme}' {location}")]
pub struct SyntaxError {
    /// What the grammar wanted at this point, e.g. `KwTable` or
    /// `Int, Real or Text`.
    pub expected: &'static str,
    /// The kind of the offending token.
    pub found: TokenKind,
    /// The exact source text of the offending token.
    pub lexeme: String,
    /// Where the offending token starts.
    pub location: Location,
}

impl SyntaxError {
    /// Build an error describing `token` as unexpected.
    pub fn unexpected(expected: &'static str, token: &Token<'_>) -> Self {
        SyntaxError {
            expected,
            found: token.kind,
            lexeme: token.text.to_string(),
            location: token.location,
        }
    }
}

/// A specialised [`Result`] type for parse rules.
pub type Result<T> = std::result::Result<T, SyntaxError>;
