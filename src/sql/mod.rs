//! SQL front end for rdb.
//!
//! This module contains the lexer (tokenizer), abstract syntax tree (AST)
//! definitions, and a recursive-descent parser that turns a script of
//! `;`-terminated statements into a [`Script`] plus a list of diagnostics.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use lexer::{Lexer, Location, Token, TokenKind};
pub use parser::{ParseOutcome, Parser};
