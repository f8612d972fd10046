//! Recursive-descent parser for the rdb SQL dialect.
//!
//! The entry point is [`Parser::parse_script`], which pulls tokens from a
//! [`Lexer`] and parses `;`-terminated statements until end of input. A
//! syntax error inside a statement does not abort the script: the error is
//! recorded as a diagnostic string and the parser skips ahead to the next
//! statement boundary before continuing.

use tracing::{debug, trace};

use crate::error::{Result, SyntaxError};
use crate::sql::ast::*;
use crate::sql::lexer::{Lexer, Token, TokenKind};

const EXPECTED_STATEMENT: &str = "CREATE, SELECT, INSERT, DELETE or DROP";
const EXPECTED_COLUMN_TYPE: &str = "INT, REAL or TEXT";
const EXPECTED_VALUE: &str = "Int, Real or Text";
const EXPECTED_OPERAND: &str = "Id, Int, Real or Text";
const EXPECTED_OPERATOR: &str = "Lt, Rt, Eq, Lte, Rte or Neq";
const EXPECTED_INT_RANGE: &str = "Int in 32-bit range";
const EXPECTED_REAL_RANGE: &str = "Real in 32-bit range";

/// The result of parsing a whole script.
///
/// `script` holds the statements that parsed cleanly, in source order;
/// `errors` holds one diagnostic per statement that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome<'a> {
    pub script: Script<'a>,
    pub errors: Vec<String>,
}

impl ParseOutcome<'_> {
    /// True if no diagnostics were produced.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A recursive-descent parser that owns its token source.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser { lexer }
    }

    /// Lex and parse `sql` in one step.
    pub fn parse(sql: &'a str) -> ParseOutcome<'a> {
        Parser::new(Lexer::new(sql)).parse_script()
    }

    /// Parse statements until end of input.
    pub fn parse_script(mut self) -> ParseOutcome<'a> {
        let mut outcome = ParseOutcome::default();
        while !self.lexer.peek().is_eof() {
            match self.parse_statement() {
                Ok(stmt) => {
                    trace!(statement = %stmt, "parsed statement");
                    outcome.script.statements.push(stmt);
                }
                Err(err) => {
                    let skipped = self.synchronize();
                    debug!(error = %err, skipped, "recovered from syntax error");
                    outcome.errors.push(err.to_string());
                }
            }
        }
        debug!(
            statements = outcome.script.len(),
            errors = outcome.errors.len(),
            "parsed script"
        );
        outcome
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    /// Discard tokens up to and including the next `;` or end of input.
    ///
    /// Returns the number of tokens discarded; always at least one unless
    /// the input is already exhausted.
    fn synchronize(&mut self) -> usize {
        let mut skipped = 0;
        loop {
            let token = self.lexer.get();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    skipped += 1;
                    break;
                }
                _ => skipped += 1,
            }
        }
        skipped
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek().kind
    }

    /// Consume the next token if it is of kind `expected`.
    fn expect(&mut self, expected: TokenKind) -> Result<Token<'a>> {
        let token = self.lexer.peek();
        if token.kind == expected {
            Ok(self.lexer.get())
        } else {
            Err(SyntaxError::unexpected(expected.as_str(), &token))
        }
    }

    fn expect_identifier(&mut self) -> Result<&'a str> {
        Ok(self.expect(TokenKind::Id)?.text)
    }

    /// Parse `item (',' item)*`.
    fn parse_comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.peek_kind() == TokenKind::Comma {
            self.lexer.get();
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Parse an optional `WHERE <expression>`.
    fn parse_where_clause(&mut self) -> Result<Option<Expression<'a>>> {
        if self.peek_kind() == TokenKind::KwWhere {
            self.lexer.get();
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    // =======================================================================
    // Statement dispatch
    // =======================================================================

    fn parse_statement(&mut self) -> Result<Statement<'a>> {
        let token = self.lexer.peek();
        match token.kind {
            TokenKind::KwCreate => self.parse_create_table(),
            TokenKind::KwSelect => self.parse_select(),
            TokenKind::KwInsert => self.parse_insert(),
            TokenKind::KwDelete => self.parse_delete(),
            TokenKind::KwDrop => self.parse_drop_table(),
            _ => Err(SyntaxError::unexpected(EXPECTED_STATEMENT, &token)),
        }
    }

    // =======================================================================
    // CREATE TABLE
    // =======================================================================

    fn parse_create_table(&mut self) -> Result<Statement<'a>> {
        self.expect(TokenKind::KwCreate)?;
        self.expect(TokenKind::KwTable)?;
        let table = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let columns = self.parse_comma_list(Self::parse_column_def)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::CreateTable(CreateTableStatement { table, columns }))
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef<'a>> {
        let name = self.expect_identifier()?;
        let token = self.lexer.peek();
        let column_type = match token.kind {
            TokenKind::KwInt => ColumnType::Int,
            TokenKind::KwReal => ColumnType::Real,
            TokenKind::KwText => ColumnType::Text,
            _ => return Err(SyntaxError::unexpected(EXPECTED_COLUMN_TYPE, &token)),
        };
        self.lexer.get();
        Ok(ColumnDef { name, column_type })
    }

    // =======================================================================
    // SELECT
    // =======================================================================

    fn parse_select(&mut self) -> Result<Statement<'a>> {
        self.expect(TokenKind::KwSelect)?;

        // One or more bare identifiers up to FROM.
        let mut columns = vec![self.expect_identifier()?];
        while self.peek_kind() != TokenKind::KwFrom {
            columns.push(self.expect_identifier()?);
        }

        self.expect(TokenKind::KwFrom)?;
        let table = self.expect_identifier()?;
        let where_clause = self.parse_where_clause()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Select(SelectStatement {
            columns,
            table,
            where_clause,
        }))
    }

    // =======================================================================
    // INSERT
    // =======================================================================

    fn parse_insert(&mut self) -> Result<Statement<'a>> {
        self.expect(TokenKind::KwInsert)?;
        self.expect(TokenKind::KwInto)?;
        let table = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let columns = self.parse_comma_list(Self::expect_identifier)?;
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::KwValues)?;
        self.expect(TokenKind::LParen)?;
        let values = self.parse_comma_list(Self::parse_value)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Insert(InsertStatement {
            table,
            columns,
            values,
        }))
    }

    // =======================================================================
    // DELETE / DROP TABLE
    // =======================================================================

    fn parse_delete(&mut self) -> Result<Statement<'a>> {
        self.expect(TokenKind::KwDelete)?;
        self.expect(TokenKind::KwFrom)?;
        let table = self.expect_identifier()?;
        let where_clause = self.parse_where_clause()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Delete(DeleteStatement {
            table,
            where_clause,
        }))
    }

    fn parse_drop_table(&mut self) -> Result<Statement<'a>> {
        self.expect(TokenKind::KwDrop)?;
        self.expect(TokenKind::KwTable)?;
        let table = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement::DropTable(DropTableStatement { table }))
    }

    // =======================================================================
    // Expressions
    // =======================================================================

    fn parse_expression(&mut self) -> Result<Expression<'a>> {
        let left = self.parse_operand()?;
        let op = self.parse_comparison_op()?;
        let right = self.parse_operand()?;
        Ok(Expression { left, op, right })
    }

    fn parse_operand(&mut self) -> Result<Operand<'a>> {
        let token = self.lexer.peek();
        match token.kind {
            TokenKind::Id => {
                self.lexer.get();
                Ok(Operand::Column(token.text))
            }
            TokenKind::Int | TokenKind::Real | TokenKind::Text => {
                Ok(Operand::Value(self.parse_value()?))
            }
            _ => Err(SyntaxError::unexpected(EXPECTED_OPERAND, &token)),
        }
    }

    fn parse_comparison_op(&mut self) -> Result<ComparisonOp> {
        let token = self.lexer.peek();
        let op = match token.kind {
            TokenKind::Lt => ComparisonOp::Lt,
            TokenKind::Rt => ComparisonOp::Rt,
            TokenKind::Eq => ComparisonOp::Eq,
            TokenKind::Lte => ComparisonOp::Lte,
            TokenKind::Rte => ComparisonOp::Rte,
            TokenKind::Neq => ComparisonOp::Neq,
            _ => return Err(SyntaxError::unexpected(EXPECTED_OPERATOR, &token)),
        };
        self.lexer.get();
        Ok(op)
    }

    fn parse_value(&mut self) -> Result<Value<'a>> {
        let token = self.lexer.peek();
        let value = match token.kind {
            TokenKind::Int => token
                .text
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| SyntaxError::unexpected(EXPECTED_INT_RANGE, &token))?,
            TokenKind::Real => match token.text.parse::<f32>() {
                Ok(v) if v.is_finite() => Value::Real(v),
                _ => return Err(SyntaxError::unexpected(EXPECTED_REAL_RANGE, &token)),
            },
            TokenKind::Text => Value::Text(token.text),
            _ => return Err(SyntaxError::unexpected(EXPECTED_VALUE, &token)),
        };
        self.lexer.get();
        Ok(value)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
