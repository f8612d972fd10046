//! Abstract syntax tree definitions for the rdb SQL dialect.
//!
//! Every statement parsed by the [`super::parser::Parser`] is represented as
//! a tree of the types defined here. Names and text literals are borrowed
//! from the source, so an AST cannot outlive the input it was parsed from.
//!
//! Each node renders back to canonical SQL through `Display`: uppercase
//! keywords, comma-separated lists, and a trailing `;` on statements.
//! Rendering then re-parsing yields the same tree.

use std::fmt;

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    CreateTable(CreateTableStatement<'a>),
    Select(SelectStatement<'a>),
    Insert(InsertStatement<'a>),
    Delete(DeleteStatement<'a>),
    DropTable(DropTableStatement<'a>),
}

impl<'a> Statement<'a> {
    /// The table this statement operates on.
    pub fn table(&self) -> &'a str {
        match self {
            Statement::CreateTable(stmt) => stmt.table,
            Statement::Select(stmt) => stmt.table,
            Statement::Insert(stmt) => stmt.table,
            Statement::Delete(stmt) => stmt.table,
            Statement::DropTable(stmt) => stmt.table,
        }
    }
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement<'a> {
    pub table: &'a str,
    /// Never empty.
    pub columns: Vec<ColumnDef<'a>>,
}

/// A column definition inside `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef<'a> {
    pub name: &'a str,
    pub column_type: ColumnType,
}

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Real,
    Text,
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement<'a> {
    /// Never empty.
    pub columns: Vec<&'a str>,
    pub table: &'a str,
    pub where_clause: Option<Expression<'a>>,
}

/// An `INSERT` statement.
///
/// The number of columns and values is not cross-checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement<'a> {
    pub table: &'a str,
    /// Never empty.
    pub columns: Vec<&'a str>,
    /// Never empty.
    pub values: Vec<Value<'a>>,
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement<'a> {
    pub table: &'a str,
    pub where_clause: Option<Expression<'a>>,
}

/// A `DROP TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement<'a> {
    pub table: &'a str,
}

/// The ordered statements of one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script<'a> {
    pub statements: Vec<Statement<'a>>,
}

impl<'a> Script<'a> {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement<'a>> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for Script<'a> {
    type Item = Statement<'a>;
    type IntoIter = std::vec::IntoIter<Statement<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Integer(i32),
    Real(f32),
    /// Raw source text including the surrounding double quotes.
    Text(&'a str),
}

/// Either side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Column(&'a str),
    Value(Value<'a>),
}

/// The comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Lt,
    Rt,
    Eq,
    Lte,
    Rte,
    Neq,
}

impl ComparisonOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Rt => ">",
            ComparisonOp::Eq => "=",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Rte => ">=",
            ComparisonOp::Neq => "!=",
        }
    }
}

/// A single comparison, as used by `WHERE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression<'a> {
    pub left: Operand<'a>,
    pub op: ComparisonOp,
    pub right: Operand<'a>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Write `items` separated by `sep`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_where(f: &mut fmt::Formatter<'_>, where_clause: &Option<Expression<'_>>) -> fmt::Result {
    match where_clause {
        Some(expr) => write!(f, " WHERE {expr}"),
        None => Ok(()),
    }
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(stmt) => {
                write!(f, "CREATE TABLE {} (", stmt.table)?;
                write_list(f, &stmt.columns, ", ")?;
                f.write_str(");")
            }
            Statement::Select(stmt) => {
                f.write_str("SELECT ")?;
                // Select columns are whitespace-separated in the grammar.
                write_list(f, &stmt.columns, " ")?;
                write!(f, " FROM {}", stmt.table)?;
                write_where(f, &stmt.where_clause)?;
                f.write_str(";")
            }
            Statement::Insert(stmt) => {
                write!(f, "INSERT INTO {} (", stmt.table)?;
                write_list(f, &stmt.columns, ", ")?;
                f.write_str(") VALUES (")?;
                write_list(f, &stmt.values, ", ")?;
                f.write_str(");")
            }
            Statement::Delete(stmt) => {
                write!(f, "DELETE FROM {}", stmt.table)?;
                write_where(f, &stmt.where_clause)?;
                f.write_str(";")
            }
            Statement::DropTable(stmt) => write!(f, "DROP TABLE {};", stmt.table),
        }
    }
}

impl fmt::Display for Script<'_> {
    /// One statement per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.column_type)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::Int => "INT",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        })
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            // Fixed six-digit display; precision beyond that is dropped.
            Value::Real(v) => write!(f, "{v:.6}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(name) => f.write_str(name),
            Operand::Value(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
