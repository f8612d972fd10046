//! Hand-written tokenizer for the rdb SQL dialect.
//!
//! The [`Lexer`] produces [`Token`]s on demand with one token of lookahead:
//! [`Lexer::get`] consumes the next token and [`Lexer::peek`] returns it
//! without consuming. Keywords are matched case-sensitively. Scanning never
//! fails; anything malformed becomes a [`TokenKind::Unknown`] token carrying
//! the text collected before the scan gave up.
//!
//! Tokens borrow their text from the input, so the input must outlive every
//! token (and every AST node) derived from it.

use std::fmt;

use tracing::trace;

/// Text carried by the [`TokenKind::Eof`] token.
pub const EOF_TEXT: &str = "<EOF>";

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A position in the input: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// The position of the first character of any input.
    pub const fn start() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// The closed set of token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    KwSelect,
    KwFrom,
    KwDrop,
    KwTable,
    KwInsert,
    KwInto,
    KwValues,
    KwDelete,
    KwWhere,
    KwCreate,
    KwInt,
    KwReal,
    KwText,

    // Punctuation
    Semicolon,
    Comma,
    LParen,
    RParen,

    // Comparison operators
    Lte,
    Rte,
    Neq,
    Lt,
    Rt,
    Eq,

    // Identifiers and literals
    Id,
    Int,
    Real,
    Text,

    // Special
    Eof,
    Unknown,
}

impl TokenKind {
    /// The kind's name as it appears in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::KwSelect => "KwSelect",
            TokenKind::KwFrom => "KwFrom",
            TokenKind::KwDrop => "KwDrop",
            TokenKind::KwTable => "KwTable",
            TokenKind::KwInsert => "KwInsert",
            TokenKind::KwInto => "KwInto",
            TokenKind::KwValues => "KwValues",
            TokenKind::KwDelete => "KwDelete",
            TokenKind::KwWhere => "KwWhere",
            TokenKind::KwCreate => "KwCreate",
            TokenKind::KwInt => "KwInt",
            TokenKind::KwReal => "KwReal",
            TokenKind::KwText => "KwText",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Comma => "Comma",
            TokenKind::LParen => "LParen",
            TokenKind::RParen => "RParen",
            TokenKind::Lte => "Lte",
            TokenKind::Rte => "Rte",
            TokenKind::Neq => "Neq",
            TokenKind::Lt => "Lt",
            TokenKind::Rt => "Rt",
            TokenKind::Eq => "Eq",
            TokenKind::Id => "Id",
            TokenKind::Int => "Int",
            TokenKind::Real => "Real",
            TokenKind::Text => "Text",
            TokenKind::Eof => "Eof",
            TokenKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexeme borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The exact source text, or [`EOF_TEXT`] for the end-of-input token.
    pub text: &'a str,
    /// Where the token starts.
    pub location: Location,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, location: Location) -> Self {
        Token {
            kind,
            text,
            location,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' Loc={}", self.kind, self.text, self.location)
    }
}

// ---------------------------------------------------------------------------
// Keyword lookup
// ---------------------------------------------------------------------------

fn keyword_kind(word: &str) -> Option<TokenKind> {
    // Case-sensitive: `select` is an identifier.
    match word {
        "SELECT" => Some(TokenKind::KwSelect),
        "FROM" => Some(TokenKind::KwFrom),
        "DROP" => Some(TokenKind::KwDrop),
        "TABLE" => Some(TokenKind::KwTable),
        "INSERT" => Some(TokenKind::KwInsert),
        "INTO" => Some(TokenKind::KwInto),
        "VALUES" => Some(TokenKind::KwValues),
        "DELETE" => Some(TokenKind::KwDelete),
        "WHERE" => Some(TokenKind::KwWhere),
        "CREATE" => Some(TokenKind::KwCreate),
        "INT" => Some(TokenKind::KwInt),
        "REAL" => Some(TokenKind::KwReal),
        "TEXT" => Some(TokenKind::KwText),
        _ => None,
    }
}

fn punctuation_kind(ch: char) -> Option<TokenKind> {
    match ch {
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// An on-demand tokenizer with a single token of lookahead.
///
/// Create one with [`Lexer::new`], then pull tokens with [`Lexer::get`] and
/// [`Lexer::peek`], or drain it with [`Lexer::tokenize`]. Once the input is
/// exhausted every call returns the same [`TokenKind::Eof`] token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    location: Location,
    /// Filled by `peek`, drained by `get`.
    lookahead: Option<Token<'a>>,
    /// Set once the iterator has yielded `Eof`.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source text.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            location: Location::start(),
            lookahead: None,
            finished: false,
        }
    }

    /// Return and consume the next token.
    pub fn get(&mut self) -> Token<'a> {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// Return the next token without consuming it.
    ///
    /// Repeated peeks return the same token until the next [`Lexer::get`].
    pub fn peek(&mut self) -> Token<'a> {
        match self.lookahead {
            Some(token) => token,
            None => {
                let token = self.scan();
                self.lookahead = Some(token);
                token
            }
        }
    }

    /// Drain the lexer into a token list.
    ///
    /// The returned vector always ends with exactly one [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.get();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    // -- helpers ------------------------------------------------------------

    fn peek_char(&self) -> Option<char> {
        self.input[self.location.offset..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.location.offset += ch.len_utf8();
        if ch == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().map_or(false, &pred) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|ch| ch.is_ascii_whitespace());
    }

    fn token_from(&self, kind: TokenKind, begin: Location) -> Token<'a> {
        let text = &self.input[begin.offset..self.location.offset];
        if kind == TokenKind::Unknown {
            trace!(text, location = %begin, "unknown token");
        }
        Token::new(kind, text, begin)
    }

    // -- main scanner -------------------------------------------------------

    fn scan(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let begin = self.location;
        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, EOF_TEXT, begin),
        };

        if let Some(kind) = punctuation_kind(ch) {
            self.advance();
            return self.token_from(kind, begin);
        }

        if ch.is_ascii_alphabetic() {
            return self.scan_id_or_keyword();
        }

        if ch == '+' || ch == '-' || ch.is_ascii_digit() {
            return self.scan_number();
        }

        if ch == '"' {
            return self.scan_string();
        }

        if matches!(ch, '<' | '>' | '=' | '!') {
            return self.scan_operator();
        }

        self.advance();
        self.token_from(TokenKind::Unknown, begin)
    }

    fn scan_id_or_keyword(&mut self) -> Token<'a> {
        let begin = self.location;
        self.advance_while(|ch| ch.is_ascii_alphanumeric());
        let token = self.token_from(TokenKind::Id, begin);
        match keyword_kind(token.text) {
            Some(kind) => Token { kind, ..token },
            None => token,
        }
    }

    fn scan_number(&mut self) -> Token<'a> {
        let begin = self.location;

        if matches!(self.peek_char(), Some('+' | '-')) {
            self.advance();
            if !self.peek_char().map_or(false, |ch| ch.is_ascii_digit()) {
                return self.token_from(TokenKind::Unknown, begin);
            }
        }

        // A leading zero is a complete integer part: `0123` is `0`, `123`.
        if self.peek_char() == Some('0') {
            self.advance();
        } else {
            self.advance_while(|ch| ch.is_ascii_digit());
        }

        if self.peek_char() == Some('.') {
            self.advance();
            self.advance_while(|ch| ch.is_ascii_digit());
            return self.token_from(TokenKind::Real, begin);
        }

        self.token_from(TokenKind::Int, begin)
    }

    fn scan_string(&mut self) -> Token<'a> {
        let begin = self.location;
        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return self.token_from(TokenKind::Text, begin);
                }
                // The newline is left for the next scan.
                Some('\n') | None => return self.token_from(TokenKind::Unknown, begin),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_operator(&mut self) -> Token<'a> {
        let begin = self.location;
        let first = self.advance();
        let followed_by_eq = self.peek_char() == Some('=');
        let kind = match (first, followed_by_eq) {
            (Some('='), _) => TokenKind::Eq,
            (Some('<'), true) => TokenKind::Lte,
            (Some('>'), true) => TokenKind::Rte,
            (Some('!'), true) => TokenKind::Neq,
            (Some('<'), false) => TokenKind::Lt,
            (Some('>'), false) => TokenKind::Rt,
            _ => TokenKind::Unknown,
        };
        if followed_by_eq && matches!(kind, TokenKind::Lte | TokenKind::Rte | TokenKind::Neq) {
            self.advance();
        }
        self.token_from(kind, begin)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Yields every token up to and including the first `Eof`.
    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }
        let token = self.get();
        self.finished = token.is_eof();
        Some(token)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
