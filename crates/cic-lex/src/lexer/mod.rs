//! Main lexer for CI source code.
//!
//! The lexer publishes one token at a time: [`Lexer::current`] is the token
//! the parser is looking at, [`Lexer::token_line`] the 1-based line it
//! started on. [`Lexer::next_token`] advances. The `see`/`eat`/`expect`/
//! `check` helpers are the one-token-lookahead surface the parser drives the
//! lexer through.

mod comment;
mod number;
mod operator;
mod string;

use cic_util::{ParseError, ParseResult};

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token};

/// The CI lexer.
///
/// # Example
///
/// ```
/// use cic_lex::{Lexer, Token};
///
/// let mut lexer = Lexer::new("main.ci", "class C");
/// lexer.next_token().unwrap();
/// assert_eq!(lexer.current, Token::Class);
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Name of the input, carried into every error.
    filename: &'a str,

    /// The current token.
    pub current: Token,

    /// Line the current token started on (1-based).
    pub token_line: u32,

    /// While set, `>` is always lexed as a single `>` so that the `>>`
    /// closing nested generic type arguments splits into two tokens.
    pub parsing_type_arg: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source.
    ///
    /// The current token starts out as [`Token::Eof`]; call
    /// [`Lexer::next_token`] once to read the first token.
    pub fn new(filename: &'a str, source: &'a str) -> Self {
        // A UTF-8 BOM at the start of the file is not part of the program.
        let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
        Self {
            cursor: Cursor::new(source),
            filename,
            current: Token::Eof,
            token_line: 1,
            parsing_type_arg: false,
        }
    }

    /// The name of the input being lexed.
    pub fn filename(&self) -> &str {
        self.filename
    }

    /// Advances to the next token, returning the previous one.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        let previous = self.current;
        self.current = self.read_token()?;
        Ok(previous)
    }

    /// Returns true if the current token equals `token`.
    pub fn see(&self, token: Token) -> bool {
        self.current == token
    }

    /// Consumes the current token if it equals `token`.
    pub fn eat(&mut self, token: Token) -> ParseResult<bool> {
        if self.see(token) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token, failing if it is not `token`.
    pub fn expect(&mut self, token: Token) -> ParseResult<()> {
        self.check(token)?;
        self.next_token()?;
        Ok(())
    }

    /// Fails if the current token is not `token`, without consuming it.
    pub fn check(&self, token: Token) -> ParseResult<()> {
        if self.see(token) {
            Ok(())
        } else {
            Err(ParseError::structural(
                self.filename,
                self.token_line,
                format!("Expected {}, got {}", token, self.current),
            ))
        }
    }

    /// Attaches the capture buffer; subsequently consumed characters are
    /// recorded verbatim.
    pub fn attach_capture(&mut self) {
        self.cursor.attach_capture();
    }

    /// Detaches the capture buffer and returns everything consumed since it
    /// was attached.
    pub fn detach_capture(&mut self) -> String {
        self.cursor.detach_capture()
    }

    /// Builds a lexical error at the current token's line.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::lexical(self.filename, self.token_line, message)
    }

    /// Reads the next token from the character stream.
    fn read_token(&mut self) -> ParseResult<Token> {
        loop {
            self.skip_whitespace();
            self.token_line = self.cursor.line();

            if self.cursor.is_at_end() {
                return Ok(Token::Eof);
            }

            match self.cursor.current_char() {
                // Single-character punctuation
                '(' => return Ok(self.single(Token::LParen)),
                ')' => return Ok(self.single(Token::RParen)),
                '{' => return Ok(self.single(Token::LBrace)),
                '}' => return Ok(self.single(Token::RBrace)),
                '[' => return Ok(self.single(Token::LBracket)),
                ']' => return Ok(self.single(Token::RBracket)),
                ',' => return Ok(self.single(Token::Comma)),
                ';' => return Ok(self.single(Token::Semicolon)),
                ':' => return Ok(self.single(Token::Colon)),
                '?' => return Ok(self.single(Token::Question)),
                '~' => return Ok(self.single(Token::Tilde)),
                '#' => return Ok(self.single(Token::Hash)),

                // Multi-character operators
                '+' => return Ok(self.lex_plus()),
                '-' => return Ok(self.lex_minus()),
                '*' => return Ok(self.lex_star()),
                '/' => match self.cursor.peek_char(1) {
                    '/' if self.cursor.peek_char(2) == '/' => return self.lex_doc_comment(),
                    '/' => self.skip_line_comment(),
                    '*' => self.skip_block_comment()?,
                    _ => return Ok(self.lex_slash()),
                },
                '%' => return Ok(self.lex_percent()),
                '=' => return Ok(self.lex_equals()),
                '!' => return Ok(self.lex_bang()),
                '<' => return Ok(self.lex_less()),
                '>' => return Ok(self.lex_greater()),
                '&' => return Ok(self.lex_amp()),
                '|' => return Ok(self.lex_pipe()),
                '^' => return Ok(self.lex_caret()),
                '.' => return Ok(self.lex_dot()),

                // Literals
                '"' => return self.lex_string(),
                '\'' => return self.lex_char(),
                '$' => return self.lex_interpolated_start(),
                c if c.is_ascii_digit() => return self.lex_number(),

                // Identifiers and keywords
                c if is_ident_start(c) => return Ok(self.lex_identifier()),

                c => return Err(self.error(format!("Invalid character '{}'", c))),
            }
        }
    }

    /// Consumes one character and returns the given token.
    fn single(&mut self, token: Token) -> Token {
        self.cursor.advance();
        token
    }

    /// Lexes an identifier or keyword.
    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        keyword_from_ident(text).unwrap_or_else(|| Token::Ident(cic_util::Symbol::intern(text)))
    }

    /// Skips spaces, tabs and line breaks.
    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                _ => return,
            }
        }
    }
}

/// Returns true for characters that can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters that can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
