//! Comment handling.
//!
//! `//` line comments and `/* */` block comments are skipped. `///` lines
//! open a documentation comment whose decoded value is the concatenation of
//! consecutive `///` lines.

use cic_util::{ParseResult, Symbol};

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips a `//` line comment; the cursor is at the first `/`.
    pub(crate) fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a `/* */` block comment; the cursor is at the `/`.
    ///
    /// Block comments do not nest.
    pub(crate) fn skip_block_comment(&mut self) -> ParseResult<()> {
        self.cursor.advance();
        self.cursor.advance();

        loop {
            if self.cursor.is_at_end() {
                return Err(self.error("Unterminated block comment"));
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(());
            }
            self.cursor.advance();
        }
    }

    /// Lexes a documentation comment; the cursor is at the first of three
    /// slashes.
    ///
    /// Consecutive `///` lines are coalesced with `\n`; one space after each
    /// `///` is dropped.
    pub(crate) fn lex_doc_comment(&mut self) -> ParseResult<Token> {
        let mut content = String::new();
        loop {
            for _ in 0..3 {
                self.cursor.advance();
            }
            if self.cursor.current_char() == ' ' {
                self.cursor.advance();
            }
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                content.push(self.cursor.current_char());
                self.cursor.advance();
            }

            // Another /// line (possibly indented) continues this comment.
            let mut offset = 0;
            while matches!(self.cursor.peek_char(offset), ' ' | '\t' | '\r' | '\n') {
                offset += 1;
            }
            if self.cursor.peek_char(offset) == '/'
                && self.cursor.peek_char(offset + 1) == '/'
                && self.cursor.peek_char(offset + 2) == '/'
            {
                for _ in 0..offset {
                    self.cursor.advance();
                }
                content.push('\n');
            } else {
                return Ok(Token::DocComment(Symbol::intern(&content)));
            }
        }
    }
}
