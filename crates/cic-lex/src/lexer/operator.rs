//! Operator lexing.
//!
//! One small method per leading character, chaining `match_char` for the
//! longer spellings.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Handles `+`, `++`, `+=`.
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            Token::Increment
        } else if self.cursor.match_char('=') {
            Token::PlusEq
        } else {
            Token::Plus
        }
    }

    /// Handles `-`, `--`, `-=`.
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            Token::Decrement
        } else if self.cursor.match_char('=') {
            Token::MinusEq
        } else {
            Token::Minus
        }
    }

    /// Handles `*`, `*=`.
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::StarEq
        } else {
            Token::Star
        }
    }

    /// Handles `/`, `/=`. Comments are skipped before this is called.
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::SlashEq
        } else {
            Token::Slash
        }
    }

    /// Handles `%`, `%=`.
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::PercentEq
        } else {
            Token::Percent
        }
    }

    /// Handles `=`, `==`, `=>`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else if self.cursor.match_char('>') {
            Token::FatArrow
        } else {
            Token::Eq
        }
    }

    /// Handles `!`, `!=`.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    /// Handles `<`, `<=`, `<<`, `<<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                Token::ShlEq
            } else {
                Token::Shl
            }
        } else {
            Token::Lt
        }
    }

    /// Handles `>`, `>=`, `>>`, `>>=`.
    ///
    /// Inside a generic type-argument list only a single `>` is consumed, so
    /// the `>>` closing nested arguments yields two `>` tokens.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.parsing_type_arg {
            return Token::Gt;
        }
        if self.cursor.match_char('=') {
            Token::GtEq
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                Token::ShrEq
            } else {
                Token::Shr
            }
        } else {
            Token::Gt
        }
    }

    /// Handles `&`, `&&`, `&=`.
    pub(crate) fn lex_amp(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Token::AndAnd
        } else if self.cursor.match_char('=') {
            Token::AmpEq
        } else {
            Token::Amp
        }
    }

    /// Handles `|`, `||`, `|=`.
    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::OrOr
        } else if self.cursor.match_char('=') {
            Token::PipeEq
        } else {
            Token::Pipe
        }
    }

    /// Handles `^`, `^=`.
    pub(crate) fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::CaretEq
        } else {
            Token::Caret
        }
    }

    /// Handles `.`, `..`.
    pub(crate) fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::DotDot
        } else {
            Token::Dot
        }
    }
}
