//! cic-par - Recursive-descent parser for the CI language.
//!
//! The parser consumes the lexer one token at a time and builds the typed
//! AST rooted at [`Program`]. Beyond the token stream it maintains a small
//! amount of context, saved and restored around the productions that
//! introduce it:
//!
//! - the innermost enclosing loop and loop-or-switch, so `break` and
//!   `continue` can record their target at parse time;
//! - the `xcrement_parent` context (`"&&"`, `"||"`, `"?"`) in which `++` and
//!   `--` are forbidden;
//! - the lexer's `parsing_type_arg` flag, which makes `>>` split into two
//!   `>` inside generic type arguments.
//!
//! There is no error recovery: the first failure aborts the parse and
//! propagates out as a [`ParseError`](cic_util::ParseError) carrying the
//! filename and 1-based line.

pub mod ast;

mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::Program;

use cic_lex::{Lexer, Token};
use cic_util::{ParseError, ParseResult, Symbol};

use crate::ast::{CallKind, LoopId, Stmt, Visibility};

/// Parses one source file, appending its declarations to `program`.
///
/// # Example
///
/// ```
/// use cic_par::{parse, Program};
///
/// let mut program = Program::new();
/// parse(&mut program, "hello.ci", "public class Hello { }").unwrap();
/// assert!(program.try_lookup(cic_util::Symbol::intern("Hello")).is_some());
/// ```
pub fn parse(program: &mut Program, filename: &str, source: &str) -> ParseResult<()> {
    Parser::new(program, filename, source)?.parse()
}

/// The CI parser. One instance parses one file; the program it appends to
/// accumulates declarations across files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    program: &'a mut Program,

    /// Innermost enclosing loop, if any.
    current_loop: Option<LoopId>,

    /// Innermost enclosing loop or switch, if any.
    current_loop_or_switch: Option<LoopId>,

    /// When set, names the surrounding `&&` / `||` / `?` context in which
    /// `++` and `--` are forbidden.
    xcrement_parent: Option<&'static str>,

    next_loop_id: u32,

    /// Indexed by `LoopId`: true for loops, false for switches.
    loop_is_loop: Vec<bool>,

    /// Indexed by `LoopId`: set when a `break` targets it.
    loop_has_break: Vec<bool>,
}

impl<'a> Parser<'a> {
    /// Creates a parser over one source file and reads the first token.
    pub fn new(
        program: &'a mut Program,
        filename: &'a str,
        source: &'a str,
    ) -> ParseResult<Self> {
        let mut lexer = Lexer::new(filename, source);
        lexer.next_token()?;
        Ok(Self {
            lexer,
            program,
            current_loop: None,
            current_loop_or_switch: None,
            xcrement_parent: None,
            next_loop_id: 0,
            loop_is_loop: Vec::new(),
            loop_has_break: Vec::new(),
        })
    }

    /// Parses the whole file, appending top-level declarations to the
    /// program.
    pub fn parse(mut self) -> ParseResult<()> {
        while !self.see(Token::Eof) {
            self.parse_top_level()?;
        }
        Ok(())
    }

    /// One top-level item: a class, an enum, or a bare native block.
    fn parse_top_level(&mut self) -> ParseResult<()> {
        let doc = self.parse_doc()?;
        if self.see(Token::Native) {
            let content = self.parse_native_content()?;
            self.program.top_level_natives.push(content);
            return Ok(());
        }

        let line = self.line();
        let visibility = if self.eat(Token::Public)? {
            Visibility::Public
        } else {
            Visibility::Internal
        };
        let call_kind = self.parse_call_kind()?;

        match self.current() {
            Token::Class => self.parse_class(doc, line, visibility, call_kind),
            _ if call_kind != CallKind::Normal => {
                Err(self.structural(format!("Expected 'class', got {}", self.current())))
            }
            Token::Enum => self.parse_enum(doc, line, visibility),
            _ => Err(self.structural("Expected class or enum")),
        }
    }

    // =========================================================================
    // TOKEN HELPERS
    // =========================================================================

    pub(crate) fn current(&self) -> Token {
        self.lexer.current
    }

    /// Line the current token started on.
    pub(crate) fn line(&self) -> u32 {
        self.lexer.token_line
    }

    pub(crate) fn see(&self, token: Token) -> bool {
        self.lexer.see(token)
    }

    pub(crate) fn eat(&mut self, token: Token) -> ParseResult<bool> {
        self.lexer.eat(token)
    }

    pub(crate) fn expect(&mut self, token: Token) -> ParseResult<()> {
        self.lexer.expect(token)
    }

    pub(crate) fn check(&self, token: Token) -> ParseResult<()> {
        self.lexer.check(token)
    }

    pub(crate) fn next_token(&mut self) -> ParseResult<Token> {
        self.lexer.next_token()
    }

    /// Consumes an identifier, failing on anything else.
    pub(crate) fn expect_ident(&mut self) -> ParseResult<Symbol> {
        if let Token::Ident(name) = self.current() {
            self.next_token()?;
            Ok(name)
        } else {
            Err(self.structural(format!("Expected identifier, got {}", self.current())))
        }
    }

    /// Consumes a documentation comment if one is current.
    pub(crate) fn parse_doc(&mut self) -> ParseResult<Option<Symbol>> {
        if let Token::DocComment(text) = self.current() {
            self.next_token()?;
            Ok(Some(text))
        } else {
            Ok(None)
        }
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    pub(crate) fn structural(&self, message: impl Into<String>) -> ParseError {
        ParseError::structural(self.lexer.filename(), self.line(), message)
    }

    pub(crate) fn contextual(&self, message: impl Into<String>) -> ParseError {
        ParseError::contextual(self.lexer.filename(), self.line(), message)
    }

    pub(crate) fn contextual_at(&self, line: u32, message: impl Into<String>) -> ParseError {
        ParseError::contextual(self.lexer.filename(), line, message)
    }

    pub(crate) fn lexical(&self, message: impl Into<String>) -> ParseError {
        ParseError::lexical(self.lexer.filename(), self.line(), message)
    }

    // =========================================================================
    // CONTEXT DISCIPLINE
    // =========================================================================

    /// Runs `f` with `xcrement_parent` set to `context`, restoring the
    /// previous value on every exit path.
    pub(crate) fn with_xcrement_parent<T>(
        &mut self,
        context: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.xcrement_parent.replace(context);
        let result = f(self);
        self.xcrement_parent = saved;
        result
    }

    pub(crate) fn xcrement_parent(&self) -> Option<&'static str> {
        self.xcrement_parent
    }

    /// Allocates the identity of a new loop (`is_loop`) or switch.
    pub(crate) fn open_loop(&mut self, is_loop: bool) -> LoopId {
        let id = LoopId(self.next_loop_id);
        self.next_loop_id += 1;
        self.loop_is_loop.push(is_loop);
        self.loop_has_break.push(false);
        id
    }

    /// Whether a `break` targeted the given loop.
    pub(crate) fn has_break(&self, id: LoopId) -> bool {
        self.loop_has_break[id.0 as usize]
    }

    /// Records that a `break` targets `id`; only loops are marked.
    pub(crate) fn mark_break(&mut self, id: LoopId) {
        if self.loop_is_loop[id.0 as usize] {
            self.loop_has_break[id.0 as usize] = true;
        }
    }

    pub(crate) fn current_loop(&self) -> Option<LoopId> {
        self.current_loop
    }

    pub(crate) fn current_loop_or_switch(&self) -> Option<LoopId> {
        self.current_loop_or_switch
    }

    /// Parses a loop body with `id` installed as both the innermost loop and
    /// the innermost loop-or-switch.
    pub(crate) fn parse_loop_body(&mut self, id: LoopId) -> ParseResult<Stmt> {
        let saved_loop = self.current_loop;
        let saved_loop_or_switch = self.current_loop_or_switch;
        self.current_loop = Some(id);
        self.current_loop_or_switch = Some(id);
        let body = self.parse_statement();
        self.current_loop = saved_loop;
        self.current_loop_or_switch = saved_loop_or_switch;
        body
    }

    /// Runs `f` with `id` installed as the innermost loop-or-switch only
    /// (used for switch bodies).
    pub(crate) fn with_switch<T>(
        &mut self,
        id: LoopId,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.current_loop_or_switch.replace(id);
        let result = f(self);
        self.current_loop_or_switch = saved;
        result
    }

    // =========================================================================
    // SHARED SMALL PRODUCTIONS
    // =========================================================================

    /// Parses a member call kind: one of `static`, `abstract`, `virtual`,
    /// `override`, `sealed`, or none of them.
    pub(crate) fn parse_call_kind(&mut self) -> ParseResult<CallKind> {
        let kind = match self.current() {
            Token::Static => CallKind::Static,
            Token::Abstract => CallKind::Abstract,
            Token::Virtual => CallKind::Virtual,
            Token::Override => CallKind::Override,
            Token::Sealed => CallKind::Sealed,
            _ => return Ok(CallKind::Normal),
        };
        self.next_token()?;
        Ok(kind)
    }

    /// Parses a member visibility prefix, defaulting to Private.
    pub(crate) fn parse_visibility(&mut self) -> ParseResult<Visibility> {
        if self.eat(Token::Internal)? {
            Ok(Visibility::Internal)
        } else if self.eat(Token::Protected)? {
            Ok(Visibility::Protected)
        } else if self.eat(Token::Public)? {
            Ok(Visibility::Public)
        } else {
            Ok(Visibility::Private)
        }
    }
}
