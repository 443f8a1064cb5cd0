//! Statement parsing.
//!
//! One method per statement form, dispatched on the current token. Loops
//! install themselves as the innermost loop and loop-or-switch for the span
//! of their body; switches install themselves as loop-or-switch only, so
//! `continue` inside a switch still targets the surrounding loop.

use cic_lex::Token;
use cic_util::ParseResult;

use crate::ast::{
    AssertStmt, BlockStmt, BreakStmt, ContinueStmt, DoWhileStmt, ForStmt, ForeachStmt, IfStmt,
    LockStmt, NativeStmt, ReturnStmt, Stmt, SwitchCase, SwitchStmt, ThrowStmt, Var, Visibility,
    WhileStmt,
};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        // Documentation comments attach to declarations, not statements.
        while matches!(self.current(), Token::DocComment(_)) {
            self.next_token()?;
        }

        match self.current() {
            Token::LBrace => self.parse_block(),
            Token::Assert => self.parse_assert(),
            Token::Break => self.parse_break(),
            Token::Continue => self.parse_continue(),
            Token::Const => {
                let constant = self.parse_const(None, Visibility::Private)?;
                Ok(Stmt::Const(constant))
            }
            Token::Do => self.parse_do_while(),
            Token::For => self.parse_for(),
            Token::Foreach => self.parse_foreach(),
            Token::If => self.parse_if(),
            Token::Lock => self.parse_lock(),
            Token::Native => {
                let line = self.line();
                let content = self.parse_native_content()?;
                Ok(Stmt::Native(NativeStmt { line, content }))
            }
            Token::Return => self.parse_return(),
            Token::Switch => self.parse_switch(),
            Token::Throw => self.parse_throw(),
            Token::While => self.parse_while(),
            _ => {
                let expr = self.parse_assign(true)?;
                self.expect(Token::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.see(Token::RBrace) {
            if self.see(Token::Eof) {
                return Err(self.structural("Expected '}', got end of file"));
            }
            stmts.push(self.parse_statement()?);
        }
        self.next_token()?;
        Ok(Stmt::Block(BlockStmt { line, stmts }))
    }

    /// `assert cond [, message];`
    fn parse_assert(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        let cond = self.parse_expr()?;
        let message = if self.eat(Token::Comma)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        Ok(Stmt::Assert(AssertStmt {
            line,
            cond,
            message,
        }))
    }

    /// `break;` - targets the innermost loop or switch.
    fn parse_break(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        let target = self
            .current_loop_or_switch()
            .ok_or_else(|| self.contextual("Break outside loop or switch"))?;
        self.next_token()?;
        self.expect(Token::Semicolon)?;
        self.mark_break(target);
        Ok(Stmt::Break(BreakStmt { line, target }))
    }

    /// `continue;` - targets the innermost loop.
    fn parse_continue(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        let target = self
            .current_loop()
            .ok_or_else(|| self.contextual("Continue outside loop"))?;
        self.next_token()?;
        self.expect(Token::Semicolon)?;
        Ok(Stmt::Continue(ContinueStmt { line, target }))
    }

    /// `do stmt while (cond);`
    fn parse_do_while(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        let id = self.open_loop(true);
        let body = self.parse_loop_body(id)?;
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;
        Ok(Stmt::DoWhile(DoWhileStmt {
            line,
            id,
            body: Box::new(body),
            cond,
            has_break: self.has_break(id),
        }))
    }

    /// `for ([init]; [cond]; [advance]) stmt`
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;
        let init = if self.see(Token::Semicolon) {
            None
        } else {
            Some(self.parse_assign(true)?)
        };
        self.expect(Token::Semicolon)?;
        let cond = if self.see(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::Semicolon)?;
        let advance = if self.see(Token::RParen) {
            None
        } else {
            Some(self.parse_assign(false)?)
        };
        self.expect(Token::RParen)?;
        let id = self.open_loop(true);
        let body = self.parse_loop_body(id)?;
        Ok(Stmt::For(ForStmt {
            line,
            id,
            init,
            cond,
            advance,
            body: Box::new(body),
            has_break: self.has_break(id),
        }))
    }

    /// `foreach (Type x in coll) stmt` or
    /// `foreach ((Type k, Type v) in coll) stmt`.
    fn parse_foreach(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;

        let mut vars = Vec::new();
        if self.eat(Token::LParen)? {
            vars.push(self.parse_foreach_var()?);
            self.expect(Token::Comma)?;
            vars.push(self.parse_foreach_var()?);
            self.expect(Token::RParen)?;
        } else {
            vars.push(self.parse_foreach_var()?);
        }

        self.expect(Token::In)?;
        let collection = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let id = self.open_loop(true);
        let body = self.parse_loop_body(id)?;
        Ok(Stmt::Foreach(ForeachStmt {
            line,
            id,
            vars,
            collection,
            body: Box::new(body),
            has_break: self.has_break(id),
        }))
    }

    /// An iterator variable: `Type name`, no initializer.
    fn parse_foreach_var(&mut self) -> ParseResult<Var> {
        let type_expr = self.parse_type()?;
        let line = type_expr.line();
        let name = self.expect_ident()?;
        Ok(Var {
            line,
            doc: None,
            type_expr: Box::new(type_expr),
            name,
            value: None,
        })
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let on_true = self.parse_statement()?;
        let on_false = if self.eat(Token::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            line,
            cond,
            on_true: Box::new(on_true),
            on_false,
        }))
    }

    /// `lock (expr) stmt`
    fn parse_lock(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;
        let lock = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = self.parse_statement()?;
        Ok(Stmt::Lock(LockStmt {
            line,
            lock,
            body: Box::new(body),
        }))
    }

    /// `return [value];`
    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        let value = if self.see(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::Semicolon)?;
        Ok(Stmt::Return(ReturnStmt { line, value }))
    }

    /// `switch (value) { (case v(: case v)*: stmt+)+ (default: stmt+)? }`
    fn parse_switch(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;
        let value = self.parse_expr()?;
        self.expect(Token::RParen)?;
        self.expect(Token::LBrace)?;
        let id = self.open_loop(false);
        let (cases, default_body) = self.with_switch(id, |p| p.parse_switch_body())?;
        self.expect(Token::RBrace)?;
        Ok(Stmt::Switch(SwitchStmt {
            line,
            id,
            value,
            cases,
            default_body,
        }))
    }

    fn parse_switch_body(&mut self) -> ParseResult<(Vec<SwitchCase>, Option<Vec<Stmt>>)> {
        let mut cases = Vec::new();
        while self.see(Token::Case) {
            let mut values = Vec::new();
            while self.eat(Token::Case)? {
                values.push(self.parse_expr()?);
                self.expect(Token::Colon)?;
            }
            let mut body = Vec::new();
            while !matches!(
                self.current(),
                Token::Case | Token::Default | Token::RBrace
            ) {
                body.push(self.parse_statement()?);
            }
            if body.is_empty() {
                return Err(self.contextual("Case with no statements"));
            }
            cases.push(SwitchCase { values, body });
        }
        if cases.is_empty() {
            return Err(self.contextual("Switch with no cases"));
        }

        let default_body = if self.eat(Token::Default)? {
            self.expect(Token::Colon)?;
            let mut body = Vec::new();
            loop {
                match self.current() {
                    Token::RBrace => break,
                    Token::Case => {
                        return Err(self.contextual("Please remove case before default"))
                    }
                    Token::Default => return Err(self.contextual("Duplicate 'default'")),
                    Token::Eof => {
                        return Err(self.structural("Expected '}', got end of file"))
                    }
                    _ => body.push(self.parse_statement()?),
                }
            }
            if body.is_empty() {
                return Err(self.contextual("Default with no statements"));
            }
            Some(body)
        } else {
            None
        };
        Ok((cases, default_body))
    }

    /// `throw message;`
    fn parse_throw(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        let message = self.parse_expr()?;
        self.expect(Token::Semicolon)?;
        Ok(Stmt::Throw(ThrowStmt { line, message }))
    }

    /// `while (cond) stmt`
    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let id = self.open_loop(true);
        let body = self.parse_loop_body(id)?;
        Ok(Stmt::While(WhileStmt {
            line,
            id,
            cond,
            body: Box::new(body),
            has_break: self.has_break(id),
        }))
    }

    /// Captures a `native { ... }` block verbatim; the current token is
    /// `native`.
    ///
    /// The capture buffer is attached right after the opening `{` and the
    /// block is scanned token by token, tracking brace nesting so braces in
    /// string literals do not count. The buffer is detached on every exit
    /// path.
    pub(crate) fn parse_native_content(&mut self) -> ParseResult<String> {
        self.next_token()?;
        self.check(Token::LBrace)?;
        self.lexer.attach_capture();
        let scan = self.scan_native_block();
        let mut content = self.lexer.detach_capture();
        scan?;
        // The captured text ends with the block's closing brace.
        content.pop();
        self.next_token()?;
        Ok(content)
    }

    fn scan_native_block(&mut self) -> ParseResult<()> {
        let mut nesting = 1u32;
        loop {
            self.next_token()?;
            match self.current() {
                Token::LBrace => nesting += 1,
                Token::RBrace => {
                    nesting -= 1;
                    if nesting == 0 {
                        return Ok(());
                    }
                }
                Token::Eof => return Err(self.lexical("Native block not terminated")),
                _ => {}
            }
        }
    }
}
