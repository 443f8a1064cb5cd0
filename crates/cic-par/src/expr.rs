//! Expression parsing.
//!
//! A Pratt loop over named binding powers. `&&`, `||` and `? :` are handled
//! as special cases in the loop because they introduce the context in which
//! `++`/`--` are forbidden; `is` is special because its right operand is a
//! type with an optional binding variable. Assignment is not part of this
//! grammar - it is parsed only at statement positions (see `parse_assign`).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | select | `? :` (right-associative) |
//! | cond-or | `\|\|` |
//! | cond-and | `&&` |
//! | or | `\|` |
//! | xor | `^` |
//! | and | `&` |
//! | equality | `==`, `!=` |
//! | relational | `<`, `<=`, `>`, `>=`, `is` |
//! | shift | `<<`, `>>` |
//! | additive | `+`, `-` |
//! | multiplicative | `*`, `/`, `%` |
//! | unary prefix | `-`, `~`, `!`, `++`, `--`, `new`, `resource` |

use cic_lex::Token;
use cic_util::ParseResult;

use crate::ast::{
    BinaryExpr, BinaryOp, CallExpr, Expr, IndexExpr, InterpolatedExpr, InterpolatedPart, Literal,
    LiteralExpr, PostfixExpr, PostfixOp, PrefixExpr, PrefixOp, SelectExpr, SymbolExpr, Var,
};
use crate::Parser;

/// Binding power levels; higher binds tighter.
pub(crate) mod bp {
    pub const MIN: u8 = 0;
    pub const SELECT: u8 = 2;
    pub const COND_OR: u8 = 4;
    pub const COND_AND: u8 = 6;
    pub const OR: u8 = 8;
    pub const XOR: u8 = 10;
    pub const AND: u8 = 12;
    pub const EQUALITY: u8 = 14;
    pub const RELATIONAL: u8 = 16;
    pub const SHIFT: u8 = 18;
    pub const ADDITIVE: u8 = 20;
    pub const MULTIPLICATIVE: u8 = 22;
}

/// Left binding power and operator for the plain left-associative binaries.
fn infix_binding_power(token: Token) -> Option<(u8, BinaryOp)> {
    let entry = match token {
        Token::Pipe => (bp::OR, BinaryOp::Or),
        Token::Caret => (bp::XOR, BinaryOp::Xor),
        Token::Amp => (bp::AND, BinaryOp::And),
        Token::EqEq => (bp::EQUALITY, BinaryOp::Equal),
        Token::NotEq => (bp::EQUALITY, BinaryOp::NotEqual),
        Token::Lt => (bp::RELATIONAL, BinaryOp::Less),
        Token::LtEq => (bp::RELATIONAL, BinaryOp::LessOrEqual),
        Token::Gt => (bp::RELATIONAL, BinaryOp::Greater),
        Token::GtEq => (bp::RELATIONAL, BinaryOp::GreaterOrEqual),
        Token::Shl => (bp::SHIFT, BinaryOp::Shl),
        Token::Shr => (bp::SHIFT, BinaryOp::Shr),
        Token::Plus => (bp::ADDITIVE, BinaryOp::Add),
        Token::Minus => (bp::ADDITIVE, BinaryOp::Sub),
        Token::Star => (bp::MULTIPLICATIVE, BinaryOp::Mul),
        Token::Slash => (bp::MULTIPLICATIVE, BinaryOp::Div),
        Token::Percent => (bp::MULTIPLICATIVE, BinaryOp::Mod),
        _ => return None,
    };
    Some(entry)
}

impl<'a> Parser<'a> {
    /// Parses a full expression (no assignment).
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt core: parses operators whose binding power is at least
    /// `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            match self.current() {
                Token::Question if bp::SELECT >= min_bp => {
                    self.forbid_xcrement(&left, "?")?;
                    self.next_token()?;
                    let on_true =
                        self.with_xcrement_parent("?", |p| p.parse_expr_bp(bp::SELECT))?;
                    self.expect(Token::Colon)?;
                    let on_false =
                        self.with_xcrement_parent("?", |p| p.parse_expr_bp(bp::SELECT))?;
                    let line = left.line();
                    left = Expr::Select(SelectExpr {
                        line,
                        cond: Box::new(left),
                        on_true: Box::new(on_true),
                        on_false: Box::new(on_false),
                    });
                }
                Token::OrOr if bp::COND_OR >= min_bp => {
                    self.forbid_xcrement(&left, "||")?;
                    self.next_token()?;
                    let right =
                        self.with_xcrement_parent("||", |p| p.parse_expr_bp(bp::COND_OR + 1))?;
                    left = binary(left, BinaryOp::CondOr, right);
                }
                Token::AndAnd if bp::COND_AND >= min_bp => {
                    self.forbid_xcrement(&left, "&&")?;
                    self.next_token()?;
                    let right =
                        self.with_xcrement_parent("&&", |p| p.parse_expr_bp(bp::COND_AND + 1))?;
                    left = binary(left, BinaryOp::CondAnd, right);
                }
                Token::Is if bp::RELATIONAL >= min_bp => {
                    self.next_token()?;
                    let right = self.parse_is_operand()?;
                    left = binary(left, BinaryOp::Is, right);
                }
                token => {
                    let Some((lbp, op)) = infix_binding_power(token) else {
                        break;
                    };
                    if lbp < min_bp {
                        break;
                    }
                    self.next_token()?;
                    let right = self.parse_expr_bp(lbp + 1)?;
                    left = binary(left, op, right);
                }
            }
        }

        Ok(left)
    }

    /// The right operand of `is`: a type name, optionally followed by a
    /// binding variable (`x is Circle c`).
    fn parse_is_operand(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let type_name = self.expect_ident()?;
        let type_expr = Expr::Symbol(SymbolExpr {
            line,
            left: None,
            name: type_name,
            type_args: Vec::new(),
        });
        if let Token::Ident(binding) = self.current() {
            self.next_token()?;
            Ok(Expr::Var(Var {
                line,
                doc: None,
                type_expr: Box::new(type_expr),
                name: binding,
                value: None,
            }))
        } else {
            Ok(type_expr)
        }
    }

    /// Prefix operators, then a primary expression.
    pub(crate) fn parse_unary(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let op = match self.current() {
            Token::Minus => PrefixOp::Minus,
            Token::Tilde => PrefixOp::Complement,
            Token::Bang => PrefixOp::Not,
            Token::Increment => {
                self.check_xcrement_parent("++")?;
                PrefixOp::Increment
            }
            Token::Decrement => {
                self.check_xcrement_parent("--")?;
                PrefixOp::Decrement
            }
            Token::New => {
                self.next_token()?;
                let inner = self.parse_primary()?;
                return Ok(Expr::Prefix(PrefixExpr {
                    line,
                    op: PrefixOp::New,
                    inner: Box::new(inner),
                }));
            }
            Token::Resource => return self.parse_resource(),
            _ => return self.parse_primary(),
        };
        self.next_token()?;
        let inner = self.parse_unary()?;
        Ok(Expr::Prefix(PrefixExpr {
            line,
            op,
            inner: Box::new(inner),
        }))
    }

    /// The `resource<byte[]>(path)` prefix form; no other `resource`
    /// spelling is accepted.
    fn parse_resource(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        self.next_token()?;
        self.expect(Token::Lt)?;
        match self.current() {
            Token::Ident(name) if name.as_str() == "byte" => self.next_token()?,
            _ => return Err(self.structural("Expected 'resource<byte[]>'")),
        };
        self.expect(Token::LBracket)?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Gt)?;
        self.expect(Token::LParen)?;
        let inner = self.parse_expr()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Prefix(PrefixExpr {
            line,
            op: PrefixOp::Resource,
            inner: Box::new(inner),
        }))
    }

    /// Atoms and postfix operators.
    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let mut result = match self.current() {
            Token::Long(value) => {
                self.next_token()?;
                literal(line, Literal::Long(value))
            }
            Token::Double(value) => {
                self.next_token()?;
                literal(line, Literal::Double(value))
            }
            Token::String(value) => {
                self.next_token()?;
                literal(line, Literal::String(value))
            }
            Token::True => {
                self.next_token()?;
                literal(line, Literal::Bool(true))
            }
            Token::False => {
                self.next_token()?;
                literal(line, Literal::Bool(false))
            }
            Token::Null => {
                self.next_token()?;
                literal(line, Literal::Null)
            }
            Token::InterpolatedString(prefix) => self.parse_interpolated(line, prefix)?,
            Token::LParen => {
                self.next_token()?;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                inner
            }
            Token::Ident(name) => {
                self.next_token()?;
                self.parse_symbol_reference(line, name)?
            }
            token => return Err(self.structural(format!("Expected expression, got {}", token))),
        };

        loop {
            match self.current() {
                Token::Dot => {
                    self.next_token()?;
                    let name = self.expect_ident()?;
                    let line = result.line();
                    result = Expr::Symbol(SymbolExpr {
                        line,
                        left: Some(Box::new(result)),
                        name,
                        type_args: Vec::new(),
                    });
                }
                Token::LParen => {
                    if !matches!(result, Expr::Symbol(_)) {
                        return Err(self.structural("Expected method name"));
                    }
                    self.next_token()?;
                    let mut args = Vec::new();
                    if !self.see(Token::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(Token::Comma)? {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RParen)?;
                    let line = result.line();
                    result = Expr::Call(CallExpr {
                        line,
                        method: Box::new(result),
                        args,
                    });
                }
                Token::LBracket => {
                    self.next_token()?;
                    let index = if self.see(Token::RBracket) {
                        None
                    } else {
                        Some(Box::new(self.parse_expr()?))
                    };
                    self.expect(Token::RBracket)?;
                    let line = result.line();
                    result = Expr::Index(IndexExpr {
                        line,
                        container: Box::new(result),
                        index,
                    });
                }
                Token::Increment => {
                    self.check_xcrement_parent("++")?;
                    self.next_token()?;
                    return Ok(postfix(result, PostfixOp::Increment));
                }
                Token::Decrement => {
                    self.check_xcrement_parent("--")?;
                    self.next_token()?;
                    return Ok(postfix(result, PostfixOp::Decrement));
                }
                Token::Bang => {
                    self.next_token()?;
                    result = postfix(result, PostfixOp::Bang);
                }
                Token::Hash => {
                    self.next_token()?;
                    result = postfix(result, PostfixOp::Hash);
                }
                _ => break,
            }
        }

        Ok(result)
    }

    /// A symbol reference whose name was just consumed. When the name is a
    /// known generic class and `<` follows, parses the type-argument list
    /// and an optional no-argument construction call.
    pub(crate) fn parse_symbol_reference(
        &mut self,
        line: u32,
        name: cic_util::Symbol,
    ) -> ParseResult<Expr> {
        let type_args = if self.see(Token::Lt) && self.generic_arity(name).is_some() {
            self.parse_type_args(name)?
        } else {
            Vec::new()
        };
        let generic = !type_args.is_empty();
        let symbol = Expr::Symbol(SymbolExpr {
            line,
            left: None,
            name,
            type_args,
        });

        // `List<int>()` - a construction call directly after the `>`.
        if generic && self.see(Token::LParen) {
            self.next_token()?;
            self.expect(Token::RParen)?;
            return Ok(Expr::Call(CallExpr {
                line,
                method: Box::new(symbol),
                args: Vec::new(),
            }));
        }
        Ok(symbol)
    }

    /// Parses the rest of an interpolated string starting from its first
    /// fragment token.
    fn parse_interpolated(&mut self, line: u32, first_prefix: cic_util::Symbol) -> ParseResult<Expr> {
        let mut parts = Vec::new();
        let mut prefix = first_prefix;
        loop {
            self.next_token()?;
            let argument = self.parse_expr()?;
            let width = if self.eat(Token::Comma)? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let (format, precision) = if self.see(Token::Colon) {
                let (format, precision) = self.read_interpolation_format()?;
                self.next_token()?;
                (Some(format), precision)
            } else {
                (None, None)
            };
            self.check(Token::RBrace)?;
            parts.push(InterpolatedPart {
                prefix,
                argument,
                width,
                format,
                precision,
            });

            self.continue_interpolated_string()?;
            match self.current() {
                Token::InterpolatedString(next_prefix) => prefix = next_prefix,
                Token::String(suffix) => {
                    self.next_token()?;
                    return Ok(Expr::Interpolated(InterpolatedExpr {
                        line,
                        parts,
                        suffix,
                    }));
                }
                token => {
                    return Err(self.structural(format!(
                        "Expected interpolated string to continue, got {}",
                        token
                    )))
                }
            }
        }
    }

    // =========================================================================
    // INCREMENT / DECREMENT RESTRICTION
    // =========================================================================

    /// Fails if `++`/`--` appears while a forbidding context is active.
    fn check_xcrement_parent(&self, op: &'static str) -> ParseResult<()> {
        match self.xcrement_parent() {
            Some(context) => {
                Err(self.contextual(format!("{} not allowed inside {}", op, context)))
            }
            None => Ok(()),
        }
    }

    /// Rejects `++`/`--` anywhere inside an already-parsed operand of a
    /// forbidding context (the left side of `&&`/`||`, the select
    /// condition).
    fn forbid_xcrement(&self, expr: &Expr, context: &'static str) -> ParseResult<()> {
        match expr {
            Expr::Prefix(p) => {
                match p.op {
                    PrefixOp::Increment => {
                        return Err(self
                            .contextual_at(p.line, format!("++ not allowed inside {}", context)))
                    }
                    PrefixOp::Decrement => {
                        return Err(self
                            .contextual_at(p.line, format!("-- not allowed inside {}", context)))
                    }
                    _ => {}
                }
                self.forbid_xcrement(&p.inner, context)
            }
            Expr::Postfix(p) => {
                match p.op {
                    PostfixOp::Increment => {
                        return Err(self
                            .contextual_at(p.line, format!("++ not allowed inside {}", context)))
                    }
                    PostfixOp::Decrement => {
                        return Err(self
                            .contextual_at(p.line, format!("-- not allowed inside {}", context)))
                    }
                    _ => {}
                }
                self.forbid_xcrement(&p.inner, context)
            }
            Expr::Literal(_) => Ok(()),
            Expr::Interpolated(e) => {
                for part in &e.parts {
                    self.forbid_xcrement(&part.argument, context)?;
                    if let Some(width) = &part.width {
                        self.forbid_xcrement(width, context)?;
                    }
                }
                Ok(())
            }
            Expr::Symbol(e) => match &e.left {
                Some(left) => self.forbid_xcrement(left, context),
                None => Ok(()),
            },
            Expr::Binary(b) => {
                self.forbid_xcrement(&b.left, context)?;
                self.forbid_xcrement(&b.right, context)
            }
            Expr::Index(i) => {
                self.forbid_xcrement(&i.container, context)?;
                match &i.index {
                    Some(index) => self.forbid_xcrement(index, context),
                    None => Ok(()),
                }
            }
            Expr::Call(c) => {
                self.forbid_xcrement(&c.method, context)?;
                for arg in &c.args {
                    self.forbid_xcrement(arg, context)?;
                }
                Ok(())
            }
            Expr::Select(s) => {
                self.forbid_xcrement(&s.cond, context)?;
                self.forbid_xcrement(&s.on_true, context)?;
                self.forbid_xcrement(&s.on_false, context)
            }
            Expr::Aggregate(a) => {
                for item in &a.items {
                    self.forbid_xcrement(item, context)?;
                }
                Ok(())
            }
            Expr::Var(v) => match &v.value {
                Some(value) => self.forbid_xcrement(value, context),
                None => Ok(()),
            },
        }
    }

    /// Resumes string-mode lexing after the `}` of an interpolation
    /// argument.
    fn continue_interpolated_string(&mut self) -> ParseResult<()> {
        self.lexer.continue_interpolated_string()
    }

    fn read_interpolation_format(&mut self) -> ParseResult<(char, Option<u8>)> {
        self.lexer.read_interpolation_format()
    }
}

fn literal(line: u32, value: Literal) -> Expr {
    Expr::Literal(LiteralExpr { line, value })
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let line = left.line();
    Expr::Binary(BinaryExpr {
        line,
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

fn postfix(inner: Expr, op: PostfixOp) -> Expr {
    let line = inner.line();
    Expr::Postfix(PostfixExpr {
        line,
        inner: Box::new(inner),
        op,
    })
}
