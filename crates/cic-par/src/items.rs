//! Top-level declarations: classes, their members, and enums.

use cic_lex::Token;
use cic_util::{ParseResult, Symbol};

use crate::ast::{
    CallKind, Class, Const, Constructor, Enum, EnumConstant, Expr, Field, Method, Parameters,
    ReturnStmt, Stmt, TypeDecl, TypeId, Visibility,
};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a class declaration; the current token is `class`.
    pub(crate) fn parse_class(
        &mut self,
        doc: Option<Symbol>,
        line: u32,
        visibility: Visibility,
        call_kind: CallKind,
    ) -> ParseResult<()> {
        if matches!(call_kind, CallKind::Virtual | CallKind::Override) {
            return Err(self.contextual(format!("Class cannot be {}", call_kind.as_str())));
        }

        self.expect(Token::Class)?;
        let name = self.expect_ident()?;
        if self.program.try_lookup(name).is_some() {
            return Err(self.contextual(format!("Duplicate symbol '{}'", name)));
        }
        let base_class = if self.eat(Token::Colon)? {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.expect(Token::LBrace)?;

        let type_id = self.program.next_type_id();
        let mut class = Class {
            line,
            doc,
            visibility,
            call_kind,
            name,
            base_class,
            constructor: None,
            consts: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            type_parameter_count: 0,
        };

        while !self.see(Token::RBrace) {
            if self.see(Token::Eof) {
                return Err(self.structural("Expected '}', got end of file"));
            }
            self.parse_member(&mut class, type_id)?;
        }
        self.next_token()?;

        self.program.add(TypeDecl::Class(class));
        Ok(())
    }

    /// Parses one class member: a const, the constructor, a method, or a
    /// field.
    fn parse_member(&mut self, class: &mut Class, type_id: TypeId) -> ParseResult<()> {
        let doc = self.parse_doc()?;
        let line = self.line();
        let visibility = self.parse_visibility()?;

        if self.see(Token::Const) {
            let constant = self.parse_const(doc, visibility)?;
            class.consts.push(constant);
            return Ok(());
        }

        let call_kind = self.parse_call_kind()?;
        let visibility = self.check_member_kind(class, call_kind, visibility)?;

        let return_type = if self.eat(Token::Void)? {
            None
        } else {
            Some(self.parse_type()?)
        };

        // A `{` after a no-argument call on the class's own name is the
        // constructor.
        if self.see(Token::LBrace) {
            if let Some(Expr::Call(call)) = &return_type {
                if let Expr::Symbol(method) = &*call.method {
                    if method.left.is_none() {
                        let ctor_line = call.line;
                        if method.name != class.name {
                            return Err(self.contextual_at(
                                ctor_line,
                                "Constructor name does not match the class name",
                            ));
                        }
                        if !call.args.is_empty() {
                            return Err(self
                                .contextual_at(ctor_line, "Constructor cannot have parameters"));
                        }
                        if call_kind != CallKind::Normal {
                            return Err(self.contextual_at(
                                ctor_line,
                                format!("Constructor cannot be {}", call_kind.as_str()),
                            ));
                        }
                        if class.constructor.is_some() {
                            return Err(self.contextual_at(ctor_line, "Duplicate constructor"));
                        }
                        // TODO: revisit defaulting private constructors to
                        // internal visibility.
                        let visibility = if visibility == Visibility::Private {
                            Visibility::Internal
                        } else {
                            visibility
                        };
                        let body = self.parse_block()?;
                        class.constructor = Some(Constructor {
                            line: ctor_line,
                            doc,
                            visibility,
                            body,
                        });
                        return Ok(());
                    }
                }
            }
        }

        let name = self.expect_ident()?;

        if self.see(Token::LParen) || self.see(Token::Bang) {
            let method = self.parse_method_rest(
                doc, line, visibility, call_kind, return_type, name, type_id,
            )?;
            class.methods.push(method);
            return Ok(());
        }

        // Field.
        if call_kind != CallKind::Normal {
            return Err(
                self.contextual_at(line, format!("Field cannot be {}", call_kind.as_str()))
            );
        }
        let Some(type_expr) = return_type else {
            return Err(self.contextual_at(line, "Field cannot be void"));
        };
        if visibility == Visibility::Public {
            return Err(self.contextual_at(line, "Field cannot be public"));
        }
        let value = if self.eat(Token::Eq)? {
            Some(self.parse_initializer()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        class.fields.push(Field {
            line,
            doc,
            visibility,
            type_expr,
            name,
            value,
        });
        Ok(())
    }

    /// Enforces the class/member call-kind legality matrix and resolves the
    /// member's effective visibility.
    ///
    /// Private visibility is only legal with Static or Normal call-kind;
    /// since private is purely the default (there is no keyword for it), a
    /// member that participates in dispatch is promoted to protected.
    fn check_member_kind(
        &self,
        class: &Class,
        kind: CallKind,
        visibility: Visibility,
    ) -> ParseResult<Visibility> {
        match (class.call_kind, kind) {
            (CallKind::Static, k) if k != CallKind::Static => {
                return Err(self.contextual("Members of a static class must be static"));
            }
            (CallKind::Normal | CallKind::Sealed, CallKind::Abstract) => {
                return Err(
                    self.contextual("Abstract methods are allowed only in an abstract class")
                );
            }
            (CallKind::Sealed, CallKind::Virtual) => {
                return Err(self.contextual("Virtual methods are not allowed in a sealed class"));
            }
            _ => {}
        }
        if visibility == Visibility::Private
            && !matches!(kind, CallKind::Static | CallKind::Normal)
        {
            return Ok(Visibility::Protected);
        }
        Ok(visibility)
    }

    /// Parses the rest of a method after its name: `[!](params) [throws]`
    /// then `;`, `=> expr;`, or a block body.
    #[allow(clippy::too_many_arguments)]
    fn parse_method_rest(
        &mut self,
        doc: Option<Symbol>,
        line: u32,
        visibility: Visibility,
        call_kind: CallKind,
        return_type: Option<Expr>,
        name: Symbol,
        type_id: TypeId,
    ) -> ParseResult<Method> {
        let is_mutator = self.eat(Token::Bang)?;
        self.expect(Token::LParen)?;

        let mut list = Vec::new();
        if !self.see(Token::RParen) {
            loop {
                let param_doc = self.parse_doc()?;
                list.push(self.parse_var(param_doc)?);
                if !self.eat(Token::Comma)? {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        let throws = self.eat(Token::Throws)?;

        let body = if call_kind == CallKind::Abstract {
            self.expect(Token::Semicolon)?;
            None
        } else if self.eat(Token::FatArrow)? {
            let return_line = self.line();
            let value = self.parse_expr()?;
            self.expect(Token::Semicolon)?;
            Some(Stmt::Return(ReturnStmt {
                line: return_line,
                value: Some(value),
            }))
        } else {
            Some(self.parse_block()?)
        };

        Ok(Method {
            line,
            doc,
            visibility,
            call_kind,
            return_type,
            name,
            params: Parameters {
                owner: type_id,
                list,
            },
            is_mutator,
            throws,
            body,
        })
    }

    /// Parses `const Type Name = initializer;`; the current token is
    /// `const`. Shared between class members and block statements.
    pub(crate) fn parse_const(
        &mut self,
        doc: Option<Symbol>,
        visibility: Visibility,
    ) -> ParseResult<Const> {
        let line = self.line();
        self.expect(Token::Const)?;
        let type_expr = self.parse_type()?;
        let name = self.expect_ident()?;
        self.expect(Token::Eq)?;
        let value = self.parse_initializer()?;
        self.expect(Token::Semicolon)?;
        Ok(Const {
            line,
            doc,
            visibility,
            type_expr,
            name,
            value,
        })
    }

    /// Parses an enum declaration; the current token is `enum`. A `*` after
    /// the keyword makes it a flags enum, in which every constant needs an
    /// explicit value.
    pub(crate) fn parse_enum(
        &mut self,
        doc: Option<Symbol>,
        line: u32,
        visibility: Visibility,
    ) -> ParseResult<()> {
        self.next_token()?;
        let is_flags = self.eat(Token::Star)?;
        let name = self.expect_ident()?;
        if self.program.try_lookup(name).is_some() {
            return Err(self.contextual(format!("Duplicate symbol '{}'", name)));
        }
        self.expect(Token::LBrace)?;

        let mut constants = Vec::new();
        loop {
            let const_doc = self.parse_doc()?;
            let const_line = self.line();
            let const_name = self.expect_ident()?;
            let value = if self.eat(Token::Eq)? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if is_flags && value.is_none() {
                return Err(self.contextual_at(
                    const_line,
                    "Flags enum constants must have explicit values",
                ));
            }
            constants.push(EnumConstant {
                line: const_line,
                doc: const_doc,
                name: const_name,
                value,
            });
            if !self.eat(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RBrace)?;

        self.program.add(TypeDecl::Enum(Enum {
            line,
            doc,
            visibility,
            name,
            is_flags,
            constants,
        }));
        Ok(())
    }
}
