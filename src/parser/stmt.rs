use super::common::Parser;
use crate::ast::{ElseIf, ExprKind, LValue, Param, Spanned, Stmt, StmtKind, Type};
use crate::error::CompileError;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub fn parse_stmt(&mut self) -> Result<Stmt, CompileError> {
        let start_span = self.current_span();

        let kind = match self.peek_kind() {
            None => return Err(self.error("Expected statement, got EOF", start_span)),
            Some(k) => k.clone(),
        };

        let stmt_kind = match kind {
            TokenKind::Comment(text) => {
                self.advance();
                StmtKind::Comment(text)
            }
            TokenKind::Const => {
                self.advance();
                self.parse_var_decl(true)?
            }
            TokenKind::BoolType | TokenKind::IntType | TokenKind::StrType | TokenKind::ObjType => {
                self.parse_var_decl(false)?
            }
            TokenKind::If => {
                self.advance();
                self.parse_if()?
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                StmtKind::While { cond, body }
            }
            TokenKind::Func => {
                self.advance();
                self.parse_func_decl()?
            }
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semi)?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semi)?;
                StmtKind::Continue
            }
            TokenKind::Return => {
                self.advance();
                if self.match_kind(TokenKind::Semi) {
                    StmtKind::Return(None)
                } else {
                    let value = self.parse_expr()?;
                    self.expect(TokenKind::Semi)?;
                    StmtKind::Return(Some(value))
                }
            }
            TokenKind::Ident(_) => self.parse_assign_or_call()?,
            other => {
                return Err(self.error(&format!("Expected statement, got {:?}", other), start_span));
            }
        };

        let span = start_span.merge(self.previous_span());
        Ok(Spanned::new(stmt_kind, span))
    }

    fn parse_var_decl(&mut self, is_const: bool) -> Result<StmtKind, CompileError> {
        let ty = self.parse_type("variable type")?;
        let name = self.expect_ident("variable name")?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(StmtKind::VarDecl {
            is_const,
            ty,
            name,
            value,
        })
    }

    fn parse_if(&mut self) -> Result<StmtKind, CompileError> {
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;

        let mut else_ifs = Vec::new();
        let mut else_body = None;

        while self.peek_kind() == Some(&TokenKind::Else) {
            self.advance();
            if self.match_kind(TokenKind::If) {
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                else_ifs.push(ElseIf { cond, body });
            } else {
                else_body = Some(self.parse_block()?);
                break;
            }
        }

        Ok(StmtKind::If {
            cond,
            then_body,
            else_ifs,
            else_body,
        })
    }

    fn parse_func_decl(&mut self) -> Result<StmtKind, CompileError> {
        let name = self.expect_ident("function name")?;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.match_kind(TokenKind::RParen) {
            loop {
                let ty = self.parse_param_type()?;
                let name = self.expect_ident("parameter name")?;
                params.push(Param { ty, name });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let ret = self.parse_return_type()?;
        let body = self.parse_block()?;

        Ok(StmtKind::FuncDecl {
            name,
            params,
            ret,
            body,
        })
    }

    fn parse_assign_or_call(&mut self) -> Result<StmtKind, CompileError> {
        let expr = self.parse_expr()?;

        if self.match_kind(TokenKind::Equals) {
            let target = match expr.node {
                ExprKind::Ident(name) => LValue::Var(Spanned::new(name, expr.span)),
                ExprKind::Member { object, property } => match object.node {
                    ExprKind::Ident(name) => LValue::Member {
                        object: Spanned::new(name, object.span),
                        property,
                    },
                    _ => {
                        return Err(self.error(
                            "Assignment target must be a variable or 'object.member'",
                            expr.span,
                        ));
                    }
                },
                _ => {
                    return Err(self.error(
                        "Assignment target must be a variable or 'object.member'",
                        expr.span,
                    ));
                }
            };
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi)?;
            Ok(StmtKind::Assign { target, value })
        } else if matches!(expr.node, ExprKind::Call { .. }) {
            self.expect(TokenKind::Semi)?;
            Ok(StmtKind::ExprStmt(expr))
        } else {
            Err(self.error(
                "Expected '=' or a function call in statement position",
                self.current_span(),
            ))
        }
    }

    pub fn parse_block(&mut self) -> Result<Vec<Stmt>, CompileError> {
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.match_kind(TokenKind::RBrace) {
            if self.peek().is_none() {
                return Err(self.error("Expected '}', got EOF", self.current_span()));
            }
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    fn parse_type(&mut self, what: &str) -> Result<Type, CompileError> {
        let ty = match self.peek_kind() {
            Some(TokenKind::BoolType) => Type::Bool,
            Some(TokenKind::IntType) => Type::Int,
            Some(TokenKind::StrType) => Type::Str,
            Some(TokenKind::ObjType) => Type::Object,
            Some(other) => {
                return Err(self.error(
                    &format!("Expected {}, got {:?}", what, other),
                    self.current_span(),
                ));
            }
            None => {
                return Err(self.error(
                    &format!("Expected {}, got EOF", what),
                    self.current_span(),
                ));
            }
        };
        self.advance();
        Ok(ty)
    }

    fn parse_param_type(&mut self) -> Result<Type, CompileError> {
        let ty = match self.peek_kind() {
            Some(TokenKind::BoolType) => Type::Bool,
            Some(TokenKind::IntType) => Type::Int,
            Some(TokenKind::StrType) => Type::Str,
            Some(other) => {
                return Err(self.error(
                    &format!("Expected parameter type (bool, int or str), got {:?}", other),
                    self.current_span(),
                ));
            }
            None => return Err(self.error("Expected parameter type, got EOF", self.current_span())),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_return_type(&mut self) -> Result<Type, CompileError> {
        let ty = match self.peek_kind() {
            Some(TokenKind::BoolType) => Type::Bool,
            Some(TokenKind::IntType) => Type::Int,
            Some(TokenKind::StrType) => Type::Str,
            Some(TokenKind::VoidType) => Type::Void,
            Some(other) => {
                return Err(self.error(
                    &format!(
                        "Expected return type (bool, int, str or void), got {:?}",
                        other
                    ),
                    self.current_span(),
                ));
            }
            None => return Err(self.error("Expected return type, got EOF", self.current_span())),
        };
        self.advance();
        Ok(ty)
    }
}
