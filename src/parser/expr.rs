use super::common::Parser;
use crate::ast::{BinOp, Expr, ExprKind, Property, Spanned};
use crate::error::CompileError;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == Some(&TokenKind::OrOr) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinOp::Or, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_comparison()?;
        while self.peek_kind() == Some(&TokenKind::AndAnd) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(BinOp::And, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinOp::Lt,
                Some(TokenKind::Le) => BinOp::Le,
                Some(TokenKind::Gt) => BinOp::Gt,
                Some(TokenKind::Ge) => BinOp::Ge,
                Some(TokenKind::EqEq) => BinOp::Eq,
                Some(TokenKind::NotEq) => BinOp::NotEq,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_postfix()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_postfix()?;
            left = binary(op, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_kind(TokenKind::Dot) {
                let property = self.expect_ident("member name after '.'")?;
                let span = expr.span.merge(property.span);
                expr = Spanned::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property,
                    },
                    span,
                );
            } else if self.match_kind(TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                let span = expr.span.merge(self.previous_span());
                expr = Spanned::new(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let span = self.current_span();
        match self.peek_kind() {
            Some(TokenKind::Number(n)) => {
                let n = *n;
                self.advance();
                Ok(Spanned::new(ExprKind::IntLiteral(n), span))
            }
            Some(TokenKind::Minus) => {
                // Negative integer literal; the language has no unary operators.
                self.advance();
                match self.peek_kind() {
                    Some(TokenKind::Number(n)) => {
                        let n = *n;
                        let full = span.merge(self.current_span());
                        self.advance();
                        Ok(Spanned::new(ExprKind::IntLiteral(-n), full))
                    }
                    _ => Err(self.error("Expected integer literal after '-'", self.current_span())),
                }
            }
            Some(TokenKind::String(s)) => {
                let s = s.clone();
                self.advance();
                Ok(Spanned::new(ExprKind::StrLiteral(s), span))
            }
            Some(TokenKind::True) => {
                self.advance();
                Ok(Spanned::new(ExprKind::BoolLiteral(true), span))
            }
            Some(TokenKind::False) => {
                self.advance();
                Ok(Spanned::new(ExprKind::BoolLiteral(false), span))
            }
            Some(TokenKind::LBrace) => self.parse_object_literal(),
            Some(TokenKind::Ident(name)) => {
                let callee = Spanned::new(name.clone(), span);
                self.advance();
                if self.match_kind(TokenKind::LParen) {
                    let mut args = Vec::new();
                    if !self.match_kind(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.match_kind(TokenKind::Comma) {
                                break;
                            }
                        }
                        self.expect(TokenKind::RParen)?;
                    }
                    let full = span.merge(self.previous_span());
                    Ok(Spanned::new(ExprKind::Call { callee, args }, full))
                } else {
                    Ok(Spanned::new(ExprKind::Ident(callee.node), span))
                }
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            Some(other) => Err(self.error(&format!("Expected expression, got {:?}", other), span)),
            None => Err(self.error("Expected expression, got EOF", span)),
        }
    }

    fn parse_object_literal(&mut self) -> Result<Expr, CompileError> {
        let start = self.current_span();
        self.expect(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        if !self.match_kind(TokenKind::RBrace) {
            loop {
                let name = self.expect_ident("property name")?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr()?;
                properties.push(Property { name, value });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
        }
        let span = start.merge(self.previous_span());
        Ok(Spanned::new(ExprKind::ObjectLiteral(properties), span))
    }
}

fn binary(op: BinOp, op_span: crate::span::Span, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Spanned::new(
        ExprKind::Binary {
            op,
            op_span,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}
