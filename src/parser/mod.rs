mod common;
mod expr;
mod stmt;

use self::common::Parser;
use crate::ast::Program;
use crate::error::CompileError;
use crate::lexer::Token;
use crate::span::{SourceMap, Span};

pub fn parse(tokens: &[Token], sm: &SourceMap, file: &str) -> Result<Program, CompileError> {
    let mut parser = Parser::new(tokens, sm, file);
    let mut statements = Vec::new();

    let start_span = parser.current_span();

    while parser.peek().is_some() {
        statements.push(parser.parse_stmt()?);
    }

    let span = if statements.is_empty() {
        start_span
    } else {
        start_span.merge(parser.previous_span())
    };

    Ok(Program { statements, span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, ExprKind, StmtKind, Type};
    use crate::lexer;

    fn parse_src(src: &str) -> Program {
        let sm = SourceMap::new(src.to_string());
        let tokens = lexer::lex(&sm, "test.tysh").unwrap();
        parse(&tokens, &sm, "test.tysh").unwrap()
    }

    #[test]
    fn parses_var_decl() {
        let p = parse_src("const int i = 42;");
        assert_eq!(p.statements.len(), 1);
        match &p.statements[0].node {
            StmtKind::VarDecl {
                is_const,
                ty,
                name,
                value,
            } => {
                assert!(is_const);
                assert_eq!(*ty, Type::Int);
                assert_eq!(name.node, "i");
                assert_eq!(value.node, ExprKind::IntLiteral(42));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let p = parse_src("int x = 1 + 2 * 3;");
        match &p.statements[0].node {
            StmtKind::VarDecl { value, .. } => match &value.node {
                ExprKind::Binary { op, right, .. } => {
                    assert_eq!(*op, BinOp::Add);
                    assert!(matches!(
                        right.node,
                        ExprKind::Binary { op: BinOp::Mul, .. }
                    ));
                }
                other => panic!("unexpected expression: {:?}", other),
            },
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn comparison_binds_tighter_than_logical_and() {
        let p = parse_src("bool b = 1 < 2 && 3 < 4;");
        match &p.statements[0].node {
            StmtKind::VarDecl { value, .. } => match &value.node {
                ExprKind::Binary { op, left, right, .. } => {
                    assert_eq!(*op, BinOp::And);
                    assert!(matches!(left.node, ExprKind::Binary { op: BinOp::Lt, .. }));
                    assert!(matches!(right.node, ExprKind::Binary { op: BinOp::Lt, .. }));
                }
                other => panic!("unexpected expression: {:?}", other),
            },
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn parses_func_decl_with_typed_params() {
        let p = parse_src("func add(int a, int b) int { return a + b; }");
        match &p.statements[0].node {
            StmtKind::FuncDecl {
                name, params, ret, body,
            } => {
                assert_eq!(name.node, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].ty, Type::Int);
                assert_eq!(*ret, Type::Int);
                assert_eq!(body.len(), 1);
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn parses_if_else_if_chain() {
        let p = parse_src("if a { } else if b { } else { break; }");
        match &p.statements[0].node {
            StmtKind::If {
                else_ifs,
                else_body,
                ..
            } => {
                assert_eq!(else_ifs.len(), 1);
                assert_eq!(else_body.as_ref().unwrap().len(), 1);
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_assignment_target() {
        let sm = SourceMap::new("1 = 2;".to_string());
        let tokens = lexer::lex(&sm, "test.tysh").unwrap();
        assert!(parse(&tokens, &sm, "test.tysh").is_err());
    }
}
