//! Emitter: renders the target IR as bash text.
//!
//! A pure function over the IR carrying only an indentation depth and the
//! output buffer. All typing decisions were made during lowering; this
//! stage only picks the syntax form per node: quoting by logical type,
//! `-lt` versus `<` per comparison operand type, `$(( ))` for arithmetic,
//! and a `:` placeholder where bash rejects an empty block.

use crate::ast::Type;
use crate::ir::{Alternate, Cond, Program, Register, Stmt, Val};

const INDENT: &str = "  ";

pub fn emit(program: &Program) -> String {
    let mut emitter = Emitter { out: String::new() };

    emitter.line(0, "#!/bin/bash");
    emitter.line(0, "# Generated by the tyshc compiler. Do not edit.");

    if program.registers.any() {
        emitter.out.push('\n');
        for register in [Register::Bool, Register::Int, Register::Str] {
            let used = match register {
                Register::Bool => program.registers.bools,
                Register::Int => program.registers.ints,
                Register::Str => program.registers.strs,
            };
            if used {
                emitter.line(0, &format!("{}=0", register.index_var()));
            }
        }
    }

    if !program.native_body.is_empty() {
        emitter.out.push('\n');
        emitter.line(0, "### native functions ###");
        for stmt in &program.native_body {
            emitter.stmt(0, stmt);
        }
    }

    emitter.out.push('\n');
    emitter.line(0, "### user script ###");
    for stmt in &program.user_body {
        emitter.stmt(0, stmt);
    }

    emitter.out
}

struct Emitter {
    out: String,
}

impl Emitter {
    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Emit a block body, appending the no-op placeholder where bash
    /// would see an empty one. Comments do not count as statements to
    /// bash, so a comment-only body still needs the placeholder.
    fn block(&mut self, indent: usize, body: &[Stmt]) {
        for stmt in body {
            self.stmt(indent, stmt);
        }
        if !has_executable(body) {
            self.line(indent, ":");
        }
    }

    fn stmt(&mut self, indent: usize, stmt: &Stmt) {
        match stmt {
            Stmt::Comment(text) => self.line(indent, &format!("# {}", text)),
            Stmt::Assign { name, value } => {
                self.line(indent, &format!("{}={}", name, value_form(value)));
            }
            Stmt::MemberAssign {
                object,
                property,
                value,
            } => {
                self.line(
                    indent,
                    &format!("{}[{}]={}", object, property, value_form(value)),
                );
            }
            Stmt::ObjectDecl { name, properties } => {
                self.line(indent, &format!("declare -A {}", name));
                for (property, value) in properties {
                    self.line(indent, &format!("{}[{}]={}", name, property, value_form(value)));
                }
            }
            Stmt::If {
                cond,
                then_body,
                alternate,
            } => {
                self.line(indent, &format!("if [[ {} ]]; then", cond_form(cond)));
                self.block(indent + 1, then_body);
                let mut next = alternate.as_deref();
                while let Some(alt) = next {
                    match alt {
                        Alternate::ElseIf {
                            cond,
                            body,
                            alternate,
                        } => {
                            self.line(indent, &format!("elif [[ {} ]]; then", cond_form(cond)));
                            self.block(indent + 1, body);
                            next = alternate.as_deref();
                        }
                        Alternate::Else(body) => {
                            self.line(indent, "else");
                            self.block(indent + 1, body);
                            next = None;
                        }
                    }
                }
                self.line(indent, "fi");
            }
            Stmt::While { cond, body } => {
                self.line(indent, &format!("while [[ {} ]]; do", cond_form(cond)));
                self.block(indent + 1, body);
                self.line(indent, "done");
            }
            Stmt::Function {
                name,
                doc,
                params,
                body,
            } => {
                self.out.push('\n');
                self.line(indent, &format!("# {}", doc));
                self.line(indent, &format!("{}() {{", name));
                for (i, (param, _)) in params.iter().enumerate() {
                    self.line(indent + 1, &format!("local {}=\"${{{}}}\"", param, i + 1));
                }
                for stmt in body {
                    self.stmt(indent + 1, stmt);
                }
                if params.is_empty() && !has_executable(body) {
                    self.line(indent + 1, ":");
                }
                self.line(indent, "}");
            }
            Stmt::Call { name, args } => {
                let mut line = name.clone();
                for arg in args {
                    line.push(' ');
                    line.push_str(&value_form(arg));
                }
                self.line(indent, &line);
            }
            Stmt::RegisterWrite { register, value } => {
                self.line(
                    indent,
                    &format!(
                        "{}[${{{}}}]={}",
                        register.array(),
                        register.index_var(),
                        value_form(value)
                    ),
                );
                self.line(
                    indent,
                    &format!(
                        "{index}=$(({index} + 1))",
                        index = register.index_var()
                    ),
                );
            }
            Stmt::Return => self.line(indent, "return"),
            Stmt::Break => self.line(indent, "break"),
            Stmt::Continue => self.line(indent, "continue"),
            Stmt::Raw(text) => self.line(indent, text),
        }
    }
}

fn has_executable(body: &[Stmt]) -> bool {
    body.iter().any(|s| !matches!(s, Stmt::Comment(_)))
}

/// Render a value in word position. Int-typed values stay bare; str and
/// bool values are quoted.
fn value_form(value: &Val) -> String {
    match value {
        Val::Int(n) => n.to_string(),
        Val::Bool(b) => format!("\"{}\"", b),
        Val::Str(s) => quote_str(s),
        Val::Var { name, ty } => expansion(&format!("${{{}}}", name), ty),
        Val::RegisterRead { register, index } => expansion(
            &format!("${{{}[{}]}}", register.array(), index),
            &register.value_type(),
        ),
        Val::Arith { op, left, right } => format!(
            "$(({} {} {}))",
            arith_operand(left),
            op.symbol(),
            arith_operand(right)
        ),
        Val::Concat(left, right) => format!("{}{}", value_form(left), value_form(right)),
        Val::Index { name, index, ty } => expansion(
            &format!("${{{}[{}]}}", name, arith_operand(index)),
            ty,
        ),
        Val::Member {
            object,
            property,
            ty,
        } => expansion(&format!("${{{}[{}]}}", object, property), ty),
    }
}

fn expansion(text: &str, ty: &Type) -> String {
    match ty {
        Type::Int => text.to_string(),
        _ => format!("\"{}\"", text),
    }
}

/// Render an int value inside an arithmetic context, where names appear
/// bare and nesting needs explicit parentheses.
fn arith_operand(value: &Val) -> String {
    match value {
        Val::Int(n) => n.to_string(),
        Val::Var { name, .. } => name.clone(),
        Val::RegisterRead { register, index } => format!("{}[{}]", register.array(), index),
        Val::Arith { op, left, right } => format!(
            "({} {} {})",
            arith_operand(left),
            op.symbol(),
            arith_operand(right)
        ),
        Val::Index { name, index, .. } => format!("{}[{}]", name, arith_operand(index)),
        Val::Member {
            object, property, ..
        } => format!("{}[{}]", object, property),
        other => value_form(other),
    }
}

fn cond_form(cond: &Cond) -> String {
    match cond {
        Cond::Compare {
            op,
            operand_ty,
            left,
            right,
        } => {
            let op = match operand_ty {
                Type::Int => op.int_form(),
                _ => op.literal_form(),
            };
            format!("{} {} {}", value_form(left), op, value_form(right))
        }
        Cond::And(left, right) => {
            format!("{} && {}", cond_group(left), cond_group(right))
        }
        Cond::Or(left, right) => {
            format!("{} || {}", cond_group(left), cond_group(right))
        }
        Cond::Truthy(value) => format!("{} == \"true\"", value_form(value)),
    }
}

/// Parenthesize composite operands of a composite condition so the
/// emitted test keeps the source nesting.
fn cond_group(cond: &Cond) -> String {
    match cond {
        Cond::And(..) | Cond::Or(..) => format!("( {} )", cond_form(cond)),
        _ => cond_form(cond),
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArithOp, CompareOp};

    #[test]
    fn quoting_follows_logical_type() {
        let int_var = Val::Var {
            name: "i".to_string(),
            ty: Type::Int,
        };
        let str_var = Val::Var {
            name: "s".to_string(),
            ty: Type::Str,
        };
        let bool_var = Val::Var {
            name: "b".to_string(),
            ty: Type::Bool,
        };
        assert_eq!(value_form(&int_var), "${i}");
        assert_eq!(value_form(&str_var), "\"${s}\"");
        assert_eq!(value_form(&bool_var), "\"${b}\"");
    }

    #[test]
    fn int_comparisons_use_test_flags() {
        let cond = Cond::Compare {
            op: CompareOp::Gt,
            operand_ty: Type::Int,
            left: Val::Int(42),
            right: Val::Int(13),
        };
        assert_eq!(cond_form(&cond), "42 -gt 13");

        let cond = Cond::Compare {
            op: CompareOp::Eq,
            operand_ty: Type::Str,
            left: Val::Str("a".to_string()),
            right: Val::Str("b".to_string()),
        };
        assert_eq!(cond_form(&cond), "\"a\" == \"b\"");
    }

    #[test]
    fn nested_arithmetic_is_parenthesized() {
        let value = Val::Arith {
            op: ArithOp::Mul,
            left: Box::new(Val::Arith {
                op: ArithOp::Add,
                left: Box::new(Val::Var {
                    name: "a".to_string(),
                    ty: Type::Int,
                }),
                right: Box::new(Val::Int(1)),
            }),
            right: Box::new(Val::Int(2)),
        };
        assert_eq!(value_form(&value), "$(((a + 1) * 2))");
    }

    #[test]
    fn string_literals_escape_shell_metacharacters() {
        assert_eq!(quote_str("a$b"), "\"a\\$b\"");
        assert_eq!(quote_str("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
