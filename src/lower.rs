//! Lowering pass: type checking and target IR construction in one walk.
//!
//! One function per source node kind. Expression lowering returns the
//! resolved logical type together with the built IR value, so ancestors
//! never need to re-walk a child. Statements that an expression has to
//! emit before its value is usable (reified booleans, calls feeding a
//! pseudo-register) are pushed into the surrounding statement list.
//!
//! The first scope, type or context error aborts the pass.

use crate::ast::{
    BinOp, ElseIf, Expr, ExprKind, LValue, Param, Program, Spanned, Stmt, StmtKind, Type,
};
use crate::env::{Env, Signature};
use crate::error::CompileError;
use crate::ir;
use crate::natives::{self, Params};
use crate::span::{SourceMap, Span};
use std::collections::{HashMap, HashSet};

pub fn lower(program: &Program, sm: &SourceMap, file: &str) -> Result<ir::Program, CompileError> {
    let mut lowerer = Lowerer::new(sm, file);
    let mut user_body = Vec::new();
    for stmt in &program.statements {
        lowerer.lower_stmt(stmt, &mut user_body)?;
    }
    Ok(ir::Program {
        native_body: lowerer.native_body,
        user_body,
        registers: lowerer.registers,
    })
}

/// Lexical context frame for break/continue/return validation. A loop
/// frame does not satisfy break/continue checks across an intervening
/// function boundary.
enum Frame {
    Function { ret: Type },
    Loop,
}

struct Lowerer<'a> {
    sm: &'a SourceMap,
    file: &'a str,
    env: Env,
    frames: Vec<Frame>,
    used_natives: HashSet<&'static str>,
    native_body: Vec<ir::Stmt>,
    registers: ir::RegisterUsage,
    // Compile-time mirrors of the runtime register index counters. The
    // walk order is the runtime execution order, so incrementing once per
    // value-returning call site keeps both in step.
    next_bool: u32,
    next_int: u32,
    next_str: u32,
}

impl<'a> Lowerer<'a> {
    fn new(sm: &'a SourceMap, file: &'a str) -> Self {
        Lowerer {
            sm,
            file,
            env: Env::new(),
            frames: Vec::new(),
            used_natives: HashSet::new(),
            native_body: Vec::new(),
            registers: ir::RegisterUsage::default(),
            next_bool: 0,
            next_int: 0,
            next_str: 0,
        }
    }

    fn error(&self, msg: &str, span: Span) -> CompileError {
        CompileError::new(self.sm.format_diagnostic(self.file, msg, span))
    }

    fn in_loop(&self) -> bool {
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Loop => return true,
                Frame::Function { .. } => return false,
            }
        }
        false
    }

    fn enclosing_return_type(&self) -> Option<Type> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Function { ret } => Some(ret.clone()),
            Frame::Loop => None,
        })
    }

    /// Move a reified boolean out of the shared `tmpBool` scalar into a
    /// fresh register slot. Required whenever more lowering runs before
    /// the value is consumed: the next reification overwrites `tmpBool`.
    fn spill_tmp_bool(&mut self, value: ir::Val, out: &mut Vec<ir::Stmt>) -> ir::Val {
        let is_tmp_bool = matches!(&value, ir::Val::Var { name, .. } if name == "tmpBool");
        if !is_tmp_bool {
            return value;
        }
        out.push(ir::Stmt::RegisterWrite {
            register: ir::Register::Bool,
            value,
        });
        let index = self.alloc_register(ir::Register::Bool);
        ir::Val::RegisterRead {
            register: ir::Register::Bool,
            index,
        }
    }

    /// Reserve the next compile-time index of a register array.
    fn alloc_register(&mut self, register: ir::Register) -> u32 {
        self.registers.mark(register);
        let counter = match register {
            ir::Register::Bool => &mut self.next_bool,
            ir::Register::Int => &mut self.next_int,
            ir::Register::Str => &mut self.next_str,
        };
        let index = *counter;
        *counter += 1;
        index
    }

    fn lower_block(&mut self, stmts: &[Stmt], out: &mut Vec<ir::Stmt>) -> Result<(), CompileError> {
        self.env.push();
        for stmt in stmts {
            self.lower_stmt(stmt, out)?;
        }
        self.env.pop();
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt, out: &mut Vec<ir::Stmt>) -> Result<(), CompileError> {
        match &stmt.node {
            StmtKind::Comment(text) => {
                out.push(ir::Stmt::Comment(text.clone()));
                Ok(())
            }
            StmtKind::VarDecl {
                is_const,
                ty,
                name,
                value,
            } => self.lower_var_decl(*is_const, ty, name, value, out),
            StmtKind::Assign { target, value } => self.lower_assign(target, value, out),
            StmtKind::If {
                cond,
                then_body,
                else_ifs,
                else_body,
            } => self.lower_if(cond, then_body, else_ifs, else_body.as_deref(), out),
            StmtKind::While { cond, body } => {
                // A condition needing statements before the test would
                // evaluate them once, outside the loop; the re-test would
                // then read a fixed register slot forever.
                let mut prelude = Vec::new();
                let cond_span = cond.span;
                let cond = self.lower_cond(cond, &mut prelude)?;
                if !prelude.is_empty() {
                    return Err(self.error(
                        "while condition cannot contain a function call or nested comparison",
                        cond_span,
                    ));
                }
                let mut loop_body = Vec::new();
                self.frames.push(Frame::Loop);
                self.lower_block(body, &mut loop_body)?;
                self.frames.pop();
                out.push(ir::Stmt::While {
                    cond,
                    body: loop_body,
                });
                Ok(())
            }
            StmtKind::FuncDecl {
                name,
                params,
                ret,
                body,
            } => self.lower_func_decl(name, params, ret, body, out),
            StmtKind::Break | StmtKind::Continue => {
                if !self.in_loop() {
                    return Err(self.error(
                        &format!(
                            "'{}' is only allowed inside a while loop",
                            stmt.node.kind_name()
                        ),
                        stmt.span,
                    ));
                }
                out.push(match stmt.node {
                    StmtKind::Break => ir::Stmt::Break,
                    _ => ir::Stmt::Continue,
                });
                Ok(())
            }
            StmtKind::Return(value) => self.lower_return(value.as_ref(), stmt.span, out),
            StmtKind::ExprStmt(expr) => match &expr.node {
                ExprKind::Call { callee, args } => {
                    self.lower_call(callee, args, out)?;
                    Ok(())
                }
                other => Err(self.error(
                    &format!("'{}' cannot be used as a statement", other.kind_name()),
                    expr.span,
                )),
            },
        }
    }

    fn lower_var_decl(
        &mut self,
        is_const: bool,
        ty: &Type,
        name: &Spanned<String>,
        value: &Expr,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        if *ty == Type::Object {
            return self.lower_object_decl(is_const, name, value, out);
        }

        let (value_ty, value) = self.lower_expr(value, out)?;
        if value_ty != *ty {
            return Err(self.error(
                &format!(
                    "cannot assign value of type '{}' to variable '{}' of type '{}'",
                    value_ty, name.node, ty
                ),
                name.span,
            ));
        }
        self.env
            .declare_var(&name.node, is_const, ty.clone(), None)
            .map_err(|msg| self.error(&msg, name.span))?;
        out.push(ir::Stmt::Assign {
            name: name.node.clone(),
            value,
        });
        Ok(())
    }

    /// Object support is a reduced-scope extension: literals with literal
    /// properties only, lowered onto an associative array.
    fn lower_object_decl(
        &mut self,
        is_const: bool,
        name: &Spanned<String>,
        value: &Expr,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        let ExprKind::ObjectLiteral(props) = &value.node else {
            return Err(self.error(
                "variable of type 'obj' must be initialized with an object literal",
                value.span,
            ));
        };

        let mut members = HashMap::new();
        let mut properties = Vec::new();
        for prop in props {
            let (prop_ty, prop_val) = match &prop.value.node {
                ExprKind::IntLiteral(n) => (Type::Int, ir::Val::Int(*n)),
                ExprKind::StrLiteral(s) => (Type::Str, ir::Val::Str(s.clone())),
                ExprKind::BoolLiteral(b) => (Type::Bool, ir::Val::Bool(*b)),
                other => {
                    return Err(self.error(
                        &format!(
                            "object property must be a literal value, got '{}'",
                            other.kind_name()
                        ),
                        prop.value.span,
                    ));
                }
            };
            if members.insert(prop.name.node.clone(), prop_ty).is_some() {
                return Err(self.error(
                    &format!("duplicate object property '{}'", prop.name.node),
                    prop.name.span,
                ));
            }
            properties.push((prop.name.node.clone(), prop_val));
        }

        self.env
            .declare_var(&name.node, is_const, Type::Object, Some(members))
            .map_err(|msg| self.error(&msg, name.span))?;
        out.push(ir::Stmt::ObjectDecl {
            name: name.node.clone(),
            properties,
        });
        Ok(())
    }

    fn lower_assign(
        &mut self,
        target: &LValue,
        value: &Expr,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        match target {
            LValue::Var(name) => {
                let target_ty = self
                    .env
                    .assign_var(&name.node)
                    .map_err(|msg| self.error(&msg, name.span))?
                    .ty
                    .clone();
                let (value_ty, value) = self.lower_expr(value, out)?;
                if value_ty != target_ty {
                    return Err(self.error(
                        &format!(
                            "cannot assign value of type '{}' to variable '{}' of type '{}'",
                            value_ty, name.node, target_ty
                        ),
                        name.span,
                    ));
                }
                out.push(ir::Stmt::Assign {
                    name: name.node.clone(),
                    value,
                });
                Ok(())
            }
            LValue::Member { object, property } => {
                let info = self
                    .env
                    .assign_var(&object.node)
                    .map_err(|msg| self.error(&msg, object.span))?;
                if info.ty != Type::Object {
                    return Err(self.error(
                        &format!("variable '{}' is not an object", object.node),
                        object.span,
                    ));
                }
                let member_ty = info
                    .members
                    .as_ref()
                    .and_then(|m| m.get(&property.node))
                    .cloned()
                    .ok_or_else(|| {
                        self.error(
                            &format!(
                                "object '{}' has no member '{}'",
                                object.node, property.node
                            ),
                            property.span,
                        )
                    })?;
                // Reduced scope: member assignment accepts integer
                // literals only.
                let ExprKind::IntLiteral(n) = &value.node else {
                    return Err(self.error(
                        "object member assignment only supports integer literals",
                        value.span,
                    ));
                };
                if member_ty != Type::Int {
                    return Err(self.error(
                        &format!(
                            "cannot assign value of type 'int' to member '{}.{}' of type '{}'",
                            object.node, property.node, member_ty
                        ),
                        property.span,
                    ));
                }
                out.push(ir::Stmt::MemberAssign {
                    object: object.node.clone(),
                    property: property.node.clone(),
                    value: ir::Val::Int(*n),
                });
                Ok(())
            }
        }
    }

    fn lower_if(
        &mut self,
        cond: &Expr,
        then_body: &[Stmt],
        else_ifs: &[ElseIf],
        else_body: Option<&[Stmt]>,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        let cond = self.lower_cond(cond, out)?;
        let mut then_ir = Vec::new();
        self.lower_block(then_body, &mut then_ir)?;

        // Lowered in source order so condition preludes (and the register
        // slots they reserve) land in execution order, then linked into
        // the alternate chain back to front.
        let mut arms = Vec::with_capacity(else_ifs.len());
        for else_if in else_ifs {
            let cond = self.lower_cond(&else_if.cond, out)?;
            let mut body = Vec::new();
            self.lower_block(&else_if.body, &mut body)?;
            arms.push((cond, body));
        }
        let mut alternate = match else_body {
            Some(body) => {
                let mut else_ir = Vec::new();
                self.lower_block(body, &mut else_ir)?;
                Some(Box::new(ir::Alternate::Else(else_ir)))
            }
            None => None,
        };
        for (cond, body) in arms.into_iter().rev() {
            alternate = Some(Box::new(ir::Alternate::ElseIf {
                cond,
                body,
                alternate,
            }));
        }

        out.push(ir::Stmt::If {
            cond,
            then_body: then_ir,
            alternate,
        });
        Ok(())
    }

    fn lower_func_decl(
        &mut self,
        name: &Spanned<String>,
        params: &[Param],
        ret: &Type,
        body: &[Stmt],
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        if self.enclosing_return_type().is_some() {
            return Err(self.error(
                &format!(
                    "cannot declare function '{}' inside another function",
                    name.node
                ),
                name.span,
            ));
        }
        if natives::lookup(&name.node).is_some() {
            return Err(self.error(
                &format!("function '{}' is already declared", name.node),
                name.span,
            ));
        }

        let sig_params: Vec<(String, Type)> = params
            .iter()
            .map(|p| (p.name.node.clone(), p.ty.clone()))
            .collect();
        // Declared before the body is lowered, so the function may recurse.
        self.env
            .declare_func(
                &name.node,
                Signature {
                    params: sig_params.clone(),
                    ret: ret.clone(),
                },
            )
            .map_err(|msg| self.error(&msg, name.span))?;

        self.frames.push(Frame::Function { ret: ret.clone() });
        self.env.push();
        for param in params {
            self.env
                .declare_var(&param.name.node, false, param.ty.clone(), None)
                .map_err(|msg| self.error(&msg, param.name.span))?;
        }
        let mut body_ir = Vec::new();
        for stmt in body {
            self.lower_stmt(stmt, &mut body_ir)?;
        }
        self.env.pop();
        self.frames.pop();

        let doc = format!(
            "{}({}) {}",
            name.node,
            sig_params
                .iter()
                .map(|(n, t)| format!("{} {}", t, n))
                .collect::<Vec<_>>()
                .join(", "),
            ret
        );
        out.push(ir::Stmt::Function {
            name: name.node.clone(),
            doc,
            params: sig_params,
            body: body_ir,
        });
        Ok(())
    }

    fn lower_return(
        &mut self,
        value: Option<&Expr>,
        span: Span,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(), CompileError> {
        let Some(ret) = self.enclosing_return_type() else {
            return Err(self.error("'ReturnExpr' is only allowed inside a function", span));
        };

        let register = match ir::Register::for_type(&ret) {
            Some(register) => register,
            None => {
                // Void function: the return must carry no value.
                return match value {
                    Some(value) => Err(self.error(
                        "function with return type 'void' cannot return a value",
                        value.span,
                    )),
                    None => {
                        out.push(ir::Stmt::Return);
                        Ok(())
                    }
                };
            }
        };

        let Some(value) = value else {
            return Err(self.error(
                &format!("function with return type '{}' must return a value", ret),
                span,
            ));
        };
        let (value_ty, value) = self.lower_expr(value, out)?;
        if value_ty != ret {
            return Err(self.error(
                &format!(
                    "return value of type '{}' does not match return type '{}'",
                    value_ty, ret
                ),
                span,
            ));
        }
        self.registers.mark(register);
        out.push(ir::Stmt::RegisterWrite { register, value });
        out.push(ir::Stmt::Return);
        Ok(())
    }

    /// Lower a call, validate its arguments, and reserve a register slot
    /// for the result when the callee returns a value. The slot is
    /// reserved even when the result is discarded: the callee advances
    /// the runtime counter unconditionally.
    fn lower_call(
        &mut self,
        callee: &Spanned<String>,
        args: &[Expr],
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(Type, Option<ir::Val>), CompileError> {
        let mut lowered = Vec::with_capacity(args.len());
        let mut arg_types = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let (ty, val) = self.lower_expr(arg, out)?;
            // Later arguments may reify into tmpBool; only the last value
            // lowered can stay there.
            let val = if i + 1 < args.len() {
                self.spill_tmp_bool(val, out)
            } else {
                val
            };
            arg_types.push((ty, arg.span));
            lowered.push(val);
        }

        let ret = if let Some(native) = natives::lookup(&callee.node) {
            match native.params {
                Params::Variadic => {
                    for (ty, span) in &arg_types {
                        if !matches!(ty, Type::Bool | Type::Int | Type::Str) {
                            return Err(self.error(
                                &format!(
                                    "argument of type '{}' cannot be passed to '{}'",
                                    ty, callee.node
                                ),
                                *span,
                            ));
                        }
                    }
                }
                Params::Fixed(params) => {
                    let expected: Vec<(String, Type)> = params
                        .iter()
                        .map(|(n, t)| (n.to_string(), t.clone()))
                        .collect();
                    self.check_args(&callee.node, &expected, &arg_types, callee.span)?;
                }
            }
            if self.used_natives.insert(native.name) {
                if let Some(register) = native.register() {
                    self.registers.mark(register);
                }
                self.native_body.push(native.materialize());
            }
            native.ret.clone()
        } else if let Some(sig) = self.env.lookup_func(&callee.node).cloned() {
            self.check_args(&callee.node, &sig.params, &arg_types, callee.span)?;
            sig.ret
        } else {
            return Err(self.error(
                &format!("function '{}' does not exist", callee.node),
                callee.span,
            ));
        };

        out.push(ir::Stmt::Call {
            name: callee.node.clone(),
            args: lowered,
        });

        match ir::Register::for_type(&ret) {
            Some(register) => {
                let index = self.alloc_register(register);
                Ok((ret, Some(ir::Val::RegisterRead { register, index })))
            }
            None => Ok((ret, None)),
        }
    }

    fn check_args(
        &self,
        callee: &str,
        expected: &[(String, Type)],
        actual: &[(Type, Span)],
        call_span: Span,
    ) -> Result<(), CompileError> {
        if expected.len() != actual.len() {
            let plural = if expected.len() == 1 { "" } else { "s" };
            return Err(self.error(
                &format!(
                    "function '{}' expects {} argument{}, got {}",
                    callee,
                    expected.len(),
                    plural,
                    actual.len()
                ),
                call_span,
            ));
        }
        for (i, ((_, expected_ty), (actual_ty, span))) in
            expected.iter().zip(actual.iter()).enumerate()
        {
            if actual_ty != expected_ty {
                return Err(self.error(
                    &format!(
                        "argument {} of '{}' must be of type '{}', got '{}'",
                        i + 1,
                        callee,
                        expected_ty,
                        actual_ty
                    ),
                    *span,
                ));
            }
        }
        Ok(())
    }

    fn lower_expr(
        &mut self,
        expr: &Expr,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(Type, ir::Val), CompileError> {
        match &expr.node {
            ExprKind::IntLiteral(n) => Ok((Type::Int, ir::Val::Int(*n))),
            ExprKind::StrLiteral(s) => Ok((Type::Str, ir::Val::Str(s.clone()))),
            ExprKind::BoolLiteral(b) => Ok((Type::Bool, ir::Val::Bool(*b))),
            ExprKind::ObjectLiteral(_) => Err(self.error(
                "object literals are only allowed in 'obj' variable declarations",
                expr.span,
            )),
            ExprKind::Ident(name) => {
                let info = self.env.lookup_var(name).ok_or_else(|| {
                    self.error(&format!("variable '{}' does not exist", name), expr.span)
                })?;
                Ok((
                    info.ty.clone(),
                    ir::Val::Var {
                        name: name.clone(),
                        ty: info.ty.clone(),
                    },
                ))
            }
            ExprKind::Binary {
                op,
                op_span,
                left,
                right,
            } => self.lower_binary(expr, *op, *op_span, left, right, out),
            ExprKind::Call { callee, args } => {
                let (ret, val) = self.lower_call(callee, args, out)?;
                match val {
                    Some(val) => Ok((ret, val)),
                    None => Err(self.error(
                        &format!(
                            "call to void function '{}' cannot be used as a value",
                            callee.node
                        ),
                        expr.span,
                    )),
                }
            }
            ExprKind::Member { object, property } => {
                let ExprKind::Ident(object_name) = &object.node else {
                    return Err(self.error(
                        "member access requires an object variable",
                        object.span,
                    ));
                };
                let info = self.env.lookup_var(object_name).ok_or_else(|| {
                    self.error(
                        &format!("variable '{}' does not exist", object_name),
                        object.span,
                    )
                })?;
                if info.ty != Type::Object {
                    return Err(self.error(
                        &format!("variable '{}' is not an object", object_name),
                        object.span,
                    ));
                }
                let member_ty = info
                    .members
                    .as_ref()
                    .and_then(|m| m.get(&property.node))
                    .cloned()
                    .ok_or_else(|| {
                        self.error(
                            &format!(
                                "object '{}' has no member '{}'",
                                object_name, property.node
                            ),
                            property.span,
                        )
                    })?;
                Ok((
                    member_ty.clone(),
                    ir::Val::Member {
                        object: object_name.clone(),
                        property: property.node.clone(),
                        ty: member_ty,
                    },
                ))
            }
            ExprKind::Index { base, index } => {
                let ExprKind::Ident(base_name) = &base.node else {
                    return Err(self.error("only variables can be indexed", base.span));
                };
                let info = self.env.lookup_var(base_name).ok_or_else(|| {
                    self.error(
                        &format!("variable '{}' does not exist", base_name),
                        base.span,
                    )
                })?;
                let Type::Array(elem) = info.ty.clone() else {
                    return Err(self.error(
                        &format!("variable '{}' of type '{}' cannot be indexed", base_name, info.ty),
                        base.span,
                    ));
                };
                let (index_ty, index_val) = self.lower_expr(index, out)?;
                if index_ty != Type::Int {
                    return Err(self.error(
                        &format!("array index must be of type 'int', got '{}'", index_ty),
                        index.span,
                    ));
                }
                Ok((
                    (*elem).clone(),
                    ir::Val::Index {
                        name: base_name.clone(),
                        index: Box::new(index_val),
                        ty: (*elem).clone(),
                    },
                ))
            }
        }
    }

    fn lower_binary(
        &mut self,
        expr: &Expr,
        op: BinOp,
        op_span: Span,
        left: &Expr,
        right: &Expr,
        out: &mut Vec<ir::Stmt>,
    ) -> Result<(Type, ir::Val), CompileError> {
        if op.is_comparison() || op.is_logical() {
            // The target has no boolean expression syntax in value
            // position: reify through the reserved boolean temporary.
            let cond = self.lower_cond(expr, out)?;
            out.push(ir::Stmt::If {
                cond,
                then_body: vec![ir::Stmt::Assign {
                    name: "tmpBool".to_string(),
                    value: ir::Val::Bool(true),
                }],
                alternate: Some(Box::new(ir::Alternate::Else(vec![ir::Stmt::Assign {
                    name: "tmpBool".to_string(),
                    value: ir::Val::Bool(false),
                }]))),
            });
            return Ok((
                Type::Bool,
                ir::Val::Var {
                    name: "tmpBool".to_string(),
                    ty: Type::Bool,
                },
            ));
        }

        let (left_ty, left_val) = self.lower_expr(left, out)?;
        let (right_ty, right_val) = self.lower_expr(right, out)?;
        match (&left_ty, &right_ty) {
            (Type::Int, Type::Int) => {
                let op = match op {
                    BinOp::Add => ir::ArithOp::Add,
                    BinOp::Sub => ir::ArithOp::Sub,
                    BinOp::Mul => ir::ArithOp::Mul,
                    BinOp::Div => ir::ArithOp::Div,
                    _ => unreachable!("comparison and logical operators handled above"),
                };
                Ok((
                    Type::Int,
                    ir::Val::Arith {
                        op,
                        left: Box::new(left_val),
                        right: Box::new(right_val),
                    },
                ))
            }
            (Type::Str, Type::Str) => {
                if op != BinOp::Add {
                    return Err(self.error(
                        &format!(
                            "binary string expression with unsupported operator '{}'",
                            op.symbol()
                        ),
                        op_span,
                    ));
                }
                Ok((
                    Type::Str,
                    ir::Val::Concat(Box::new(left_val), Box::new(right_val)),
                ))
            }
            _ => Err(self.error(
                &format!(
                    "binary operator '{}' is not supported between types '{}' and '{}'",
                    op.symbol(),
                    left_ty,
                    right_ty
                ),
                op_span,
            )),
        }
    }

    /// Lower an expression in condition position into the comparison /
    /// boolean condition family.
    fn lower_cond(&mut self, expr: &Expr, out: &mut Vec<ir::Stmt>) -> Result<ir::Cond, CompileError> {
        if let ExprKind::Binary {
            op,
            op_span,
            left,
            right,
        } = &expr.node
        {
            if op.is_logical() {
                let left = self.lower_cond(left, out)?;
                let right = self.lower_cond(right, out)?;
                return Ok(match op {
                    BinOp::And => ir::Cond::And(Box::new(left), Box::new(right)),
                    _ => ir::Cond::Or(Box::new(left), Box::new(right)),
                });
            }
            if op.is_comparison() {
                let (left_ty, left_val) = self.lower_expr(left, out)?;
                // Lowering the right side may reify into tmpBool too.
                let left_val = self.spill_tmp_bool(left_val, out);
                let (right_ty, right_val) = self.lower_expr(right, out)?;
                if left_ty != right_ty {
                    return Err(self.error(
                        &format!(
                            "comparison between types '{}' and '{}' is not supported",
                            left_ty, right_ty
                        ),
                        *op_span,
                    ));
                }
                if !matches!(left_ty, Type::Bool | Type::Int | Type::Str) {
                    return Err(self.error(
                        &format!("values of type '{}' cannot be compared", left_ty),
                        *op_span,
                    ));
                }
                let op = match op {
                    BinOp::Lt => ir::CompareOp::Lt,
                    BinOp::Le => ir::CompareOp::Le,
                    BinOp::Gt => ir::CompareOp::Gt,
                    BinOp::Ge => ir::CompareOp::Ge,
                    BinOp::Eq => ir::CompareOp::Eq,
                    _ => ir::CompareOp::NotEq,
                };
                return Ok(ir::Cond::Compare {
                    op,
                    operand_ty: left_ty,
                    left: left_val,
                    right: right_val,
                });
            }
        }

        let (ty, val) = self.lower_expr(expr, out)?;
        if ty != Type::Bool {
            return Err(self.error(
                &format!("condition is not of type bool, got '{}'", ty),
                expr.span,
            ));
        }
        Ok(ir::Cond::Truthy(val))
    }
}
