//! Scope environment for the lowering pass.
//!
//! A chain of lexical scopes (one per program, function body, if-body and
//! while-body). Declarations touch the innermost scope only; lookups walk
//! outward to the root. The chain is plain compile-time bookkeeping owned
//! by a single lowering pass.

use crate::ast::Type;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct VarInfo {
    pub ty: Type,
    pub is_const: bool,
    /// Member name → type, recorded when an object variable is declared
    /// from an object literal. `None` for non-object variables.
    pub members: Option<HashMap<String, Type>>,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<(String, Type)>,
    pub ret: Type,
}

#[derive(Debug, Default)]
struct Scope {
    vars: HashMap<String, VarInfo>,
    funcs: HashMap<String, Signature>,
}

#[derive(Debug)]
pub struct Env {
    scopes: Vec<Scope>,
}

impl Env {
    /// Create the root scope, pre-populated with the boolean literal names
    /// and the reserved pseudo-register variables the emitter relies on.
    pub fn new() -> Self {
        let mut root = Scope::default();
        for name in ["true", "false"] {
            root.vars.insert(
                name.to_string(),
                VarInfo {
                    ty: Type::Bool,
                    is_const: true,
                    members: None,
                },
            );
        }
        let reserved = [
            ("tmpBool", Type::Bool),
            ("tmpInts", Type::Array(Box::new(Type::Int))),
            ("tmpStrs", Type::Array(Box::new(Type::Str))),
            ("tmpBools", Type::Array(Box::new(Type::Bool))),
            ("tmpIntIndex", Type::Int),
            ("tmpStrIndex", Type::Int),
            ("tmpBoolIndex", Type::Int),
        ];
        for (name, ty) in reserved {
            root.vars.insert(
                name.to_string(),
                VarInfo {
                    ty,
                    is_const: true,
                    members: None,
                },
            );
        }
        Env { scopes: vec![root] }
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the root scope");
        self.scopes.pop();
    }

    fn current(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope chain is never empty")
    }

    pub fn declare_var(
        &mut self,
        name: &str,
        is_const: bool,
        ty: Type,
        members: Option<HashMap<String, Type>>,
    ) -> Result<(), String> {
        let scope = self.current();
        if scope.vars.contains_key(name) {
            return Err(format!("cannot redeclare variable '{}'", name));
        }
        scope.vars.insert(
            name.to_string(),
            VarInfo {
                ty,
                is_const,
                members,
            },
        );
        Ok(())
    }

    /// Resolve an assignment target: the variable must exist somewhere in
    /// the chain and must not be a constant.
    pub fn assign_var(&self, name: &str) -> Result<&VarInfo, String> {
        match self.lookup_var(name) {
            None => Err(format!("variable '{}' does not exist", name)),
            Some(info) if info.is_const => Err(format!("cannot reassign constant '{}'", name)),
            Some(info) => Ok(info),
        }
    }

    pub fn lookup_var(&self, name: &str) -> Option<&VarInfo> {
        self.scopes.iter().rev().find_map(|s| s.vars.get(name))
    }

    pub fn declare_func(&mut self, name: &str, sig: Signature) -> Result<(), String> {
        if self.lookup_func(name).is_some() {
            return Err(format!("function '{}' is already declared", name));
        }
        self.current().funcs.insert(name.to_string(), sig);
        Ok(())
    }

    pub fn lookup_func(&self, name: &str) -> Option<&Signature> {
        self.scopes.iter().rev().find_map(|s| s.funcs.get(name))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_and_looks_up_through_chain() {
        let mut env = Env::new();
        env.declare_var("x", false, Type::Int, None).unwrap();
        env.push();
        assert_eq!(env.lookup_var("x").unwrap().ty, Type::Int);
        env.declare_var("y", false, Type::Str, None).unwrap();
        env.pop();
        assert!(env.lookup_var("y").is_none());
    }

    #[test]
    fn same_scope_redeclaration_fails() {
        let mut env = Env::new();
        env.declare_var("x", false, Type::Int, None).unwrap();
        let err = env.declare_var("x", false, Type::Str, None).unwrap_err();
        assert_eq!(err, "cannot redeclare variable 'x'");
    }

    #[test]
    fn shadowing_in_child_scope_is_allowed() {
        let mut env = Env::new();
        env.declare_var("x", false, Type::Int, None).unwrap();
        env.push();
        env.declare_var("x", false, Type::Str, None).unwrap();
        assert_eq!(env.lookup_var("x").unwrap().ty, Type::Str);
    }

    #[test]
    fn constants_cannot_be_assigned() {
        let mut env = Env::new();
        env.declare_var("x", true, Type::Int, None).unwrap();
        let err = env.assign_var("x").unwrap_err();
        assert_eq!(err, "cannot reassign constant 'x'");
        let err = env.assign_var("missing").unwrap_err();
        assert_eq!(err, "variable 'missing' does not exist");
    }

    #[test]
    fn register_names_are_reserved() {
        let mut env = Env::new();
        let err = env.declare_var("tmpBool", false, Type::Bool, None).unwrap_err();
        assert_eq!(err, "cannot redeclare variable 'tmpBool'");
        assert_eq!(
            env.lookup_var("tmpInts").unwrap().ty,
            Type::Array(Box::new(Type::Int))
        );
    }

    #[test]
    fn function_redeclaration_fails_across_the_chain() {
        let mut env = Env::new();
        let sig = Signature {
            params: vec![],
            ret: Type::Void,
        };
        env.declare_func("f", sig.clone()).unwrap();
        env.push();
        let err = env.declare_func("f", sig).unwrap_err();
        assert_eq!(err, "function 'f' is already declared");
    }
}
