//! Native function registry.
//!
//! Natives are the fixed set of built-in functions every program may call
//! without declaring. Each carries a signature for call checking and a
//! hand-written bash body; a native's body is appended to the output once,
//! the first time a call to it is lowered. Value-returning natives follow
//! the same pseudo-register protocol as user functions.

use crate::ast::Type;
use crate::ir;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
pub enum Params {
    Fixed(&'static [(&'static str, Type)]),
    /// Any arity, any value-typed arguments.
    Variadic,
}

#[derive(Debug, Clone)]
pub struct Native {
    pub name: &'static str,
    pub params: Params,
    pub ret: Type,
    body: &'static [&'static str],
}

impl Native {
    /// The register a call to this native reads its result from, if any.
    pub fn register(&self) -> Option<ir::Register> {
        ir::Register::for_type(&self.ret)
    }

    /// Build the shell function implementing this native.
    pub fn materialize(&self) -> ir::Stmt {
        ir::Stmt::Function {
            name: self.name.to_string(),
            doc: self.doc_line(),
            params: Vec::new(),
            body: self.body.iter().map(|l| ir::Stmt::Raw(l.to_string())).collect(),
        }
    }

    fn doc_line(&self) -> String {
        let params = match self.params {
            Params::Variadic => "...".to_string(),
            Params::Fixed(params) => params
                .iter()
                .map(|(name, ty)| format!("{} {}", ty, name))
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!("{}({}) {}", self.name, params, self.ret)
    }
}

static NATIVES: LazyLock<HashMap<&'static str, Native>> = LazyLock::new(|| {
    let natives = [
        Native {
            name: "exec",
            params: Params::Fixed(&[("command", Type::Str)]),
            ret: Type::Void,
            body: &[r#"eval "${1}""#],
        },
        Native {
            name: "exit",
            params: Params::Fixed(&[("code", Type::Int)]),
            ret: Type::Void,
            // `builtin` keeps the shell builtin reachable from inside a
            // function of the same name.
            body: &[r#"builtin exit "${1}""#],
        },
        Native {
            name: "input",
            params: Params::Fixed(&[("prompt", Type::Str)]),
            ret: Type::Str,
            body: &[
                "local reply",
                r#"read -r -p "${1}" reply"#,
                r#"tmpStrs[${tmpStrIndex}]="${reply}""#,
                "tmpStrIndex=$((tmpStrIndex + 1))",
            ],
        },
        Native {
            name: "print",
            params: Params::Variadic,
            ret: Type::Void,
            body: &[r#"printf '%s' "$@""#],
        },
        Native {
            name: "printLn",
            params: Params::Variadic,
            ret: Type::Void,
            body: &[r#"printf '%s' "$@""#, r#"printf '\n'"#],
        },
        Native {
            name: "sleep",
            params: Params::Fixed(&[("seconds", Type::Int)]),
            ret: Type::Void,
            body: &[r#"command sleep "${1}""#],
        },
        Native {
            name: "strIsBool",
            params: Params::Fixed(&[("value", Type::Str)]),
            ret: Type::Bool,
            body: &[
                r#"if [[ "${1}" == "true" || "${1}" == "false" ]]; then"#,
                r#"  tmpBools[${tmpBoolIndex}]="true""#,
                "else",
                r#"  tmpBools[${tmpBoolIndex}]="false""#,
                "fi",
                "tmpBoolIndex=$((tmpBoolIndex + 1))",
            ],
        },
        Native {
            name: "strIsInt",
            params: Params::Fixed(&[("value", Type::Str)]),
            ret: Type::Bool,
            body: &[
                r#"if [[ "${1}" =~ ^-?[0-9]+$ ]]; then"#,
                r#"  tmpBools[${tmpBoolIndex}]="true""#,
                "else",
                r#"  tmpBools[${tmpBoolIndex}]="false""#,
                "fi",
                "tmpBoolIndex=$((tmpBoolIndex + 1))",
            ],
        },
        Native {
            name: "strToBool",
            params: Params::Fixed(&[("value", Type::Str)]),
            ret: Type::Bool,
            body: &[
                r#"tmpBools[${tmpBoolIndex}]="${1}""#,
                "tmpBoolIndex=$((tmpBoolIndex + 1))",
            ],
        },
        Native {
            name: "strToInt",
            params: Params::Fixed(&[("value", Type::Str)]),
            ret: Type::Int,
            body: &[
                r#"tmpInts[${tmpIntIndex}]="${1}""#,
                "tmpIntIndex=$((tmpIntIndex + 1))",
            ],
        },
    ];
    natives.into_iter().map(|n| (n.name, n)).collect()
});

pub fn lookup(name: &str) -> Option<&'static Native> {
    NATIVES.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_every_native() {
        for name in [
            "exec", "exit", "input", "print", "printLn", "sleep", "strIsBool", "strIsInt",
            "strToBool", "strToInt",
        ] {
            assert!(lookup(name).is_some(), "missing native {}", name);
        }
        assert!(lookup("eval").is_none());
    }

    #[test]
    fn doc_lines_render_signatures() {
        assert_eq!(lookup("input").unwrap().doc_line(), "input(str prompt) str");
        assert_eq!(lookup("print").unwrap().doc_line(), "print(...) void");
    }

    #[test]
    fn value_returning_natives_map_to_registers() {
        assert_eq!(lookup("strToInt").unwrap().register(), Some(ir::Register::Int));
        assert_eq!(lookup("input").unwrap().register(), Some(ir::Register::Str));
        assert_eq!(lookup("print").unwrap().register(), None);
    }
}
