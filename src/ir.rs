//! Target IR: the subset of constructs bash can literally execute.
//!
//! The lowering pass resolves every source construct into these nodes with
//! logical types already attached, so the emitter only has to pick syntax.
//! Binary expressions arrive pre-split: arithmetic lives in `Val::Arith`,
//! comparisons and boolean connectives live in `Cond` (bash uses entirely
//! different syntax for the two families).

use crate::ast::Type;

/// One of the three reserved pseudo-register arrays used to pass a value
/// out of a callee, bash having no return-value channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Bool,
    Int,
    Str,
}

impl Register {
    pub fn array(&self) -> &'static str {
        match self {
            Register::Bool => "tmpBools",
            Register::Int => "tmpInts",
            Register::Str => "tmpStrs",
        }
    }

    pub fn index_var(&self) -> &'static str {
        match self {
            Register::Bool => "tmpBoolIndex",
            Register::Int => "tmpIntIndex",
            Register::Str => "tmpStrIndex",
        }
    }

    pub fn value_type(&self) -> Type {
        match self {
            Register::Bool => Type::Bool,
            Register::Int => Type::Int,
            Register::Str => Type::Str,
        }
    }

    pub fn for_type(ty: &Type) -> Option<Register> {
        match ty {
            Type::Bool => Some(Register::Bool),
            Type::Int => Some(Register::Int),
            Type::Str => Some(Register::Str),
            _ => None,
        }
    }
}

/// Which register index counters the emitted script must initialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterUsage {
    pub bools: bool,
    pub ints: bool,
    pub strs: bool,
}

impl RegisterUsage {
    pub fn mark(&mut self, register: Register) {
        match register {
            Register::Bool => self.bools = true,
            Register::Int => self.ints = true,
            Register::Str => self.strs = true,
        }
    }

    pub fn any(&self) -> bool {
        self.bools || self.ints || self.strs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    NotEq,
}

impl CompareOp {
    /// Operator form for integer operands inside `[[ ]]`.
    pub fn int_form(&self) -> &'static str {
        match self {
            CompareOp::Lt => "-lt",
            CompareOp::Le => "-le",
            CompareOp::Gt => "-gt",
            CompareOp::Ge => "-ge",
            CompareOp::Eq => "-eq",
            CompareOp::NotEq => "-ne",
        }
    }

    /// Literal operator form for string/boolean operands inside `[[ ]]`.
    pub fn literal_form(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
        }
    }
}

/// A value bash can expand in word position.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Int(i64),
    Str(String),
    Bool(bool),
    /// Variable reference tagged with its logical type; the type decides
    /// the quoting form.
    Var { name: String, ty: Type },
    /// Read of a pseudo-register slot at a compile-time index.
    RegisterRead { register: Register, index: u32 },
    Arith {
        op: ArithOp,
        left: Box<Val>,
        right: Box<Val>,
    },
    Concat(Box<Val>, Box<Val>),
    /// Array element read, e.g. `${tmpInts[0]}`.
    Index {
        name: String,
        index: Box<Val>,
        ty: Type,
    },
    /// Object member read, e.g. `${point[x]}`.
    Member {
        object: String,
        property: String,
        ty: Type,
    },
}

/// The comparison/boolean family: bash has no boolean expression syntax
/// outside a conditional test, so these only appear as `if`/`while` heads
/// (value uses get reified through `tmpBool` during lowering).
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    Compare {
        op: CompareOp,
        operand_ty: Type,
        left: Val,
        right: Val,
    },
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
    /// A bool-typed value tested against the literal string "true".
    Truthy(Val),
}

/// Singly-linked alternative chain of an `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate {
    ElseIf {
        cond: Cond,
        body: Vec<Stmt>,
        alternate: Option<Box<Alternate>>,
    },
    Else(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Comment(String),
    Assign {
        name: String,
        value: Val,
    },
    MemberAssign {
        object: String,
        property: String,
        value: Val,
    },
    /// `declare -A name` plus one assignment per literal property.
    ObjectDecl {
        name: String,
        properties: Vec<(String, Val)>,
    },
    If {
        cond: Cond,
        then_body: Vec<Stmt>,
        alternate: Option<Box<Alternate>>,
    },
    While {
        cond: Cond,
        body: Vec<Stmt>,
    },
    /// Shell function declaration with a signature doc comment line.
    Function {
        name: String,
        doc: String,
        params: Vec<(String, Type)>,
        body: Vec<Stmt>,
    },
    Call {
        name: String,
        args: Vec<Val>,
    },
    /// Write a value into a pseudo-register at the runtime counter and
    /// advance the counter.
    RegisterWrite {
        register: Register,
        value: Val,
    },
    Return,
    Break,
    Continue,
    /// Literal script line, used by native function bodies.
    Raw(String),
}

/// A lowered program: native builtin implementations (unique per builtin)
/// followed by the translated user script.
#[derive(Debug, Default, PartialEq)]
pub struct Program {
    pub native_body: Vec<Stmt>,
    pub user_body: Vec<Stmt>,
    pub registers: RegisterUsage,
}
