use crate::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Expr = Spanned<ExprKind>;
pub type Stmt = Spanned<StmtKind>;

#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Logical type of a tysh value. Arrays exist only for the reserved
/// pseudo-register arrays pre-declared in the root scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int,
    Str,
    Object,
    Void,
    Array(Box<Type>),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Str => write!(f, "str"),
            Type::Object => write!(f, "object"),
            Type::Void => write!(f, "void"),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::NotEq
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: Spanned<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i64),
    StrLiteral(String),
    BoolLiteral(bool),
    ObjectLiteral(Vec<Property>),
    Ident(String),
    Binary {
        op: BinOp,
        /// Span of the operator token itself, for operator-level errors.
        op_span: Span,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Spanned<String>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: Spanned<String>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
}

impl ExprKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::IntLiteral(_) => "IntLiteral",
            ExprKind::StrLiteral(_) => "StrLiteral",
            ExprKind::BoolLiteral(_) => "BoolLiteral",
            ExprKind::ObjectLiteral(_) => "ObjectLiteral",
            ExprKind::Ident(_) => "Identifier",
            ExprKind::Binary { .. } => "BinaryExpr",
            ExprKind::Call { .. } => "CallExpr",
            ExprKind::Member { .. } => "MemberExpr",
            ExprKind::Index { .. } => "IndexExpr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    Var(Spanned<String>),
    Member {
        object: Spanned<String>,
        property: Spanned<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Comment(String),
    VarDecl {
        is_const: bool,
        ty: Type,
        name: Spanned<String>,
        value: Expr,
    },
    Assign {
        target: LValue,
        value: Expr,
    },
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_ifs: Vec<ElseIf>,
        else_body: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    FuncDecl {
        name: Spanned<String>,
        params: Vec<Param>,
        ret: Type,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    ExprStmt(Expr),
}

impl StmtKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            StmtKind::Comment(_) => "Comment",
            StmtKind::VarDecl { .. } => "VarDecl",
            StmtKind::Assign { .. } => "AssignExpr",
            StmtKind::If { .. } => "IfStmt",
            StmtKind::While { .. } => "WhileStmt",
            StmtKind::FuncDecl { .. } => "FunctionDecl",
            StmtKind::Break => "BreakExpr",
            StmtKind::Continue => "ContinueExpr",
            StmtKind::Return(_) => "ReturnExpr",
            StmtKind::ExprStmt(_) => "ExprStmt",
        }
    }
}
