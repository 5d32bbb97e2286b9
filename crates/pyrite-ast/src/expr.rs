//! Expression nodes.

use crate::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expression that produces a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Numeric literal.
    Number(Number),

    /// String literal, already unquoted.
    String(String),

    /// Logical literal.
    Logical(bool),

    /// Resolved identifier.
    Ident(Ident),

    /// Binary operation: `lhs op rhs`.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Unary operation: `op operand`.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Index range inside a subscript: `:`, `a:b` or `a:step:b`.
    Range(Vec<Expr>),

    /// Range used as a value: `a:b` or `a:step:b` outside a subscript.
    Arange(Vec<Expr>),

    /// `end` inside a subscript.
    End,

    /// Field access: `object.field` or `object.(expr)`.
    ///
    /// `field` is an [`Expr::Ident`] for a static name and an
    /// [`Expr::Parens`] for a dynamic one.
    Member { object: Box<Expr>, field: Box<Expr> },

    /// Parenthesized sub-expression.
    Parens(Box<Expr>),

    /// Postfix transpose: `x'`.
    Transpose(Box<Expr>),

    /// Array indexing: `x(i, j)`.
    Index { base: Box<Expr>, args: Vec<Expr> },

    /// Cell indexing: `c{i}`.
    CellIndex { base: Box<Expr>, args: Vec<Expr> },

    /// Function call.
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        /// Requested number of results, when the caller binds more than one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nargout: Option<usize>,
    },

    /// Call of a builtin the resolver marked by name.
    Builtin {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },

    /// Matrix literal, one vector per row: `[1 2; 3 4]`.
    Matrix(Vec<Vec<Expr>>),

    /// Cell array literal, one vector per row: `{a, b}`.
    CellArray(Vec<Vec<Expr>>),

    /// Anonymous function: `@(x) body`.
    Lambda { params: Vec<Ident>, body: Box<Expr> },

    /// Function handle: `@name`.
    Handle(Box<Expr>),

    /// Comma-separated list, e.g. the targets of `[a, b] = f()`.
    List(Vec<Expr>),
}

/// Numeric literal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Sum of two literals. Integer overflow widens to float.
    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    /// Integers print bare, floats always keep a fractional part.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) if x.is_nan() => f.write_str("nan"),
            Number::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Binary operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// `.*`
    ElemMul,
    /// `./`
    ElemDiv,
    /// `.^`
    ElemPow,
    /// `\`
    LeftDiv,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    /// `&`, elementwise
    ElemAnd,
    /// `|`, elementwise
    ElemOr,
    /// `&&`
    AndAlso,
    /// `||`
    OrElse,
}

impl BinaryOp {
    /// Source spelling, used in diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::ElemMul => ".*",
            BinaryOp::ElemDiv => "./",
            BinaryOp::ElemPow => ".^",
            BinaryOp::LeftDiv => "\\",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "~=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::ElemAnd => "&",
            BinaryOp::ElemOr => "|",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
        }
    }
}

/// Unary operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Plus,
    /// `!`
    Not,
    /// `~`, elementwise
    ElemNot,
}

// Builder methods for expressions
impl Expr {
    pub fn int(v: i64) -> Self {
        Expr::Number(Number::Int(v))
    }

    pub fn float(v: f64) -> Self {
        Expr::Number(Number::Float(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Expr::String(v.into())
    }

    pub fn ident(ident: Ident) -> Self {
        Expr::Ident(ident)
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn member(object: Expr, field: Ident) -> Self {
        Expr::Member {
            object: Box::new(object),
            field: Box::new(Expr::Ident(field)),
        }
    }

    /// `object.(field)`
    pub fn dynamic_member(object: Expr, field: Expr) -> Self {
        Expr::Member {
            object: Box::new(object),
            field: Box::new(Expr::parens(field)),
        }
    }

    pub fn parens(inner: Expr) -> Self {
        Expr::Parens(Box::new(inner))
    }

    pub fn transpose(inner: Expr) -> Self {
        Expr::Transpose(Box::new(inner))
    }

    pub fn index(base: Expr, args: Vec<Expr>) -> Self {
        Expr::Index {
            base: Box::new(base),
            args,
        }
    }

    pub fn cell_index(base: Expr, args: Vec<Expr>) -> Self {
        Expr::CellIndex {
            base: Box::new(base),
            args,
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            nargout: None,
        }
    }

    pub fn call_nargout(callee: Expr, args: Vec<Expr>, nargout: usize) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            nargout: Some(nargout),
        }
    }

    /// The empty matrix `[]`.
    pub fn empty_matrix() -> Self {
        Expr::Matrix(Vec::new())
    }

    pub fn lambda(params: Vec<Ident>, body: Expr) -> Self {
        Expr::Lambda {
            params,
            body: Box::new(body),
        }
    }

    /// Whether this is the literal `[]`.
    pub fn is_empty_matrix(&self) -> bool {
        matches!(self, Expr::Matrix(rows) if rows.iter().all(Vec::is_empty))
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// The identifier an indexing or field chain is rooted at, if any.
    pub fn base_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            Expr::Member { object, .. } => object.base_ident(),
            Expr::Index { base, .. } | Expr::CellIndex { base, .. } => base.base_ident(),
            Expr::Parens(inner) | Expr::Transpose(inner) => inner.base_ident(),
            _ => None,
        }
    }
}
