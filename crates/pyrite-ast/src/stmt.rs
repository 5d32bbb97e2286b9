//! Statement nodes.

use crate::{Expr, Ident};
use serde::{Deserialize, Serialize};

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Expression evaluated for its effect.
    Expr(Expr),

    /// Assignment: `target = value`.
    Assign(Assign),

    /// `if`/`elseif`/`else` chain.
    If(If),

    /// `while cond ... end`
    While { cond: Expr, body: Vec<Stmt> },

    /// `for var = iter ... end`
    For {
        var: Ident,
        iter: Expr,
        body: Vec<Stmt>,
    },

    /// `try ... catch ... end`
    Try {
        body: Vec<Stmt>,
        #[serde(default)]
        finally: Vec<Stmt>,
    },

    Break,

    Continue,

    /// Explicit no-op.
    Pass,

    /// Empty statement (a lone `;`).
    Null,

    /// Source comment, including its leading `%` or `#`.
    Comment(String),

    /// `return`, optionally carrying the values the function yields.
    Return(Option<Expr>),

    /// `global a b`
    Global(Vec<Ident>),

    /// `persistent a b`
    Persistent(Vec<Ident>),
}

/// An assignment with its source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub target: Expr,
    pub value: Expr,
    #[serde(default)]
    pub line: u32,
}

/// A conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub cond: Expr,
    #[serde(default)]
    pub then_body: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_body: Option<Else>,
}

/// The alternative of an [`If`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Else {
    /// `elseif cond ...`
    ElseIf(Box<If>),
    /// `else ...`
    Block(Vec<Stmt>),
}

// Builder methods for statements
impl Stmt {
    pub fn expr(e: Expr) -> Self {
        Stmt::Expr(e)
    }

    pub fn assign(target: Expr, value: Expr, line: u32) -> Self {
        Stmt::Assign(Assign {
            target,
            value,
            line,
        })
    }

    pub fn if_stmt(cond: Expr, then_body: Vec<Stmt>, else_body: Option<Else>) -> Self {
        Stmt::If(If {
            cond,
            then_body,
            else_body,
        })
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While { cond, body }
    }

    pub fn for_loop(var: Ident, iter: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For { var, iter, body }
    }

    pub fn try_stmt(body: Vec<Stmt>, finally: Vec<Stmt>) -> Self {
        Stmt::Try { body, finally }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Stmt::Comment(text.into())
    }

    /// Whether this statement produces no executable code.
    pub fn is_inert(&self) -> bool {
        matches!(self, Stmt::Null | Stmt::Comment(_))
    }
}

impl Else {
    pub fn else_if(cond: Expr, then_body: Vec<Stmt>, else_body: Option<Else>) -> Self {
        Else::ElseIf(Box::new(If {
            cond,
            then_body,
            else_body,
        }))
    }
}
