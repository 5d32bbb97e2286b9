//! Structural validation of resolved programs.

use crate::{Decl, Else, Expr, Function, If, Program, Stmt, VARARGIN};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid operand count for {construct}: expected {expected}, got {got}")]
    InvalidArgCount {
        construct: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("field of member access must be a name or parenthesized expression")]
    InvalidField,

    #[error("function name must not be empty")]
    EmptyFunctionName,

    #[error("'varargin' must be the last parameter of '{function}'")]
    MisplacedVarargin { function: String },
}

/// Validate a program for structural correctness.
///
/// This only checks node shapes the backend relies on:
/// - Ranges have 0, 2 or 3 operands; value ranges have 2 or 3
/// - Member fields are names or parenthesized expressions
/// - Functions are named and `varargin` only appears last
///
/// It does not check that names are defined or that types line up.
/// That is the resolver's job.
pub fn validate(program: &Program) -> Result<(), ValidationError> {
    for decl in &program.decls {
        match decl {
            Decl::Function(function) => validate_function(function)?,
            Decl::Script(body) => validate_block(body)?,
        }
    }
    Ok(())
}

fn validate_function(function: &Function) -> Result<(), ValidationError> {
    if function.name.name.is_empty() {
        return Err(ValidationError::EmptyFunctionName);
    }
    let last = function.params.len().saturating_sub(1);
    if function
        .params
        .iter()
        .enumerate()
        .any(|(i, p)| p.name == VARARGIN && i != last)
    {
        return Err(ValidationError::MisplacedVarargin {
            function: function.name.name.clone(),
        });
    }
    validate_block(&function.body)
}

fn validate_block(body: &[Stmt]) -> Result<(), ValidationError> {
    body.iter().try_for_each(validate_stmt)
}

fn validate_stmt(stmt: &Stmt) -> Result<(), ValidationError> {
    match stmt {
        Stmt::Expr(expr) => validate_expr(expr),
        Stmt::Assign(assign) => {
            validate_expr(&assign.target)?;
            validate_expr(&assign.value)
        }
        Stmt::If(if_stmt) => validate_if(if_stmt),
        Stmt::While { cond, body } => {
            validate_expr(cond)?;
            validate_block(body)
        }
        Stmt::For { iter, body, .. } => {
            validate_expr(iter)?;
            validate_block(body)
        }
        Stmt::Try { body, finally } => {
            validate_block(body)?;
            validate_block(finally)
        }
        Stmt::Return(Some(value)) => validate_expr(value),
        Stmt::Return(None)
        | Stmt::Break
        | Stmt::Continue
        | Stmt::Pass
        | Stmt::Null
        | Stmt::Comment(_)
        | Stmt::Global(_)
        | Stmt::Persistent(_) => Ok(()),
    }
}

fn validate_if(if_stmt: &If) -> Result<(), ValidationError> {
    validate_expr(&if_stmt.cond)?;
    validate_block(&if_stmt.then_body)?;
    match &if_stmt.else_body {
        Some(Else::ElseIf(next)) => validate_if(next),
        Some(Else::Block(body)) => validate_block(body),
        None => Ok(()),
    }
}

fn validate_expr(expr: &Expr) -> Result<(), ValidationError> {
    match expr {
        Expr::Number(_) | Expr::String(_) | Expr::Logical(_) | Expr::End => Ok(()),
        Expr::Ident(ident) => match &ident.init {
            Some(init) => validate_expr(init),
            None => Ok(()),
        },
        Expr::Binary { lhs, rhs, .. } => {
            validate_expr(lhs)?;
            validate_expr(rhs)
        }
        Expr::Unary { operand, .. } => validate_expr(operand),
        Expr::Range(args) => {
            if !matches!(args.len(), 0 | 2 | 3) {
                return Err(ValidationError::InvalidArgCount {
                    construct: "range",
                    expected: "0, 2 or 3",
                    got: args.len(),
                });
            }
            validate_all(args)
        }
        Expr::Arange(args) => {
            if !matches!(args.len(), 2 | 3) {
                return Err(ValidationError::InvalidArgCount {
                    construct: "value range",
                    expected: "2 or 3",
                    got: args.len(),
                });
            }
            validate_all(args)
        }
        Expr::Member { object, field } => {
            match field.as_ref() {
                Expr::Ident(_) => {}
                Expr::Parens(inner) => validate_expr(inner)?,
                _ => return Err(ValidationError::InvalidField),
            }
            validate_expr(object)
        }
        Expr::Parens(inner) | Expr::Transpose(inner) | Expr::Handle(inner) => validate_expr(inner),
        Expr::Index { base, args } | Expr::CellIndex { base, args } => {
            validate_expr(base)?;
            validate_all(args)
        }
        Expr::Call { callee, args, .. } => {
            validate_expr(callee)?;
            validate_all(args)
        }
        Expr::Builtin { args, .. } | Expr::List(args) => validate_all(args),
        Expr::Matrix(rows) | Expr::CellArray(rows) => rows.iter().try_for_each(|r| validate_all(r)),
        Expr::Lambda { body, .. } => validate_expr(body),
    }
}

fn validate_all(exprs: &[Expr]) -> Result<(), ValidationError> {
    exprs.iter().try_for_each(validate_expr)
}
