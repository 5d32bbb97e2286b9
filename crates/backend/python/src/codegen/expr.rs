//! Expression translation.

use super::{py_string_literal, CompileError, Emitter};
use rhizome_pyrite_ast::{BinaryOp, Expr, Ident, UnaryOp};

/// How a binary operator is spelled in Python.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpForm {
    /// `lhs op rhs`
    Infix(&'static str),
    /// `(lhs op rhs)`
    Grouped(&'static str),
    /// `helper(lhs,rhs)`
    Helper(&'static str),
}

/// Operator table.
///
/// Elementwise arithmetic maps onto the plain operator since matlabarray
/// overloads it elementwise. Elementwise logic has no native spelling and
/// goes through runtime helpers.
fn operator(op: BinaryOp) -> OpForm {
    match op {
        BinaryOp::Add => OpForm::Grouped("+"),
        BinaryOp::Sub => OpForm::Grouped("-"),
        BinaryOp::Mul | BinaryOp::ElemMul => OpForm::Infix("*"),
        BinaryOp::Div | BinaryOp::ElemDiv => OpForm::Infix("/"),
        BinaryOp::Pow | BinaryOp::ElemPow => OpForm::Infix("**"),
        BinaryOp::LeftDiv => OpForm::Helper("linsolve"),
        BinaryOp::Eq => OpForm::Infix("=="),
        BinaryOp::Ne => OpForm::Infix("!="),
        BinaryOp::Lt => OpForm::Infix("<"),
        BinaryOp::Le => OpForm::Infix("<="),
        BinaryOp::Gt => OpForm::Infix(">"),
        BinaryOp::Ge => OpForm::Infix(">="),
        BinaryOp::ElemAnd => OpForm::Helper("logical_and"),
        BinaryOp::ElemOr => OpForm::Helper("logical_or"),
        BinaryOp::AndAlso => OpForm::Infix("and"),
        BinaryOp::OrElse => OpForm::Infix("or"),
    }
}

/// Whether the translation of `expr` is a bare operator application.
///
/// Python chains comparisons and groups `**` to the right, so such text is
/// parenthesized wherever it becomes an operand.
fn is_loose(expr: &Expr) -> bool {
    match expr {
        Expr::Binary { op, .. } => matches!(operator(*op), OpForm::Infix(_)),
        Expr::Unary { op, .. } => !matches!(op, UnaryOp::ElemNot),
        Expr::Lambda { .. } => true,
        _ => false,
    }
}

impl Emitter<'_> {
    /// Translate an expression to Python text.
    pub(crate) fn expr(&mut self, expr: &Expr) -> Result<String, CompileError> {
        match expr {
            Expr::Number(n) => Ok(n.to_string()),
            Expr::String(s) => Ok(py_string_literal(s)),
            Expr::Logical(b) => Ok(String::from(if *b { "true" } else { "false" })),
            Expr::Ident(ident) => self.ident(ident),
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            Expr::Unary { op, operand } => {
                let operand = self.operand(operand)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{}", operand),
                    UnaryOp::Plus => format!("+{}", operand),
                    UnaryOp::Not => format!("not {}", operand),
                    UnaryOp::ElemNot => format!("logical_not({})", operand),
                })
            }
            Expr::Range(args) => self.range(args),
            Expr::Arange(args) => {
                if !matches!(args.len(), 2 | 3) {
                    return Err(CompileError::InvalidArgCount {
                        construct: "value range",
                        expected: "2 or 3",
                        got: args.len(),
                    });
                }
                // arange takes operands in source order, step in the middle
                Ok(format!("arange({})", self.exprs(args)?))
            }
            Expr::End => Ok("end()".to_string()),
            Expr::Member { object, field } => self.member(object, field),
            Expr::Parens(inner) => Ok(format!("({})", self.expr(inner)?)),
            Expr::Transpose(inner) => Ok(format!("{}.T", self.expr(inner)?)),
            Expr::Index { base, args } => self.index(base, args),
            Expr::CellIndex { base, args } => {
                Ok(format!("{}[{}]", self.expr(base)?, self.exprs(args)?))
            }
            Expr::Call {
                callee,
                args,
                nargout,
            } => self.call(callee, args, *nargout),
            Expr::Builtin { name, args } => Ok(format!("{}({})", name, self.exprs(args)?)),
            Expr::Matrix(rows) => self.matrix(rows),
            Expr::CellArray(rows) => Ok(format!("cellarray([{}])", self.rows(rows)?)),
            Expr::Lambda { params, body } => {
                let params = self.idents(params)?;
                Ok(format!("lambda {}: {}", params, self.expr(body)?))
            }
            Expr::Handle(inner) => self.expr(inner),
            Expr::List(items) => self.exprs(items),
        }
    }

    /// Comma-joined translations.
    pub(crate) fn exprs(&mut self, exprs: &[Expr]) -> Result<String, CompileError> {
        let compiled: Result<Vec<_>, _> = exprs.iter().map(|e| self.expr(e)).collect();
        Ok(compiled?.join(","))
    }

    pub(crate) fn idents(&mut self, idents: &[Ident]) -> Result<String, CompileError> {
        let compiled: Result<Vec<_>, _> = idents.iter().map(|i| self.ident(i)).collect();
        Ok(compiled?.join(","))
    }

    pub(crate) fn ident(&mut self, ident: &Ident) -> Result<String, CompileError> {
        let name = self.names.name(ident).to_owned();
        match &ident.init {
            Some(init) => Ok(format!("{}={}", name, self.expr(init)?)),
            None => Ok(name),
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<String, CompileError> {
        if let (BinaryOp::Add, Expr::Number(a), Expr::Number(b)) = (op, lhs, rhs) {
            return Ok(a.add(*b).to_string());
        }
        Ok(match operator(op) {
            OpForm::Infix(text) => {
                format!("{} {} {}", self.operand(lhs)?, text, self.operand(rhs)?)
            }
            OpForm::Grouped(text) => format!("({}{}{})", self.expr(lhs)?, text, self.expr(rhs)?),
            OpForm::Helper(name) => {
                format!("{}({},{})", name, self.expr(lhs)?, self.expr(rhs)?)
            }
        })
    }

    /// Translate an operand of an infix or prefix operator, parenthesized
    /// when Python would otherwise regroup or chain it.
    fn operand(&mut self, expr: &Expr) -> Result<String, CompileError> {
        let text = self.expr(expr)?;
        if is_loose(expr) {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    /// Subscript range. Source order is `a:step:b`, Python slices want
    /// `a:b:step`.
    fn range(&mut self, args: &[Expr]) -> Result<String, CompileError> {
        match args {
            [] => Ok(":".to_string()),
            [start, stop] => Ok(format!("{}:{}", self.expr(start)?, self.expr(stop)?)),
            [start, step, stop] => Ok(format!(
                "{}:{}:{}",
                self.expr(start)?,
                self.expr(stop)?,
                self.expr(step)?
            )),
            _ => Err(CompileError::InvalidArgCount {
                construct: "range",
                expected: "0, 2 or 3",
                got: args.len(),
            }),
        }
    }

    fn member(&mut self, object: &Expr, field: &Expr) -> Result<String, CompileError> {
        match field {
            Expr::Ident(name) => {
                let object = self.expr(object)?;
                Ok(format!("{}.{}", object, self.names.name(name)))
            }
            Expr::Parens(name) => Ok(format!(
                "getattr({},{})",
                self.expr(object)?,
                self.expr(name)?
            )),
            _ => Err(CompileError::Malformed(
                "member access: field is neither a name nor a parenthesized expression".into(),
            )),
        }
    }

    /// Bracket indexing for native arrays, `take` for opaque indexables.
    fn index(&mut self, base: &Expr, args: &[Expr]) -> Result<String, CompileError> {
        let native = base
            .base_ident()
            .ok_or_else(|| CompileError::Malformed("indexing: no base identifier".into()))?
            .property
            .is_native_indexable();
        let base = self.expr(base)?;
        let args = self.exprs(args)?;
        if native {
            Ok(format!("{}[{}]", base, args))
        } else {
            Ok(format!("take({},{})", base, args))
        }
    }

    fn matrix(&mut self, rows: &[Vec<Expr>]) -> Result<String, CompileError> {
        if rows.iter().all(Vec::is_empty) {
            return Ok("matlabarray([])".to_string());
        }
        // Concatenating strings builds a longer string
        if rows.iter().flatten().any(|e| matches!(e, Expr::String(_))) {
            let parts: Result<Vec<_>, _> = rows.iter().flatten().map(|e| self.expr(e)).collect();
            return Ok(parts?.join(" + "));
        }
        Ok(format!("matlabarray([{}])", self.rows(rows)?))
    }

    /// One bracketed list per row.
    fn rows(&mut self, rows: &[Vec<Expr>]) -> Result<String, CompileError> {
        let compiled: Result<Vec<_>, _> = rows
            .iter()
            .map(|row| self.exprs(row).map(|r| format!("[{}]", r)))
            .collect();
        Ok(compiled?.join(","))
    }
}
