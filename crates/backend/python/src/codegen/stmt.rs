//! Statements and blocks.

use super::{indent, CompileError, Emitter};
use rhizome_pyrite_ast::{Else, Expr, If, Stmt};

impl Emitter<'_> {
    /// Translate one statement, indented to `level`.
    ///
    /// Multi-line output keeps every line at `level` or deeper.
    pub(crate) fn stmt(&mut self, stmt: &Stmt, level: usize) -> Result<String, CompileError> {
        let pad = indent(level);
        match stmt {
            Stmt::Expr(expr) => Ok(format!("{}{}", pad, self.expr(expr)?)),
            Stmt::Assign(assign) => Ok(format!("{}{}", pad, self.assign(assign, level)?)),
            Stmt::If(stmt) => self.if_stmt(stmt, level),
            Stmt::While { cond, body } => Ok(format!(
                "{}while {}:{}",
                pad,
                self.expr(cond)?,
                self.block(body, level + 1)?
            )),
            Stmt::For { var, iter, body } => {
                let var = self.ident(var)?;
                let mut columns = self.expr(iter)?;
                if !is_atomic(iter) {
                    columns = format!("({})", columns);
                }
                // Columns, not elements
                Ok(format!(
                    "{}for {} in {}.T:{}",
                    pad,
                    var,
                    columns,
                    self.block(body, level + 1)?
                ))
            }
            Stmt::Try { body, finally } => Ok(format!(
                "{pad}try:{}\n{pad}finally:{}",
                self.block(body, level + 1)?,
                self.block(finally, level + 1)?
            )),
            Stmt::Break => Ok(format!("{}break", pad)),
            Stmt::Continue => Ok(format!("{}continue", pad)),
            Stmt::Pass => Ok(format!("{}pass", pad)),
            Stmt::Null => Ok(String::new()),
            Stmt::Comment(text) => Ok(comment(text, &pad)),
            Stmt::Return(None) => Ok(format!("{}return", pad)),
            Stmt::Return(Some(value)) => Ok(format!("{}return {}", pad, self.expr(value)?)),
            Stmt::Global(names) | Stmt::Persistent(names) => {
                Ok(format!("{}global {}", pad, self.idents(names)?))
            }
        }
    }

    /// Translate a statement sequence as an indented suite.
    ///
    /// Each statement starts on a new line. A suite with no executable
    /// statement gets a `pass` so the result always parses.
    pub(crate) fn block(&mut self, body: &[Stmt], level: usize) -> Result<String, CompileError> {
        let mut code = String::new();
        for stmt in body {
            code.push('\n');
            code.push_str(&self.stmt(stmt, level)?);
        }
        if body.iter().all(Stmt::is_inert) {
            code.push('\n');
            code.push_str(&indent(level));
            code.push_str("pass");
        }
        Ok(code)
    }

    /// Script-level statements at column zero.
    pub(crate) fn script(&mut self, body: &[Stmt]) -> Result<String, CompileError> {
        let code = self.block(body, 0)?;
        Ok(code.strip_prefix('\n').unwrap_or(&code).to_string())
    }

    /// `elseif` has no direct spelling here; each one becomes an `else:`
    /// holding a nested `if` one level deeper.
    fn if_stmt(&mut self, stmt: &If, level: usize) -> Result<String, CompileError> {
        let pad = indent(level);
        let mut code = format!(
            "{}if {}:{}",
            pad,
            self.expr(&stmt.cond)?,
            self.block(&stmt.then_body, level + 1)?
        );
        match &stmt.else_body {
            None => {}
            Some(Else::Block(body)) if body.is_empty() => {}
            Some(Else::Block(body)) => {
                code.push_str(&format!("\n{}else:{}", pad, self.block(body, level + 1)?));
            }
            Some(Else::ElseIf(nested)) => {
                code.push_str(&format!("\n{}else:\n{}", pad, self.if_stmt(nested, level + 1)?));
            }
        }
        Ok(code)
    }
}

/// Whether `expr` can take a `.T` suffix without parentheses.
fn is_atomic(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ident(_)
            | Expr::Index { .. }
            | Expr::CellIndex { .. }
            | Expr::Call { .. }
            | Expr::Builtin { .. }
            | Expr::Member { .. }
            | Expr::Arange(_)
            | Expr::Matrix(_)
            | Expr::CellArray(_)
            | Expr::Parens(_)
            | Expr::Transpose(_)
    )
}

/// `%` comments become `#` comments; blank ones become blank lines.
fn comment(text: &str, pad: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let body = text.trim_start_matches('%');
    let marks = text.len() - body.len();
    format!("{}{}{}", pad, "#".repeat(marks), body)
}
