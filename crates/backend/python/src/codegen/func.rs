//! Function declarations and call sites.

use super::{indent, CompileError, Emitter};
use rhizome_pyrite_ast::{Expr, Function, VARARGIN};

/// Builtin that evaluates a string as code in the caller's scope.
const EVAL: &str = "eval";

impl Emitter<'_> {
    /// Emit a decorated `def`.
    ///
    /// The body opens by importing script-level globals, then binds
    /// `nargin` when the function is variadic.
    pub(crate) fn function(&mut self, function: &Function, level: usize) -> Result<String, CompileError> {
        let name = self.ident(&function.name)?;
        let variadic = function.is_variadic();
        let last = function.params.len().saturating_sub(1);

        let mut params = Vec::with_capacity(function.params.len());
        for (i, param) in function.params.iter().enumerate() {
            let param = self.ident(param)?;
            if variadic && i == last {
                params.push(format!("*{}", param));
            } else {
                params.push(param);
            }
        }

        let outer = indent(level);
        let inner = indent(level + 1);
        let mut code = format!(
            "{outer}@function\n{outer}def {}({}):\n{inner}globals().update(load_all_vars())",
            name,
            params.join(",")
        );
        if variadic {
            code.push_str(&format!("\n{inner}nargin = len({})", VARARGIN));
        }
        code.push_str(&self.block(&function.body, level + 1)?);
        Ok(code)
    }

    /// Emit a call honoring the `nargout` convention.
    pub(crate) fn call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        nargout: Option<usize>,
    ) -> Result<String, CompileError> {
        let func = self.expr(callee)?;
        let compiled = self.exprs(args)?;
        if callee.as_ident().is_some_and(|ident| ident.name == EVAL) {
            return Ok(format!("exec_({},globals(),locals())", compiled));
        }
        Ok(match nargout {
            Some(n) if n > 1 && args.is_empty() => format!("{}(nargout={})", func, n),
            Some(n) if n > 1 => format!("{}({},nargout={})", func, compiled, n),
            _ => format!("{}({})", func, compiled),
        })
    }
}
