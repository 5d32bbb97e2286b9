//! Assignment lowering.
//!
//! The source language copies composite values on assignment and grows
//! arrays on first indexed write; Python aliases and raises. Each
//! assignment is matched against [`StoreRule::ORDER`] and the first rule
//! whose guard holds decides the emitted store.

use super::{indent, CompileError, Emitter};
use rhizome_pyrite_ast::{Assign, Expr, Property};
use tracing::trace;

/// Store strategies, highest priority first in [`StoreRule::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreRule {
    /// `s.(name) = v` → `setattr(s,name,v)`
    DynamicField,
    /// `s.f = v` → `s.f = copy(v)`
    StaticField,
    /// `a = b` → `a = copy(b)`
    CopyIdent,
    /// `x = v` with `x` write-once → `x = matlabarray(v)`
    WrapMatrix,
    /// `x(i) = v` with `x` undeclared → create `x` on demand, then store
    GrowOnWrite,
    /// `x(i) = []` → `x = x.delete(i)`
    DeleteElement,
    /// `t = v`
    Plain,
}

/// A rule matched against a concrete assignment, with the parts its
/// output is built from.
#[derive(Debug)]
enum Store<'a> {
    DynamicField { object: &'a Expr, name: &'a Expr },
    StaticField,
    CopyIdent,
    WrapMatrix,
    GrowOnWrite { base: &'a Expr, args: &'a [Expr] },
    DeleteElement { base: &'a Expr, args: &'a [Expr] },
    Plain,
}

impl StoreRule {
    pub(crate) const ORDER: [StoreRule; 7] = [
        StoreRule::DynamicField,
        StoreRule::StaticField,
        StoreRule::CopyIdent,
        StoreRule::WrapMatrix,
        StoreRule::GrowOnWrite,
        StoreRule::DeleteElement,
        StoreRule::Plain,
    ];

    /// Match this rule against `target = value`, or `None` if the
    /// assignment does not have the shape the rule needs.
    fn attempt<'a>(self, target: &'a Expr, value: &'a Expr) -> Option<Store<'a>> {
        match (self, target) {
            (StoreRule::DynamicField, Expr::Member { object, field }) => match field.as_ref() {
                Expr::Parens(name) => Some(Store::DynamicField { object, name }),
                _ => None,
            },
            (StoreRule::StaticField, Expr::Member { field, .. }) => {
                matches!(**field, Expr::Ident(_)).then_some(Store::StaticField)
            }
            (StoreRule::CopyIdent, Expr::Ident(_)) => {
                matches!(value, Expr::Ident(_)).then_some(Store::CopyIdent)
            }
            (StoreRule::WrapMatrix, Expr::Ident(ident)) => {
                (ident.property == Property::WriteOnce).then_some(Store::WrapMatrix)
            }
            (StoreRule::GrowOnWrite, Expr::Index { base, args }) => base
                .as_ident()
                .is_some_and(|ident| !ident.declared)
                .then_some(Store::GrowOnWrite { base, args }),
            (StoreRule::DeleteElement, Expr::Index { base, args }) => value
                .is_empty_matrix()
                .then_some(Store::DeleteElement { base, args }),
            (StoreRule::Plain, _) => Some(Store::Plain),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn select(target: &Expr, value: &Expr) -> StoreRule {
        plan(target, value).0
    }

    /// Whether stores under this rule mark their member bases as structs.
    fn tracks_structs(self) -> bool {
        matches!(
            self,
            StoreRule::DynamicField | StoreRule::StaticField | StoreRule::Plain
        )
    }
}

/// First rule in priority order that matches `target = value`, with its
/// store plan.
fn plan<'a>(target: &'a Expr, value: &'a Expr) -> (StoreRule, Store<'a>) {
    StoreRule::ORDER
        .into_iter()
        .find_map(|rule| rule.attempt(target, value).map(|store| (rule, store)))
        .unwrap_or((StoreRule::Plain, Store::Plain))
}

impl Emitter<'_> {
    pub(crate) fn assign(&mut self, assign: &Assign, level: usize) -> Result<String, CompileError> {
        let Assign {
            target,
            value,
            line,
        } = assign;
        let (rule, store) = plan(target, value);
        trace!(?rule, line = *line, "lowering assignment");

        let pad = indent(level);
        let store = match store {
            Store::DynamicField { object, name } => format!(
                "setattr({},{},{})",
                self.expr(object)?,
                self.expr(name)?,
                self.expr(value)?
            ),
            Store::StaticField | Store::CopyIdent => {
                format!("{} = copy({})", self.expr(target)?, self.expr(value)?)
            }
            Store::WrapMatrix => {
                format!("{} = matlabarray({})", self.expr(target)?, self.expr(value)?)
            }
            Store::GrowOnWrite { base, args } => {
                let name = self.expr(base)?;
                let key = self.exprs(args)?;
                format!(
                    "try: {name}\n{pad}except NameError: {name} = matlabarray()\n{pad}{name}[{key}] = {}",
                    self.expr(value)?
                )
            }
            Store::DeleteElement { base, args } => {
                let name = self.expr(base)?;
                format!("{name} = {name}.delete({})", self.exprs(args)?)
            }
            Store::Plain => format!("{} = {}", self.expr(target)?, self.expr(value)?),
        };

        let mut fresh = Vec::new();
        if rule.tracks_structs() {
            self.track_structs(target, &mut fresh)?;
        }

        let mut code = String::new();
        for base in &fresh {
            code.push_str(&format!("{base} = check_struct({base})\n{pad}"));
        }
        code.push_str(&store);
        if self.options.line_numbers {
            code.push_str(&format!("\n{pad}# {}:{}", self.options.filename, line));
        }
        Ok(code)
    }

    /// Record the bases of member targets, collecting those seen for the
    /// first time in this declaration.
    fn track_structs(&mut self, target: &Expr, fresh: &mut Vec<String>) -> Result<(), CompileError> {
        match target {
            Expr::Member { object, .. } => {
                let base = self.expr(object)?;
                if self.structs.insert(&base) {
                    fresh.push(base);
                }
            }
            Expr::List(targets) => {
                for target in targets {
                    self.track_structs(target, fresh)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
