//! Resolved AST for Pyrite.
//!
//! This crate defines the tree handed from the resolution stage to the
//! Python backend. Parsing and symbol resolution happen elsewhere; by the
//! time a [`Program`] reaches this crate every identifier already carries
//! its symbol id and [`Property`], and every call knows how many values
//! it is expected to produce.
//!
//! The tree is plain data and round-trips through serde, so a resolver
//! written in any language can hand it over as JSON:
//!
//! ```json
//! {"decls": [{"script": [
//!   {"assign": {"target": {"ident": {"name": "x", "symbol": 0}},
//!               "value": {"number": 1},
//!               "line": 1}}
//! ]}]}
//! ```

mod expr;
mod stmt;
mod validation;

pub use expr::*;
pub use stmt::*;
pub use validation::{validate, ValidationError};

use serde::{Deserialize, Serialize};

/// Parameter name marking a variadic function.
pub const VARARGIN: &str = "varargin";

/// A complete translation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level declarations, in source order.
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }
}

/// A top-level declaration. Each one becomes one block of output text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    /// A function definition.
    Function(Function),
    /// Script-level statements outside any function.
    Script(Vec<Stmt>),
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: Ident,
    /// Parameters. The last one may be [`VARARGIN`].
    #[serde(default)]
    pub params: Vec<Ident>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl Function {
    pub fn new(name: Ident, params: Vec<Ident>, body: Vec<Stmt>) -> Self {
        Self { name, params, body }
    }

    /// Whether the last parameter is the variadic marker.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.name == VARARGIN)
    }
}

/// Identity of a resolved symbol.
///
/// Every occurrence of one source variable shares the same id, so
/// decisions keyed on it (like renaming) apply to all occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Resolution property assigned to an identifier by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Scalar or unknown plain value.
    #[default]
    Plain,
    /// Known matrix/array value.
    Array,
    /// Variable used as a struct.
    StructMember,
    /// Written before ever being read, shape unknown at the write.
    WriteOnce,
    /// Indexable object that is not a native array (e.g. a function
    /// result or foreign object), indexed through the runtime helper.
    Opaque,
}

impl Property {
    /// Whether values with this property support native bracket indexing.
    pub fn is_native_indexable(self) -> bool {
        !matches!(self, Property::Opaque)
    }
}

/// A resolved identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub symbol: SymbolId,
    #[serde(default)]
    pub property: Property,
    /// The resolver saw a prior definition of this name in scope.
    #[serde(default)]
    pub declared: bool,
    /// Initializer, for keyword-argument style `name=value` forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<Expr>>,
}

impl Ident {
    pub fn new(name: impl Into<String>, symbol: u32) -> Self {
        Self {
            name: name.into(),
            symbol: SymbolId(symbol),
            property: Property::Plain,
            declared: false,
            init: None,
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self
    }

    /// Marks the identifier as already defined in scope.
    pub fn declared(mut self) -> Self {
        self.declared = true;
        self
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(Box::new(init));
        self
    }
}
