//! Identifier sanitizing.
//!
//! Source programs may use names that are Python keywords, Python
//! builtins, or helpers of the generated code's runtime. Such names get a
//! trailing underscore. The decision is memoized per symbol and spelling so
//! that every occurrence of a variable is renamed the same way for the whole
//! compile.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use rhizome_pyrite_ast::{Ident, SymbolId};
use tracing::trace;

/// Appended to names that collide with [`RESERVED`].
const MARKER: char = '_';

/// Names user identifiers must not shadow in generated code.
static RESERVED: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Python keywords
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "exec", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "nonlocal", "not", "or", "pass", "print", "raise", "return", "try",
        "while", "with", "yield", "None", "True", "False",
        // Builtins and numeric names the runtime imports
        "Data", "Float", "Int", "Numeric", "Oxphys", "array", "close", "float", "int", "input",
        "open", "range", "type", "write", "len",
        // Runtime helpers referenced by generated code
        "matlabarray", "cellarray", "copy", "take", "arange", "check_struct", "logical_and",
        "logical_or", "logical_not", "linsolve", "load_all_vars", "exec_", "function",
    ]
    .into_iter()
    .collect()
});

/// Whether a name collides with the reserved table.
pub(crate) fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

/// Compile-wide rename memo.
///
/// Keyed by symbol and source spelling: idents sharing a symbol id but not
/// a name (member fields, resolver collisions) keep their own spelling.
#[derive(Debug, Default)]
pub(crate) struct Sanitizer {
    names: HashMap<(SymbolId, String), String>,
}

impl Sanitizer {
    /// Python-safe spelling of `ident`.
    ///
    /// The first lookup of a symbol and name fixes its spelling; later lookups
    /// return the same text even if the node is translated again.
    pub(crate) fn name(&mut self, ident: &Ident) -> &str {
        self.names
            .entry((ident.symbol, ident.name.clone()))
            .or_insert_with(|| {
                if is_reserved(&ident.name) {
                    let renamed = format!("{}{}", ident.name, MARKER);
                    trace!(from = %ident.name, to = %renamed, "renamed reserved identifier");
                    renamed
                } else {
                    ident.name.clone()
                }
            })
            .as_str()
    }
}
