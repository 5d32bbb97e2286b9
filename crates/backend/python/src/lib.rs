//! Python backend for Pyrite.
//!
//! Turns a resolved [`Program`](rhizome_pyrite_ast::Program) into Python
//! source that runs against a small array runtime (`matlabarray`, `copy`,
//! `check_struct` and friends). The runtime itself lives outside this
//! crate; the generated text only assumes its names.

mod codegen;
mod options;

pub use codegen::{compile, Backend, CompileError};
pub use options::{Options, OptionsError};

#[cfg(test)]
mod tests;
