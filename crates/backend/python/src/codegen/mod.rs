//! Resolved AST to Python code generation.
//!
//! Calling conventions of the generated code:
//!
//! - call site: `nargout=N` is passed if and only if N > 1
//! - declaration: every function is wrapped in `@function`, which accepts
//!   `nargout` and slices multi-value results
//! - return: `return x` or `return a,b,c`; slicing is the caller's job

mod assign;
mod expr;
mod func;
mod names;
mod stmt;
mod structs;

use crate::Options;
use rhizome_pyrite_ast::{validate, Decl, Program, ValidationError};
use thiserror::Error;
use tracing::debug;

use names::Sanitizer;
use structs::StructSet;

/// One level of Python indentation.
const INDENT: &str = "    ";

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid operand count for {construct}: expected {expected}, got {got}")]
    InvalidArgCount {
        construct: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("malformed {0}")]
    Malformed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Compile-wide code generator.
///
/// Owns the options and the identifier rename memo. Each top-level
/// declaration is emitted with its own struct tracking state.
#[derive(Debug)]
pub struct Backend {
    options: Options,
    names: Sanitizer,
}

impl Backend {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            names: Sanitizer::default(),
        }
    }

    /// Validate `program` and emit one block of Python per declaration.
    pub fn compile_program(&mut self, program: &Program) -> Result<Vec<String>, CompileError> {
        validate(program)?;
        program
            .decls
            .iter()
            .map(|decl| self.compile_decl(decl))
            .collect()
    }

    /// Emit one top-level declaration.
    ///
    /// Does not validate; malformed nodes surface as [`CompileError`]
    /// when the generator reaches them.
    pub fn compile_decl(&mut self, decl: &Decl) -> Result<String, CompileError> {
        let mut emitter = Emitter::new(&self.options, &mut self.names);
        match decl {
            Decl::Function(function) => {
                debug!(function = %function.name.name, "emitting function");
                emitter.function(function, 0)
            }
            Decl::Script(body) => {
                debug!(statements = body.len(), "emitting script");
                emitter.script(body)
            }
        }
    }
}

/// Compile a program to a single Python module.
pub fn compile(program: &Program, options: Options) -> Result<String, CompileError> {
    let blocks = Backend::new(options).compile_program(program)?;
    let mut module = blocks.join("\n\n");
    module.push('\n');
    Ok(module)
}

/// Generation state for one top-level declaration.
pub(crate) struct Emitter<'a> {
    options: &'a Options,
    names: &'a mut Sanitizer,
    structs: StructSet,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a Options, names: &'a mut Sanitizer) -> Self {
        Self {
            options,
            names,
            structs: StructSet::default(),
        }
    }
}

pub(crate) fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// Quote `s` as a single-quoted Python string.
pub(crate) fn py_string_literal(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("'{}'", escaped)
}
