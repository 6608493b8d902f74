//! Static type checker for worm control programs.
//!
//! Every variable is one of three types: double, bool, or entity. A
//! variable's type is inferred from its first assignment in source
//! order and is fixed from then on. The checker accumulates all
//! diagnostics it can find rather than stopping at the first.

pub mod builtins;
mod check;
pub mod ty;

use std::collections::HashMap;

use worms_ast::ast::Program;
use worms_ast::diagnostic::Diagnostic;

use check::Checker;
use ty::Ty;

/// Everything the checker learned about a program.
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Inferred type of every global, keyed by name.
    pub globals: HashMap<String, Ty>,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A program that passed the checker, ready for execution.
pub struct TypedProgram {
    pub program: Program,
    pub globals: HashMap<String, Ty>,
}

pub fn check(program: &Program) -> CheckResult {
    let mut checker = Checker::new(program);
    checker.check_program();
    CheckResult {
        diagnostics: checker.diagnostics,
        globals: checker.globals,
    }
}

/// Checks and, on success, pairs the program with its global type table.
pub fn check_into(program: Program) -> Result<TypedProgram, Vec<Diagnostic>> {
    let result = check(&program);
    if result.is_ok() {
        Ok(TypedProgram {
            program,
            globals: result.globals,
        })
    } else {
        Err(result.diagnostics)
    }
}
