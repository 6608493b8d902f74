//! Source-to-executable front end: parse, check, package.

use worms_ast::diagnostic::Diagnostic;
use worms_checker::TypedProgram;

/// Why a source text could not be turned into a runnable program.
#[derive(Debug, Clone)]
pub enum CompileError {
    /// Lexing or parsing stopped at the first error.
    Parse(Diagnostic),
    /// The checker ran to completion and found these.
    Type(Vec<Diagnostic>),
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Parse(d) => std::slice::from_ref(d),
            CompileError::Type(ds) => ds,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(d) => write!(f, "{}", d),
            CompileError::Type(ds) => {
                for (i, d) in ds.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", d)?;
                }
                Ok(())
            }
        }
    }
}

pub fn compile(source: &str) -> Result<TypedProgram, CompileError> {
    let program = worms_parser::parse(source).map_err(CompileError::Parse)?;
    worms_checker::check_into(program).map_err(CompileError::Type)
}
