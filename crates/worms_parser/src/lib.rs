mod expr;
mod parser;
mod stmt;

use worms_ast::ast::Program;
use worms_ast::diagnostic::Diagnostic;

use parser::Parser;

/// Parse a worm control program.
///
/// There is no error recovery: the first deviation from the grammar (or
/// the first invalid token) aborts the parse of the whole program.
pub fn parse(source: &str) -> Result<Program, Diagnostic> {
    Parser::new(source).parse()
}
