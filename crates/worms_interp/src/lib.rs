//! Resumable tree-walking interpreter for worm control programs.
//!
//! A program runs inside an [`ExecutionContext`] against a host that
//! implements the [`World`] trait. Execution is cooperative: each call
//! to [`ExecutionContext::resume`] grants a budget of action points and
//! runs until the program finishes, crashes, or has to give the turn
//! back. An action the worm cannot afford suspends the program *before*
//! the action; the next resume retries that same action with the new
//! budget added to whatever was left over.
//!
//! The context suspends only at statement boundaries. Expressions are
//! pure apart from `random`, so they always run to completion within
//! one resume.

pub mod arena;
mod context;
mod eval;
mod exec;
mod fault;
pub mod pipeline;
pub mod value;
pub mod world;

pub use context::{ExecutionContext, Status};
pub use exec::Outcome;
pub use fault::Fault;
pub use pipeline::{compile, CompileError};
pub use value::Value;
pub use world::{ActionCall, ActionOutcome, EntityRef, World};
