use std::collections::HashMap;
use std::sync::Arc;

use worms_ast::ast::Stmt;
use worms_checker::TypedProgram;

use crate::fault::Fault;
use crate::value::Value;
use crate::world::EntityRef;

/// Where a context is in its lifecycle. `Finished` and `Crashed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Created but never resumed.
    Ready,
    /// Gave the turn back; waiting for the next resume.
    Suspended,
    Finished,
    Crashed,
}

/// One pending unit of work. Statements are shared `Arc` nodes, so a
/// task on the stack keeps its subtree alive without copying it.
pub(crate) enum Task {
    /// Execute a statement.
    Run(Stmt),
    /// Continue a foreach over a snapshot taken at loop entry.
    Iterate {
        var: String,
        items: Vec<EntityRef>,
        index: usize,
        body: Stmt,
    },
    /// Drop the innermost loop variable binding.
    EndIterate,
    /// Return from a procedure call.
    EndCall,
}

/// The resumable state of one running program: its variables, its task
/// stack, and the action points it still has this turn.
pub struct ExecutionContext {
    pub(crate) program: Arc<TypedProgram>,
    pub(crate) globals: HashMap<String, Value>,
    /// Foreach loop variables, innermost last. Lookup shadows globals.
    pub(crate) bindings: Vec<(String, Value)>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) call_depth: usize,
    pub(crate) points: f64,
    pub(crate) status: Status,
    pub(crate) fault: Option<Fault>,
}

impl ExecutionContext {
    pub fn new(program: Arc<TypedProgram>) -> Self {
        let main = program.program.main.clone();
        Self {
            program,
            globals: HashMap::new(),
            bindings: Vec::new(),
            tasks: vec![Task::Run(main)],
            call_depth: 0,
            points: 0.0,
            status: Status::Ready,
            fault: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Action points left over from earlier turns. Carries across
    /// suspensions and is added to on each resume.
    pub fn points(&self) -> f64 {
        self.points
    }

    /// The fault that crashed the context, if it crashed.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Current value of a global, for hosts that inspect program state.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn program(&self) -> &TypedProgram {
        &self.program
    }

    // ── Variable access ──────────────────────────────────────────

    pub(crate) fn read_var(&self, name: &str) -> Option<Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .or_else(|| self.globals.get(name).copied())
    }

    pub(crate) fn write_var(&mut self, name: &str, value: Value) {
        if let Some((_, slot)) = self.bindings.iter_mut().rev().find(|(n, _)| n == name) {
            *slot = value;
        } else {
            self.globals.insert(name.to_string(), value);
        }
    }
}
