//! Holds a demo arena and the currently loaded program, and drives it
//! one turn at a time. Shared by `worms run` and the REPL.

use std::sync::Arc;

use worms_ast::diagnostic::{Diagnostic, SourceText};
use worms_interp::arena::ArenaWorld;
use worms_interp::{
    compile, ActionCall, CompileError, ExecutionContext, Fault, Outcome, Status, World,
};

pub enum TurnReport {
    NoProgram,
    Suspended {
        lines: Vec<String>,
        actions: Vec<String>,
    },
    Finished {
        lines: Vec<String>,
        actions: Vec<String>,
    },
    Crashed {
        lines: Vec<String>,
        actions: Vec<String>,
        /// The fault rendered against the program source, with the
        /// offending statement underlined when the fault carries a span.
        fault: String,
    },
}

pub struct Runner {
    seed: u64,
    world: ArenaWorld,
    ctx: Option<ExecutionContext>,
    source: Option<String>,
    traced: usize,
}

impl Runner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            world: demo_arena(seed),
            ctx: None,
            source: None,
            traced: 0,
        }
    }

    /// Compile a program and start it in a fresh arena.
    pub fn load(&mut self, source: &str) -> Result<(), String> {
        let typed = compile(source).map_err(|e| render_compile_error(source, &e))?;
        self.world = demo_arena(self.seed);
        self.ctx = Some(ExecutionContext::new(Arc::new(typed)));
        self.source = Some(source.to_string());
        self.traced = 0;
        Ok(())
    }

    /// Restart the current program from the beginning.
    pub fn reset(&mut self) -> Result<(), String> {
        match self.source.clone() {
            Some(source) => self.load(&source),
            None => Err("no program loaded".to_string()),
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn turn(&mut self, budget: f64) -> TurnReport {
        let Some(ctx) = self.ctx.as_mut() else {
            return TurnReport::NoProgram;
        };
        let outcome = ctx.resume(&mut self.world, budget);
        let lines = self.world.take_log();
        let actions: Vec<String> = self.world.trace()[self.traced..]
            .iter()
            .map(|(call, outcome)| format!("{} ({:?})", describe_action(call), outcome))
            .collect();
        self.traced = self.world.trace().len();
        match outcome {
            Outcome::Suspended => TurnReport::Suspended { lines, actions },
            Outcome::Finished => TurnReport::Finished { lines, actions },
            Outcome::Crashed(fault) => {
                let source = self.source.as_deref().unwrap_or("");
                TurnReport::Crashed {
                    lines,
                    actions,
                    fault: render_fault(source, &fault),
                }
            }
        }
    }

    pub fn status(&self) -> Option<Status> {
        self.ctx.as_ref().map(|c| c.status())
    }

    pub fn points(&self) -> Option<f64> {
        self.ctx.as_ref().map(|c| c.points())
    }

    /// One line per live entity, for the REPL's `state` command.
    pub fn describe_state(&self) -> Vec<String> {
        let me = self.world.me();
        let mut lines = Vec::new();
        for entity in self.world.living(worms_ast::ast::EntityClass::Any) {
            let Some(e) = self.world.entity(entity) else {
                continue;
            };
            let marker = if entity == me { " (self)" } else { "" };
            lines.push(format!(
                "#{} {:?} at ({:.1}, {:.1}) dir {:.2} hp {:.0} team {}{}",
                entity.0, e.class, e.x, e.y, e.dir, e.hp, e.team, marker
            ));
        }
        lines
    }
}

fn describe_action(call: &ActionCall) -> String {
    match call.arg {
        Some(arg) => format!("{}({})", call.kind.keyword(), arg),
        None => format!("{}()", call.kind.keyword()),
    }
}

/// A small fixed scene: our worm, an enemy, and some food.
fn demo_arena(seed: u64) -> ArenaWorld {
    let mut world = ArenaWorld::new(seed);
    world.add_worm(0.0, 0.0, 1);
    world.add_worm(12.0, 5.0, 2);
    world.add_food(3.0, 0.0);
    world.add_food(6.0, 2.0);
    world
}

pub fn check_source(source: &str) -> Result<(), String> {
    compile(source)
        .map(|_| ())
        .map_err(|e| render_compile_error(source, &e))
}

fn render_compile_error(source: &str, error: &CompileError) -> String {
    let text = SourceText::new(source);
    error
        .diagnostics()
        .iter()
        .map(|d| text.render(d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locates a runtime fault in the source the same way compile errors
/// are located. Faults without a position render as their bare message.
fn render_fault(source: &str, fault: &Fault) -> String {
    match fault.span() {
        Some(span) => SourceText::new(source).render(&Diagnostic::error(fault.to_string(), span)),
        None => fault.to_string(),
    }
}
