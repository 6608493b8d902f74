use worms_ast::ast::{Stmt, StmtKind};

use crate::context::{ExecutionContext, Status, Task};
use crate::fault::Fault;
use crate::value::Value;
use crate::world::{ActionCall, World};

/// Why a resume returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The program gave the turn back. Resume again next turn.
    Suspended,
    Finished,
    Crashed(Fault),
}

/// What one task asked the driver to do next.
enum Flow {
    Continue,
    /// Stop here; the task stack already reflects where to pick up.
    Suspend,
}

/// Procedure nesting limit. Recursion past this depth crashes the
/// program instead of overflowing the host stack.
const MAX_CALL_DEPTH: usize = 256;

/// Tasks a single resume may execute before it is declared hung. Only
/// zero-cost work can loop unboundedly; anything that performs actions
/// or suspends resets the clock on the next resume.
const MAX_STEPS_PER_RESUME: u64 = 1_000_000;

impl ExecutionContext {
    /// Grant `budget` action points and run until the program suspends,
    /// finishes, or crashes. Unspent points carry over, so the budget
    /// is added to whatever was left from earlier turns.
    ///
    /// Resuming a terminal context is a no-op that reports the same
    /// terminal outcome again.
    pub fn resume(&mut self, world: &mut dyn World, budget: f64) -> Outcome {
        match self.status {
            Status::Finished => return Outcome::Finished,
            Status::Crashed => {
                let fault = self.fault.clone().unwrap_or(Fault::Internal {
                    message: "crashed without a recorded fault".to_string(),
                });
                return Outcome::Crashed(fault);
            }
            Status::Ready | Status::Suspended => {}
        }
        self.points += budget;

        let mut steps: u64 = 0;
        while let Some(task) = self.tasks.pop() {
            steps += 1;
            if steps > MAX_STEPS_PER_RESUME {
                return self.crash(Fault::StepLimitExceeded);
            }
            match self.run_task(task, world) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Suspend) => {
                    self.status = Status::Suspended;
                    return Outcome::Suspended;
                }
                Err(fault) => return self.crash(fault),
            }
        }
        self.status = Status::Finished;
        Outcome::Finished
    }

    fn crash(&mut self, fault: Fault) -> Outcome {
        self.status = Status::Crashed;
        self.fault = Some(fault.clone());
        Outcome::Crashed(fault)
    }

    fn run_task(&mut self, task: Task, world: &mut dyn World) -> Result<Flow, Fault> {
        match task {
            Task::Run(stmt) => self.run_stmt(stmt, world),
            Task::Iterate {
                var,
                items,
                index,
                body,
            } => {
                if let Some(&entity) = items.get(index) {
                    self.write_var(&var, Value::Entity(Some(entity)));
                    self.tasks.push(Task::Iterate {
                        var,
                        items,
                        index: index + 1,
                        body: body.clone(),
                    });
                    self.tasks.push(Task::Run(body));
                }
                Ok(Flow::Continue)
            }
            Task::EndIterate => {
                self.bindings.pop();
                Ok(Flow::Continue)
            }
            Task::EndCall => {
                self.call_depth -= 1;
                Ok(Flow::Continue)
            }
        }
    }

    fn run_stmt(&mut self, stmt: Stmt, world: &mut dyn World) -> Result<Flow, Fault> {
        match &stmt.node {
            StmtKind::Assign { name, value } => {
                let value = self.eval(value, world)?;
                self.write_var(name, value);
                Ok(Flow::Continue)
            }
            StmtKind::Sequence(stmts) => {
                for s in stmts.iter().rev() {
                    self.tasks.push(Task::Run(s.clone()));
                }
                Ok(Flow::Continue)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, world)?.as_bool()? {
                    self.tasks.push(Task::Run(then_branch.clone()));
                } else if let Some(else_branch) = else_branch {
                    self.tasks.push(Task::Run(else_branch.clone()));
                }
                Ok(Flow::Continue)
            }
            StmtKind::While { condition, body } => {
                if self.eval(condition, world)?.as_bool()? {
                    // Re-test after the body by re-pushing the loop itself.
                    self.tasks.push(Task::Run(stmt.clone()));
                    self.tasks.push(Task::Run(body.clone()));
                }
                Ok(Flow::Continue)
            }
            StmtKind::Foreach { class, var, body } => {
                let items = world.living(*class);
                self.bindings.push((var.clone(), Value::Entity(None)));
                self.tasks.push(Task::EndIterate);
                self.tasks.push(Task::Iterate {
                    var: var.clone(),
                    items,
                    index: 0,
                    body: body.clone(),
                });
                Ok(Flow::Continue)
            }
            StmtKind::Print(expr) => {
                let value = self.eval(expr, world)?;
                world.log(value.to_string());
                Ok(Flow::Continue)
            }
            StmtKind::Skip => {
                // Forfeit what is left of the turn. Nothing carries
                // over, so the next resume starts from its own budget.
                self.points = 0.0;
                Ok(Flow::Suspend)
            }
            StmtKind::Call { name } => {
                let body = match self.program.program.procedures.get(name) {
                    Some(proc) => proc.body.clone(),
                    None => {
                        return Err(Fault::Internal {
                            message: format!("call to unknown procedure '{}'", name),
                        })
                    }
                };
                if self.call_depth >= MAX_CALL_DEPTH {
                    return Err(Fault::CallDepthExceeded { span: stmt.span });
                }
                self.call_depth += 1;
                self.tasks.push(Task::EndCall);
                self.tasks.push(Task::Run(body));
                Ok(Flow::Continue)
            }
            StmtKind::Action { kind, arg } => {
                let arg = match arg {
                    Some(expr) => Some(self.eval(expr, world)?.as_double()?),
                    None => None,
                };
                let call = ActionCall { kind: *kind, arg };
                let cost = world.cost_of(&call);
                if cost > self.points {
                    // Not affordable yet. Put the action back so the
                    // next resume retries it rather than skipping it.
                    self.tasks.push(Task::Run(stmt.clone()));
                    return Ok(Flow::Suspend);
                }
                // Performed or failed, the attempt costs the same.
                world.perform(&call);
                self.points -= cost;
                Ok(Flow::Continue)
            }
        }
    }
}