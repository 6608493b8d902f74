use worms_ast::ast::{ActionKind, EntityClass};

/// Opaque handle to a game object owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef(pub u64);

/// An action the program wants its worm to take, with the argument
/// already evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCall {
    pub kind: ActionKind,
    pub arg: Option<f64>,
}

/// What happened when the world carried out an action. Both outcomes
/// consume the action's cost; a failed move is still a spent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed,
    Failed,
}

/// The host side of the interpreter. Queries read game state, actions
/// mutate it, and `log` receives `print` output.
///
/// Read methods return `None` when the entity is not (or no longer)
/// known to the world; the interpreter turns that into a crash.
pub trait World {
    /// The worm this program controls.
    fn me(&self) -> EntityRef;

    fn position(&self, entity: EntityRef) -> Option<(f64, f64)>;
    fn radius(&self, entity: EntityRef) -> Option<f64>;
    /// Orientation in radians.
    fn orientation(&self, entity: EntityRef) -> Option<f64>;
    fn hit_points(&self, entity: EntityRef) -> Option<f64>;
    fn action_points(&self, entity: EntityRef) -> Option<f64>;
    fn same_team(&self, a: EntityRef, b: EntityRef) -> Option<bool>;

    /// Live entities of the given class, in a stable order. Called once
    /// at foreach entry; the loop iterates over that snapshot even if
    /// the set changes mid-loop.
    fn living(&self, class: EntityClass) -> Vec<EntityRef>;

    /// Nearest object along the given direction from the program's
    /// worm, or `None` when nothing is in the way.
    fn search_object(&self, direction: f64) -> Option<EntityRef>;

    /// Uniform sample from `[lo, hi)`.
    fn random_in_range(&mut self, lo: f64, hi: f64) -> f64;

    /// Action point cost of the call, asked before performing so the
    /// interpreter can suspend instead of overdrawing the budget.
    fn cost_of(&self, call: &ActionCall) -> f64;

    fn perform(&mut self, call: &ActionCall) -> ActionOutcome;

    /// Receives one line per executed `print` statement.
    fn log(&mut self, line: String);
}
