use std::collections::HashMap;
use std::sync::Arc;

use crate::{Span, Spanned};

// ── Program structure ────────────────────────────────────────────

/// A statement node. Statements are `Arc`-shared so a suspended
/// execution context can keep pointers into the tree across turns
/// without borrowing the program.
pub type Stmt = Arc<Spanned<StmtKind>>;

pub type Expr = Box<Spanned<ExprKind>>;

#[derive(Debug, Clone)]
pub struct Program {
    pub procedures: HashMap<String, Procedure>,
    /// Declaration order, used for source-order type inference.
    pub procedure_order: Vec<String>,
    /// The main body: a Sequence of all top-level statements.
    pub main: Stmt,
}

#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub body: Stmt,
    pub span: Span,
}

// ── Statements ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `x := expr;` — first assignment implicitly declares a global.
    Assign {
        name: String,
        value: Spanned<ExprKind>,
    },
    Sequence(Vec<Stmt>),
    If {
        condition: Spanned<ExprKind>,
        then_branch: Stmt,
        else_branch: Option<Stmt>,
    },
    While {
        condition: Spanned<ExprKind>,
        body: Stmt,
    },
    /// Iterates a snapshot of matching entities taken at loop entry.
    /// The loop variable is Entity-typed and scoped to the body.
    Foreach {
        class: EntityClass,
        var: String,
        body: Stmt,
    },
    Print(Spanned<ExprKind>),
    /// Ends the worm's turn.
    Skip,
    /// `name();` — procedures take no arguments and share global scope.
    Call { name: String },
    Action {
        kind: ActionKind,
        arg: Option<Spanned<ExprKind>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Turn,
    Move,
    Jump,
    Fire,
    Eat,
}

impl ActionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ActionKind::Turn => "turn",
            ActionKind::Move => "move",
            ActionKind::Jump => "jump",
            ActionKind::Fire => "fire",
            ActionKind::Eat => "eat",
        }
    }

    /// Whether the action takes a Double argument.
    pub fn takes_arg(self) -> bool {
        matches!(self, ActionKind::Turn | ActionKind::Fire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Worm,
    Food,
    Projectile,
    Any,
}

impl EntityClass {
    pub fn keyword(self) -> &'static str {
        match self {
            EntityClass::Worm => "worm",
            EntityClass::Food => "food",
            EntityClass::Projectile => "projectile",
            EntityClass::Any => "any",
        }
    }
}

// ── Expressions ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum ExprKind {
    DoubleLit(f64),
    BoolLit(bool),
    /// The entity-null literal.
    NullLit,
    /// The executing worm.
    SelfLit,
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Expr,
    },
    Binary {
        op: BinOp,
        lhs: Expr,
        rhs: Expr,
    },
    /// A builtin entity/world query, e.g. `getX(self)` or `random(0, 1)`.
    /// Names are resolved against the builtin catalog by the checker.
    Query {
        name: String,
        args: Vec<Spanned<ExprKind>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}
