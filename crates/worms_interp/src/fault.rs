use worms_ast::Span;

/// A runtime error that terminates the program. Once a context crashes
/// it stays crashed; further resumes report the same fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    DivisionByZero { span: Span },
    /// A `<`, `>`, `<=` or `>=` saw a NaN operand.
    NanComparison { span: Span },
    /// A variable was read before any assignment to it ran. The checker
    /// only guarantees first-assignment-in-source-order, which control
    /// flow can bypass.
    UnassignedVariable { name: String, span: Span },
    /// A query was applied to the null entity.
    NullEntity { query: String, span: Span },
    /// A query was applied to an entity the world no longer knows.
    VanishedEntity { span: Span },
    CallDepthExceeded { span: Span },
    /// A single resume executed too many steps without suspending.
    StepLimitExceeded,
    /// A value had the wrong runtime type. Unreachable for programs
    /// that passed the checker.
    Internal { message: String },
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fault::DivisionByZero { .. } => write!(f, "division by zero"),
            Fault::NanComparison { .. } => write!(f, "comparison with NaN"),
            Fault::UnassignedVariable { name, .. } => {
                write!(f, "variable '{}' read before assignment", name)
            }
            Fault::NullEntity { query, .. } => {
                write!(f, "{} applied to the null entity", query)
            }
            Fault::VanishedEntity { .. } => {
                write!(f, "entity no longer exists")
            }
            Fault::CallDepthExceeded { .. } => write!(f, "procedure call depth exceeded"),
            Fault::StepLimitExceeded => write!(f, "step limit exceeded within one turn"),
            Fault::Internal { message } => write!(f, "internal error: {}", message),
        }
    }
}

impl Fault {
    pub fn span(&self) -> Option<Span> {
        match self {
            Fault::DivisionByZero { span }
            | Fault::NanComparison { span }
            | Fault::UnassignedVariable { span, .. }
            | Fault::NullEntity { span, .. }
            | Fault::VanishedEntity { span }
            | Fault::CallDepthExceeded { span } => Some(*span),
            Fault::StepLimitExceeded | Fault::Internal { .. } => None,
        }
    }
}
