/// The three static types of the worm control language, plus an error
/// sentinel that suppresses cascading diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Double,
    Bool,
    Entity,
    Error,
}

impl Ty {
    pub fn is_error(self) -> bool {
        matches!(self, Ty::Error)
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ty::Double => "double",
            Ty::Bool => "bool",
            Ty::Entity => "entity",
            Ty::Error => "<error>",
        };
        write!(f, "{}", name)
    }
}
