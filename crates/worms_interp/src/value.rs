use crate::fault::Fault;
use crate::world::EntityRef;

/// A runtime value. The checker guarantees every expression evaluates
/// to exactly one of these shapes, so the extractors below only fail on
/// interpreter bugs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Double(f64),
    Bool(bool),
    /// `None` is the null entity.
    Entity(Option<EntityRef>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Entity(_) => "entity",
        }
    }

    pub fn as_double(self) -> Result<f64, Fault> {
        match self {
            Value::Double(d) => Ok(d),
            other => Err(confusion("double", other)),
        }
    }

    pub fn as_bool(self) -> Result<bool, Fault> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(confusion("bool", other)),
        }
    }

    pub fn as_entity(self) -> Result<Option<EntityRef>, Fault> {
        match self {
            Value::Entity(e) => Ok(e),
            other => Err(confusion("entity", other)),
        }
    }
}

fn confusion(expected: &str, found: Value) -> Fault {
    Fault::Internal {
        message: format!("expected {}, found {}", expected, found.type_name()),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Double(d) => {
                if d.fract() == 0.0 && d.is_finite() {
                    write!(f, "{:.1}", d)
                } else {
                    write!(f, "{}", d)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Entity(None) => write!(f, "null"),
            Value::Entity(Some(e)) => write!(f, "entity#{}", e.0),
        }
    }
}
