//! Expression evaluation. Expressions never suspend; `random` is the
//! only source of nondeterminism and it goes through the world so hosts
//! control the seed.

use worms_ast::ast::{BinOp, ExprKind, UnaryOp};
use worms_ast::{Span, Spanned};
use worms_checker::builtins::{self, QueryOp};

use crate::context::ExecutionContext;
use crate::fault::Fault;
use crate::value::Value;
use crate::world::{EntityRef, World};

impl ExecutionContext {
    pub(crate) fn eval(
        &mut self,
        expr: &Spanned<ExprKind>,
        world: &mut dyn World,
    ) -> Result<Value, Fault> {
        match &expr.node {
            ExprKind::DoubleLit(d) => Ok(Value::Double(*d)),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NullLit => Ok(Value::Entity(None)),
            ExprKind::SelfLit => Ok(Value::Entity(Some(world.me()))),
            ExprKind::Var(name) => self.read_var(name).ok_or_else(|| Fault::UnassignedVariable {
                name: name.clone(),
                span: expr.span,
            }),
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand, world)?;
                match op {
                    UnaryOp::Neg => Ok(Value::Double(-value.as_double()?)),
                    UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
                }
            }
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, expr.span, world),
            ExprKind::Query { name, args } => self.eval_query(name, args, expr.span, world),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Spanned<ExprKind>,
        rhs: &Spanned<ExprKind>,
        span: Span,
        world: &mut dyn World,
    ) -> Result<Value, Fault> {
        // && and || short-circuit; the right operand may not run.
        match op {
            BinOp::And => {
                return if self.eval(lhs, world)?.as_bool()? {
                    self.eval(rhs, world)
                } else {
                    Ok(Value::Bool(false))
                };
            }
            BinOp::Or => {
                return if self.eval(lhs, world)?.as_bool()? {
                    Ok(Value::Bool(true))
                } else {
                    self.eval(rhs, world)
                };
            }
            _ => {}
        }

        let lhs = self.eval(lhs, world)?;
        let rhs = self.eval(rhs, world)?;
        match op {
            BinOp::Add => Ok(Value::Double(lhs.as_double()? + rhs.as_double()?)),
            BinOp::Sub => Ok(Value::Double(lhs.as_double()? - rhs.as_double()?)),
            BinOp::Mul => Ok(Value::Double(lhs.as_double()? * rhs.as_double()?)),
            BinOp::Div => {
                let divisor = rhs.as_double()?;
                if divisor == 0.0 {
                    return Err(Fault::DivisionByZero { span });
                }
                Ok(Value::Double(lhs.as_double()? / divisor))
            }
            BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => {
                let l = lhs.as_double()?;
                let r = rhs.as_double()?;
                if l.is_nan() || r.is_nan() {
                    return Err(Fault::NanComparison { span });
                }
                let result = match op {
                    BinOp::Lt => l < r,
                    BinOp::Gt => l > r,
                    BinOp::LtEq => l <= r,
                    _ => l >= r,
                };
                Ok(Value::Bool(result))
            }
            BinOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinOp::NotEq => Ok(Value::Bool(lhs != rhs)),
            BinOp::And | BinOp::Or => Err(Fault::Internal {
                message: "short-circuit operator fell through".to_string(),
            }),
        }
    }

    fn eval_query(
        &mut self,
        name: &str,
        args: &[Spanned<ExprKind>],
        span: Span,
        world: &mut dyn World,
    ) -> Result<Value, Fault> {
        let Some(sig) = builtins::lookup(name) else {
            return Err(Fault::Internal {
                message: format!("unknown query '{}'", name),
            });
        };
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, world)?);
        }

        // Entity-reading queries crash on null rather than guessing.
        let entity = |index: usize| -> Result<EntityRef, Fault> {
            values
                .get(index)
                .copied()
                .ok_or_else(|| Fault::Internal {
                    message: format!("missing argument {} to {}", index, name),
                })?
                .as_entity()?
                .ok_or_else(|| Fault::NullEntity {
                    query: name.to_string(),
                    span,
                })
        };
        let double = |index: usize| -> Result<f64, Fault> {
            values
                .get(index)
                .copied()
                .ok_or_else(|| Fault::Internal {
                    message: format!("missing argument {} to {}", index, name),
                })?
                .as_double()
        };
        let vanished = || Fault::VanishedEntity { span };

        match sig.op {
            QueryOp::GetX => {
                let (x, _) = world.position(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(x))
            }
            QueryOp::GetY => {
                let (_, y) = world.position(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(y))
            }
            QueryOp::GetRadius => {
                let r = world.radius(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(r))
            }
            QueryOp::GetDir => {
                let d = world.orientation(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(d))
            }
            QueryOp::GetAp => {
                let ap = world.action_points(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(ap))
            }
            QueryOp::GetHp => {
                let hp = world.hit_points(entity(0)?).ok_or_else(vanished)?;
                Ok(Value::Double(hp))
            }
            QueryOp::SameTeam => {
                let same = world
                    .same_team(entity(0)?, entity(1)?)
                    .ok_or_else(vanished)?;
                Ok(Value::Bool(same))
            }
            QueryOp::SearchObj => Ok(Value::Entity(world.search_object(double(0)?))),
            QueryOp::Random => {
                let lo = double(0)?;
                let hi = double(1)?;
                Ok(Value::Double(world.random_in_range(lo, hi)))
            }
        }
    }
}
