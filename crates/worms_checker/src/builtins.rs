//! The builtin query catalog.
//!
//! One table drives both the checker (signatures) and the interpreter
//! (dispatch via `QueryOp`). Adding a query is one row here plus one
//! match arm in the interpreter's evaluator.

use crate::ty::Ty;

/// Semantic identity of a builtin, independent of its surface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    /// x coordinate of an entity.
    GetX,
    /// y coordinate of an entity.
    GetY,
    GetRadius,
    /// Orientation in radians.
    GetDir,
    /// Remaining action points.
    GetAp,
    /// Remaining hit points.
    GetHp,
    /// Whether two worms are on the same team.
    SameTeam,
    /// Nearest object from the current worm in the given direction.
    SearchObj,
    /// Uniform random double in `[lo, hi)`.
    Random,
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinSig {
    pub name: &'static str,
    pub op: QueryOp,
    pub params: &'static [Ty],
    pub ret: Ty,
}

pub const BUILTINS: &[BuiltinSig] = &[
    BuiltinSig {
        name: "getX",
        op: QueryOp::GetX,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "getY",
        op: QueryOp::GetY,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "getRadius",
        op: QueryOp::GetRadius,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "getDir",
        op: QueryOp::GetDir,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "getAP",
        op: QueryOp::GetAp,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "getHP",
        op: QueryOp::GetHp,
        params: &[Ty::Entity],
        ret: Ty::Double,
    },
    BuiltinSig {
        name: "sameTeam",
        op: QueryOp::SameTeam,
        params: &[Ty::Entity, Ty::Entity],
        ret: Ty::Bool,
    },
    BuiltinSig {
        name: "searchObj",
        op: QueryOp::SearchObj,
        params: &[Ty::Double],
        ret: Ty::Entity,
    },
    BuiltinSig {
        name: "random",
        op: QueryOp::Random,
        params: &[Ty::Double, Ty::Double],
        ret: Ty::Double,
    },
];

pub fn lookup(name: &str) -> Option<&'static BuiltinSig> {
    BUILTINS.iter().find(|sig| sig.name == name)
}
