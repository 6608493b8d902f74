//! Span-insensitive structural equality over the AST.
//!
//! `Spanned` derives `PartialEq` including the span, which is wrong for
//! comparing a parsed tree against a re-parsed pretty-printed tree. These
//! walk the shape only.

use crate::ast::*;
use crate::Spanned;

pub fn program_eq(a: &Program, b: &Program) -> bool {
    if a.procedure_order != b.procedure_order {
        return false;
    }
    for name in &a.procedure_order {
        match (a.procedures.get(name), b.procedures.get(name)) {
            (Some(pa), Some(pb)) => {
                if !stmt_eq(&pa.body, &pb.body) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    stmt_eq(&a.main, &b.main)
}

pub fn stmt_eq(a: &Spanned<StmtKind>, b: &Spanned<StmtKind>) -> bool {
    match (&a.node, &b.node) {
        (
            StmtKind::Assign { name: n1, value: v1 },
            StmtKind::Assign { name: n2, value: v2 },
        ) => n1 == n2 && expr_eq(v1, v2),
        (StmtKind::Sequence(s1), StmtKind::Sequence(s2)) => {
            s1.len() == s2.len() && s1.iter().zip(s2).all(|(x, y)| stmt_eq(x, y))
        }
        (
            StmtKind::If {
                condition: c1,
                then_branch: t1,
                else_branch: e1,
            },
            StmtKind::If {
                condition: c2,
                then_branch: t2,
                else_branch: e2,
            },
        ) => {
            expr_eq(c1, c2)
                && stmt_eq(t1, t2)
                && match (e1, e2) {
                    (Some(e1), Some(e2)) => stmt_eq(e1, e2),
                    (None, None) => true,
                    _ => false,
                }
        }
        (
            StmtKind::While {
                condition: c1,
                body: b1,
            },
            StmtKind::While {
                condition: c2,
                body: b2,
            },
        ) => expr_eq(c1, c2) && stmt_eq(b1, b2),
        (
            StmtKind::Foreach {
                class: cl1,
                var: v1,
                body: b1,
            },
            StmtKind::Foreach {
                class: cl2,
                var: v2,
                body: b2,
            },
        ) => cl1 == cl2 && v1 == v2 && stmt_eq(b1, b2),
        (StmtKind::Print(e1), StmtKind::Print(e2)) => expr_eq(e1, e2),
        (StmtKind::Skip, StmtKind::Skip) => true,
        (StmtKind::Call { name: n1 }, StmtKind::Call { name: n2 }) => n1 == n2,
        (
            StmtKind::Action { kind: k1, arg: a1 },
            StmtKind::Action { kind: k2, arg: a2 },
        ) => {
            k1 == k2
                && match (a1, a2) {
                    (Some(a1), Some(a2)) => expr_eq(a1, a2),
                    (None, None) => true,
                    _ => false,
                }
        }
        _ => false,
    }
}

pub fn expr_eq(a: &Spanned<ExprKind>, b: &Spanned<ExprKind>) -> bool {
    match (&a.node, &b.node) {
        (ExprKind::DoubleLit(x), ExprKind::DoubleLit(y)) => x == y,
        (ExprKind::BoolLit(x), ExprKind::BoolLit(y)) => x == y,
        (ExprKind::NullLit, ExprKind::NullLit) => true,
        (ExprKind::SelfLit, ExprKind::SelfLit) => true,
        (ExprKind::Var(x), ExprKind::Var(y)) => x == y,
        (
            ExprKind::Unary { op: o1, operand: e1 },
            ExprKind::Unary { op: o2, operand: e2 },
        ) => o1 == o2 && expr_eq(e1, e2),
        (
            ExprKind::Binary {
                op: o1,
                lhs: l1,
                rhs: r1,
            },
            ExprKind::Binary {
                op: o2,
                lhs: l2,
                rhs: r2,
            },
        ) => o1 == o2 && expr_eq(l1, l2) && expr_eq(r1, r2),
        (
            ExprKind::Query { name: n1, args: a1 },
            ExprKind::Query { name: n2, args: a2 },
        ) => n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| expr_eq(x, y)),
        _ => false,
    }
}
