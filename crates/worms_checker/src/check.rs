use std::collections::HashMap;

use worms_ast::ast::*;
use worms_ast::diagnostic::Diagnostic;
use worms_ast::{Span, Spanned};

use crate::builtins;
use crate::ty::Ty;

/// Single-pass checker. Walks procedure declarations and top-level
/// statements in source order, inferring each global's type at its first
/// assignment; all later uses must agree. Procedures take no arguments
/// and share the global scope, so they are checked independently of call
/// sites.
pub struct Checker<'p> {
    program: &'p Program,
    pub globals: HashMap<String, Ty>,
    pub diagnostics: Vec<Diagnostic>,
    /// Entity-typed foreach loop variables, innermost last.
    foreach_vars: Vec<String>,
}

impl<'p> Checker<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            globals: HashMap::new(),
            diagnostics: Vec::new(),
            foreach_vars: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    pub fn check_program(&mut self) {
        // Procedure bodies and top-level statements interleave freely in
        // a program; spans reconstruct the order they were written in,
        // which is what fixes each global's inferred type.
        let mut items: Vec<(usize, &'p Spanned<StmtKind>)> = Vec::new();
        for name in &self.program.procedure_order {
            if let Some(proc) = self.program.procedures.get(name) {
                items.push((proc.span.start, &proc.body));
            }
        }
        match &self.program.main.node {
            StmtKind::Sequence(stmts) => {
                for stmt in stmts {
                    items.push((stmt.span.start, stmt));
                }
            }
            _ => items.push((self.program.main.span.start, &self.program.main)),
        }
        items.sort_by_key(|(start, _)| *start);
        for (_, stmt) in items {
            self.check_stmt(stmt);
        }
    }

    // ── Statements ───────────────────────────────────────────────

    fn check_stmt(&mut self, stmt: &Spanned<StmtKind>) {
        match &stmt.node {
            StmtKind::Assign { name, value } => {
                let value_ty = self.check_expr(value);
                if self.foreach_vars.iter().any(|v| v == name) {
                    // The loop variable is a scoped Entity local.
                    if !value_ty.is_error() && value_ty != Ty::Entity {
                        self.error(
                            format!(
                                "cannot assign {} to foreach variable '{}' (entity)",
                                value_ty, name
                            ),
                            stmt.span,
                        );
                    }
                } else if let Some(&declared) = self.globals.get(name) {
                    if !declared.is_error() && !value_ty.is_error() && value_ty != declared {
                        self.error(
                            format!(
                                "variable '{}' was inferred as {} but is assigned {}",
                                name, declared, value_ty
                            ),
                            value.span,
                        );
                    }
                } else {
                    // First assignment in source order fixes the type.
                    self.globals.insert(name.clone(), value_ty);
                }
            }
            StmtKind::Sequence(stmts) => {
                for s in stmts {
                    self.check_stmt(s);
                }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition, "if");
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_condition(condition, "while");
                self.check_stmt(body);
            }
            StmtKind::Foreach { class: _, var, body } => {
                if let Some(&existing) = self.globals.get(var) {
                    if existing != Ty::Entity && !existing.is_error() {
                        self.error(
                            format!(
                                "foreach variable '{}' shadows a {} global",
                                var, existing
                            ),
                            stmt.span,
                        );
                    }
                }
                self.foreach_vars.push(var.clone());
                self.check_stmt(body);
                self.foreach_vars.pop();
            }
            StmtKind::Print(expr) => {
                // Any type prints.
                self.check_expr(expr);
            }
            StmtKind::Skip => {}
            StmtKind::Call { name } => {
                if !self.program.procedures.contains_key(name) {
                    self.error(format!("call to undefined procedure '{}'", name), stmt.span);
                }
            }
            StmtKind::Action { kind, arg } => {
                if let Some(arg) = arg {
                    let arg_ty = self.check_expr(arg);
                    if !arg_ty.is_error() && arg_ty != Ty::Double {
                        self.error(
                            format!(
                                "argument of {} must be double, found {}",
                                kind.keyword(),
                                arg_ty
                            ),
                            arg.span,
                        );
                    }
                }
            }
        }
    }

    fn check_condition(&mut self, condition: &Spanned<ExprKind>, construct: &str) {
        let ty = self.check_expr(condition);
        if !ty.is_error() && ty != Ty::Bool {
            self.error(
                format!("{} condition must be bool, found {}", construct, ty),
                condition.span,
            );
        }
    }

    // ── Expressions ──────────────────────────────────────────────

    fn check_expr(&mut self, expr: &Spanned<ExprKind>) -> Ty {
        match &expr.node {
            ExprKind::DoubleLit(_) => Ty::Double,
            ExprKind::BoolLit(_) => Ty::Bool,
            ExprKind::NullLit | ExprKind::SelfLit => Ty::Entity,
            ExprKind::Var(name) => {
                if self.foreach_vars.iter().any(|v| v == name) {
                    Ty::Entity
                } else if let Some(&ty) = self.globals.get(name) {
                    ty
                } else {
                    self.error(format!("use of undeclared variable '{}'", name), expr.span);
                    Ty::Error
                }
            }
            ExprKind::Unary { op, operand } => {
                let operand_ty = self.check_expr(operand);
                let (required, result) = match op {
                    UnaryOp::Neg => (Ty::Double, Ty::Double),
                    UnaryOp::Not => (Ty::Bool, Ty::Bool),
                };
                if !operand_ty.is_error() && operand_ty != required {
                    self.error(
                        format!(
                            "operand of '{}' must be {}, found {}",
                            op.symbol(),
                            required,
                            operand_ty
                        ),
                        operand.span,
                    );
                }
                result
            }
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, expr.span),
            ExprKind::Query { name, args } => self.check_query(name, args, expr.span),
        }
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        lhs: &Spanned<ExprKind>,
        rhs: &Spanned<ExprKind>,
        span: Span,
    ) -> Ty {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                self.require(lhs_ty, Ty::Double, op, lhs.span);
                self.require(rhs_ty, Ty::Double, op, rhs.span);
                Ty::Double
            }
            BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => {
                self.require(lhs_ty, Ty::Double, op, lhs.span);
                self.require(rhs_ty, Ty::Double, op, rhs.span);
                Ty::Bool
            }
            BinOp::Eq | BinOp::NotEq => {
                // Any two operands of the same type.
                if !lhs_ty.is_error() && !rhs_ty.is_error() && lhs_ty != rhs_ty {
                    self.error(
                        format!(
                            "'{}' requires operands of the same type, found {} and {}",
                            op.symbol(),
                            lhs_ty,
                            rhs_ty
                        ),
                        span,
                    );
                }
                Ty::Bool
            }
            BinOp::And | BinOp::Or => {
                self.require(lhs_ty, Ty::Bool, op, lhs.span);
                self.require(rhs_ty, Ty::Bool, op, rhs.span);
                Ty::Bool
            }
        }
    }

    fn require(&mut self, actual: Ty, expected: Ty, op: BinOp, span: Span) {
        if !actual.is_error() && actual != expected {
            self.error(
                format!(
                    "operand of '{}' must be {}, found {}",
                    op.symbol(),
                    expected,
                    actual
                ),
                span,
            );
        }
    }

    fn check_query(&mut self, name: &str, args: &[Spanned<ExprKind>], span: Span) -> Ty {
        let Some(sig) = builtins::lookup(name) else {
            self.error(format!("unknown query '{}'", name), span);
            for arg in args {
                self.check_expr(arg);
            }
            return Ty::Error;
        };
        if args.len() != sig.params.len() {
            self.error(
                format!(
                    "{} takes {} argument{}, found {}",
                    name,
                    sig.params.len(),
                    if sig.params.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                span,
            );
        }
        for (arg, &expected) in args.iter().zip(sig.params) {
            let arg_ty = self.check_expr(arg);
            if !arg_ty.is_error() && arg_ty != expected {
                self.error(
                    format!(
                        "argument of {} must be {}, found {}",
                        name, expected, arg_ty
                    ),
                    arg.span,
                );
            }
        }
        sig.ret
    }
}
