//! Pretty printer for worm control programs.
//!
//! Output is valid concrete syntax: re-parsing it yields a structurally
//! equal tree (see `structural`).

use std::fmt::Write;

use crate::ast::*;
use crate::Spanned;

pub fn pretty_program(program: &Program) -> String {
    let mut p = Printer::new();
    for name in &program.procedure_order {
        if let Some(proc) = program.procedures.get(name) {
            p.procedure(proc);
        }
    }
    // The main body is a synthetic Sequence; print its children at
    // top level rather than as a brace block.
    match &program.main.node {
        StmtKind::Sequence(stmts) => {
            for stmt in stmts {
                p.stmt(stmt);
            }
        }
        _ => p.stmt(&program.main),
    }
    p.out
}

pub fn pretty_expr(expr: &Spanned<ExprKind>) -> String {
    let mut out = String::new();
    write_expr(&mut out, &expr.node);
    out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Printer {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn procedure(&mut self, proc: &Procedure) {
        self.line(&format!("proc {} {{", proc.name));
        self.indent += 1;
        self.body_stmts(&proc.body);
        self.indent -= 1;
        self.line("}");
    }

    /// Print the children of a Sequence without the surrounding braces.
    fn body_stmts(&mut self, stmt: &Spanned<StmtKind>) {
        match &stmt.node {
            StmtKind::Sequence(stmts) => {
                for s in stmts {
                    self.stmt(s);
                }
            }
            _ => self.stmt_node(stmt),
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.stmt_node(stmt);
    }

    fn stmt_node(&mut self, stmt: &Spanned<StmtKind>) {
        match &stmt.node {
            StmtKind::Assign { name, value } => {
                self.line(&format!("{} := {};", name, pretty_expr(value)));
            }
            StmtKind::Sequence(stmts) => {
                self.line("{");
                self.indent += 1;
                for s in stmts {
                    self.stmt(s);
                }
                self.indent -= 1;
                self.line("}");
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if ({})", pretty_expr(condition)));
                self.indent += 1;
                self.stmt(then_branch);
                self.indent -= 1;
                if let Some(else_branch) = else_branch {
                    self.line("else");
                    self.indent += 1;
                    self.stmt(else_branch);
                    self.indent -= 1;
                }
            }
            StmtKind::While { condition, body } => {
                self.line(&format!("while ({})", pretty_expr(condition)));
                self.indent += 1;
                self.stmt(body);
                self.indent -= 1;
            }
            StmtKind::Foreach { class, var, body } => {
                self.line(&format!("foreach ({}, {})", class.keyword(), var));
                self.indent += 1;
                self.stmt(body);
                self.indent -= 1;
            }
            StmtKind::Print(expr) => {
                self.line(&format!("print({});", pretty_expr(expr)));
            }
            StmtKind::Skip => self.line("skip;"),
            StmtKind::Call { name } => self.line(&format!("{}();", name)),
            StmtKind::Action { kind, arg } => match arg {
                Some(arg) => self.line(&format!("{}({});", kind.keyword(), pretty_expr(arg))),
                None => self.line(&format!("{}();", kind.keyword())),
            },
        }
    }
}

fn write_expr(out: &mut String, expr: &ExprKind) {
    match expr {
        ExprKind::DoubleLit(v) => {
            // Keep a decimal point so the literal re-lexes identically.
            if v.fract() == 0.0 && v.is_finite() {
                let _ = write!(out, "{:.1}", v);
            } else {
                let _ = write!(out, "{}", v);
            }
        }
        ExprKind::BoolLit(b) => {
            let _ = write!(out, "{}", b);
        }
        ExprKind::NullLit => out.push_str("null"),
        ExprKind::SelfLit => out.push_str("self"),
        ExprKind::Var(name) => out.push_str(name),
        ExprKind::Unary { op, operand } => {
            out.push_str(op.symbol());
            out.push('(');
            write_expr(out, &operand.node);
            out.push(')');
        }
        ExprKind::Binary { op, lhs, rhs } => {
            out.push('(');
            write_expr(out, &lhs.node);
            let _ = write!(out, " {} ", op.symbol());
            write_expr(out, &rhs.node);
            out.push(')');
        }
        ExprKind::Query { name, args } => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, &arg.node);
            }
            out.push(')');
        }
    }
}
