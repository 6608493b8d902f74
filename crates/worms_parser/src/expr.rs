use worms_ast::ast::{BinOp, ExprKind, UnaryOp};
use worms_ast::diagnostic::Diagnostic;
use worms_ast::Spanned;
use worms_lexer::TokenKind;

use crate::parser::Parser;

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        self.parse_or_expr()
    }

    // ── Precedence levels ────────────────────────────────────────

    fn parse_or_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let mut lhs = self.parse_and_expr()?;
        while matches!(self.peek(), TokenKind::PipePipe) {
            self.advance();
            let rhs = self.parse_and_expr()?;
            let span = self.end_span(start);
            lhs = Spanned::new(
                ExprKind::Binary {
                    op: BinOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_and_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let mut lhs = self.parse_cmp_expr()?;
        while matches!(self.peek(), TokenKind::AmpAmp) {
            self.advance();
            let rhs = self.parse_cmp_expr()?;
            let span = self.end_span(start);
            lhs = Spanned::new(
                ExprKind::Binary {
                    op: BinOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_cmp_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let lhs = self.parse_add_expr()?;
        let op = match self.peek() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::LtEq => Some(BinOp::LtEq),
            TokenKind::GtEq => Some(BinOp::GtEq),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Gt => Some(BinOp::Gt),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_add_expr()?;
            Ok(Spanned::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                self.end_span(start),
            ))
        } else {
            Ok(lhs)
        }
    }

    fn parse_add_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let mut lhs = self.parse_mul_expr()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_mul_expr()?;
            let span = self.end_span(start);
            lhs = Spanned::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_mul_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary_expr()?;
            let span = self.end_span(start);
            lhs = Spanned::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        let op = match self.peek() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary_expr()?;
            Ok(Spanned::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.end_span(start),
            ))
        } else {
            self.parse_primary_expr()
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Spanned<ExprKind>, Diagnostic> {
        let start = self.start_span();
        match self.peek().clone() {
            TokenKind::Double(value) => {
                self.advance();
                Ok(Spanned::new(
                    ExprKind::DoubleLit(value),
                    self.end_span(start),
                ))
            }
            TokenKind::True => {
                self.advance();
                Ok(Spanned::new(ExprKind::BoolLit(true), self.end_span(start)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Spanned::new(ExprKind::BoolLit(false), self.end_span(start)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Spanned::new(ExprKind::NullLit, self.end_span(start)))
            }
            TokenKind::SelfKw => {
                self.advance();
                Ok(Spanned::new(ExprKind::SelfLit, self.end_span(start)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                // Parens group only; no node is recorded for them.
                Ok(Spanned::new(inner.node, self.end_span(start)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.at(&TokenKind::LParen) {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.at(&TokenKind::RParen) {
                        args.push(self.parse_expr()?);
                        while self.at(&TokenKind::Comma) {
                            self.advance();
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    Ok(Spanned::new(
                        ExprKind::Query { name, args },
                        self.end_span(start),
                    ))
                } else {
                    Ok(Spanned::new(ExprKind::Var(name), self.end_span(start)))
                }
            }
            other => Err(self.error(format!(
                "expected an expression, found {}",
                other.describe()
            ))),
        }
    }
}
