use std::sync::Arc;

use worms_ast::ast::{ActionKind, EntityClass, Stmt, StmtKind};
use worms_ast::diagnostic::Diagnostic;
use worms_ast::Spanned;
use worms_lexer::TokenKind;

use crate::parser::Parser;

impl Parser {
    /// `{ stmt* }` — always a Sequence, even with one statement.
    pub(crate) fn parse_block(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.start_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace | TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Arc::new(Spanned::new(
            StmtKind::Sequence(stmts),
            self.end_span(start),
        )))
    }

    /// A body is either a brace block or a single statement.
    fn parse_body(&mut self) -> Result<Stmt, Diagnostic> {
        if self.at(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.parse_stmt()
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.start_span();
        let kind = match self.peek().clone() {
            TokenKind::LBrace => return self.parse_block(),
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Foreach => self.parse_foreach()?,
            TokenKind::Print => self.parse_print()?,
            TokenKind::Skip => {
                self.advance();
                self.expect(&TokenKind::Semi)?;
                StmtKind::Skip
            }
            TokenKind::Turn => self.parse_action(ActionKind::Turn)?,
            TokenKind::Move => self.parse_action(ActionKind::Move)?,
            TokenKind::Jump => self.parse_action(ActionKind::Jump)?,
            TokenKind::Fire => self.parse_action(ActionKind::Fire)?,
            TokenKind::Eat => self.parse_action(ActionKind::Eat)?,
            TokenKind::Ident(name) => self.parse_assign_or_call(name)?,
            other => {
                return Err(self.error(format!(
                    "expected a statement, found {}",
                    other.describe()
                )))
            }
        };
        Ok(Arc::new(Spanned::new(kind, self.end_span(start))))
    }

    fn parse_if(&mut self) -> Result<StmtKind, Diagnostic> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = self.parse_body()?;
        // else binds to the nearest preceding if without an else
        let else_branch = if self.at(&TokenKind::Else) {
            self.advance();
            Some(self.parse_body()?)
        } else {
            None
        };
        Ok(StmtKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<StmtKind, Diagnostic> {
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_body()?;
        Ok(StmtKind::While { condition, body })
    }

    fn parse_foreach(&mut self) -> Result<StmtKind, Diagnostic> {
        self.expect(&TokenKind::Foreach)?;
        self.expect(&TokenKind::LParen)?;
        let class = match self.peek() {
            TokenKind::Worm => EntityClass::Worm,
            TokenKind::Food => EntityClass::Food,
            TokenKind::Projectile => EntityClass::Projectile,
            TokenKind::Any => EntityClass::Any,
            other => {
                return Err(self.error(format!(
                    "expected entity class (worm, food, projectile, any), found {}",
                    other.describe()
                )))
            }
        };
        self.advance();
        self.expect(&TokenKind::Comma)?;
        let (var, _) = self.expect_ident()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_body()?;
        Ok(StmtKind::Foreach { class, var, body })
    }

    fn parse_print(&mut self) -> Result<StmtKind, Diagnostic> {
        self.expect(&TokenKind::Print)?;
        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semi)?;
        Ok(StmtKind::Print(expr))
    }

    fn parse_action(&mut self, kind: ActionKind) -> Result<StmtKind, Diagnostic> {
        self.advance(); // action keyword
        self.expect(&TokenKind::LParen)?;
        let arg = if kind.takes_arg() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semi)?;
        Ok(StmtKind::Action { kind, arg })
    }

    /// `name := expr;` or `name();` — disambiguated by the next token.
    fn parse_assign_or_call(&mut self, name: String) -> Result<StmtKind, Diagnostic> {
        self.advance(); // identifier
        match self.peek() {
            TokenKind::Assign => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(StmtKind::Assign { name, value })
            }
            TokenKind::LParen => {
                self.advance();
                self.expect(&TokenKind::RParen)?;
                self.expect(&TokenKind::Semi)?;
                Ok(StmtKind::Call { name })
            }
            other => Err(self.error(format!(
                "expected ':=' or '()' after '{}', found {}",
                name,
                other.describe()
            ))),
        }
    }
}
