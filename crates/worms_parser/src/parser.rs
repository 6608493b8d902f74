use std::collections::HashMap;
use std::sync::Arc;

use worms_ast::ast::{Procedure, Program, Stmt, StmtKind};
use worms_ast::diagnostic::Diagnostic;
use worms_ast::{Span, Spanned};
use worms_lexer::{Lexer, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        Self { tokens, pos: 0 }
    }

    // ── Token helpers ────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|t| t.span).unwrap_or_else(|| {
            self.tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end))
                .unwrap_or(Span::synthetic())
        })
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::synthetic()));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, Diagnostic> {
        if self.at(expected) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                expected.describe(),
                self.peek().describe()
            )))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, Span), Diagnostic> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let tok = self.advance();
                Ok((name, tok.span))
            }
            other => Err(self.error(format!(
                "expected identifier, found {}",
                other.describe()
            ))),
        }
    }

    pub(crate) fn start_span(&self) -> usize {
        self.peek_span().start
    }

    pub(crate) fn end_span(&self, start: usize) -> Span {
        let end = if self.pos > 0 {
            self.tokens[self.pos - 1].span.end
        } else {
            start
        };
        Span::new(start, end)
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(message, self.peek_span())
    }

    // ── Program parsing ──────────────────────────────────────────

    pub fn parse(mut self) -> Result<Program, Diagnostic> {
        // Surface the first invalid token as a lex error before any
        // grammar work; the stream itself never fails.
        for tok in &self.tokens {
            if let TokenKind::Error(msg) = &tok.kind {
                return Err(Diagnostic::error(msg.clone(), tok.span));
            }
        }

        let start = self.start_span();
        let mut procedures: HashMap<String, Procedure> = HashMap::new();
        let mut procedure_order = Vec::new();
        let mut top_level: Vec<Stmt> = Vec::new();

        while !matches!(self.peek(), TokenKind::Eof) {
            if self.at(&TokenKind::Proc) {
                let proc = self.parse_procedure()?;
                if procedures.contains_key(&proc.name) {
                    return Err(Diagnostic::error(
                        format!("duplicate procedure '{}'", proc.name),
                        proc.span,
                    ));
                }
                procedure_order.push(proc.name.clone());
                procedures.insert(proc.name.clone(), proc);
            } else {
                top_level.push(self.parse_stmt()?);
            }
        }

        let main_span = self.end_span(start);
        let main = Arc::new(Spanned::new(StmtKind::Sequence(top_level), main_span));

        Ok(Program {
            procedures,
            procedure_order,
            main,
        })
    }

    fn parse_procedure(&mut self) -> Result<Procedure, Diagnostic> {
        let start = self.start_span();
        self.expect(&TokenKind::Proc)?;
        let (name, _) = self.expect_ident()?;
        let body = self.parse_block()?;
        Ok(Procedure {
            name,
            body,
            span: self.end_span(start),
        })
    }
}
