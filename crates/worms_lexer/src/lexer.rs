use crate::token::{Token, TokenKind};
use worms_ast::Span;

/// Hand-written lexer producing a lazy token stream.
///
/// Position tracking lives directly in the lexer: `pos` is a byte offset
/// into `source`, always on a char boundary. Whitespace and `//` comments
/// are discarded. Invalid characters become `TokenKind::Error` tokens; the
/// parser turns the first of these into a lex error, so the stream itself
/// never fails.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            done: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.eat_while(|ch| ch.is_ascii_whitespace());

            if self.rest().starts_with("//") {
                self.eat_while(|ch| ch != '\n');
                continue;
            }

            break;
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_while(|ch| ch.is_ascii_digit());
        // A dot only belongs to the number when a digit follows, so
        // "1." stays Double(1.0) plus whatever comes next.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
            self.eat_while(|ch| ch.is_ascii_digit());
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);
        match text.parse::<f64>() {
            Ok(value) => Token::new(TokenKind::Double(value), span),
            Err(_) => Token::new(
                TokenKind::Error(format!("malformed number '{}'", text)),
                span,
            ),
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);

        let kind = match text {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "foreach" => TokenKind::Foreach,
            "proc" => TokenKind::Proc,
            "print" => TokenKind::Print,
            "skip" => TokenKind::Skip,
            "turn" => TokenKind::Turn,
            "move" => TokenKind::Move,
            "jump" => TokenKind::Jump,
            "fire" => TokenKind::Fire,
            "eat" => TokenKind::Eat,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "self" => TokenKind::SelfKw,
            "worm" => TokenKind::Worm,
            "food" => TokenKind::Food,
            "projectile" => TokenKind::Projectile,
            "any" => TokenKind::Any,
            _ => TokenKind::Ident(text.to_string()),
        };

        Token::new(kind, span)
    }

    /// Lexes a two-char operator if `second` follows, else falls back.
    fn pair_or(&mut self, second: char, pair: TokenKind, bare: TokenKind, start: usize) -> Token {
        if self.peek() == Some(second) {
            self.bump();
            Token::new(pair, Span::new(start, self.pos))
        } else {
            Token::new(bare, Span::new(start, self.pos))
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let Some(ch) = self.bump() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let single = |kind, lexer: &Self| Token::new(kind, Span::new(start, lexer.pos));

        match ch {
            '(' => single(TokenKind::LParen, self),
            ')' => single(TokenKind::RParen, self),
            '{' => single(TokenKind::LBrace, self),
            '}' => single(TokenKind::RBrace, self),
            ',' => single(TokenKind::Comma, self),
            ';' => single(TokenKind::Semi, self),
            '+' => single(TokenKind::Plus, self),
            '-' => single(TokenKind::Minus, self),
            '*' => single(TokenKind::Star, self),
            '/' => single(TokenKind::Slash, self),

            ':' => self.pair_or(
                '=',
                TokenKind::Assign,
                TokenKind::Error("expected '=' after ':'".into()),
                start,
            ),

            '!' => self.pair_or('=', TokenKind::BangEq, TokenKind::Bang, start),

            '=' => self.pair_or(
                '=',
                TokenKind::EqEq,
                TokenKind::Error("expected '==' (assignment is ':=')".into()),
                start,
            ),

            '<' => self.pair_or('=', TokenKind::LtEq, TokenKind::Lt, start),

            '>' => self.pair_or('=', TokenKind::GtEq, TokenKind::Gt, start),

            '&' => self.pair_or(
                '&',
                TokenKind::AmpAmp,
                TokenKind::Error("unexpected character '&'".into()),
                start,
            ),

            '|' => self.pair_or(
                '|',
                TokenKind::PipePipe,
                TokenKind::Error("unexpected character '|'".into()),
                start,
            ),

            ch if ch.is_ascii_digit() => self.lex_number(start),

            ch if ch.is_ascii_alphabetic() || ch == '_' => self.lex_ident_or_keyword(start),

            _ => Token::new(
                TokenKind::Error(format!("unexpected character '{}'", ch)),
                Span::new(start, self.pos),
            ),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_numbers_are_doubles() {
        assert_eq!(
            lex("42 3.5 0.25"),
            vec![
                TokenKind::Double(42.0),
                TokenKind::Double(3.5),
                TokenKind::Double(0.25),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_followed_by_dot_call() {
        // "1." without a following digit: the dot is not part of the number
        let toks = lex("1.x");
        assert_eq!(toks[0], TokenKind::Double(1.0));
        assert!(matches!(toks[1], TokenKind::Error(_)));
    }

    #[test]
    fn test_assign_token() {
        assert_eq!(
            lex("x := 3.0"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Double(3.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bare_colon_is_error() {
        let toks = lex("x : 1");
        assert!(matches!(toks[1], TokenKind::Error(_)));
    }

    #[test]
    fn test_bare_eq_is_error() {
        let toks = lex("x = 1");
        assert!(matches!(toks[1], TokenKind::Error(_)));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            lex("if else while foreach proc print skip"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Foreach,
                TokenKind::Proc,
                TokenKind::Print,
                TokenKind::Skip,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_action_keywords() {
        assert_eq!(
            lex("turn move jump fire eat"),
            vec![
                TokenKind::Turn,
                TokenKind::Move,
                TokenKind::Jump,
                TokenKind::Fire,
                TokenKind::Eat,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_entity_class_keywords() {
        assert_eq!(
            lex("worm food projectile any"),
            vec![
                TokenKind::Worm,
                TokenKind::Food,
                TokenKind::Projectile,
                TokenKind::Any,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literal_keywords() {
        assert_eq!(
            lex("true false null self"),
            vec![
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::SelfKw,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_builtin_names_are_idents() {
        assert_eq!(
            lex("getX sameTeam searchObj random"),
            vec![
                TokenKind::Ident("getX".into()),
                TokenKind::Ident("sameTeam".into()),
                TokenKind::Ident("searchObj".into()),
                TokenKind::Ident("random".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_underscore_ident() {
        assert_eq!(
            lex("_tmp x_1"),
            vec![
                TokenKind::Ident("_tmp".into()),
                TokenKind::Ident("x_1".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("+ - * / ! == != < > <= >= && ||"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Bang,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_stripped() {
        assert_eq!(
            lex("x // comment\ny"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_non_ascii_comment() {
        assert_eq!(
            lex("x // völlig egal\ny"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_track_bytes() {
        let toks: Vec<Token> = Lexer::new("ab := 1").collect();
        assert_eq!(toks[0].span, Span::new(0, 2));
        assert_eq!(toks[1].span, Span::new(3, 5));
        assert_eq!(toks[2].span, Span::new(6, 7));
    }

    #[test]
    fn test_unexpected_character() {
        let toks = lex("x @ y");
        assert!(matches!(toks[1], TokenKind::Error(_)));
    }
}
