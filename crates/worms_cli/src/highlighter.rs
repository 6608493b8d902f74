use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};
use worms_lexer::{Lexer, TokenKind};

/// Syntax highlighter for the REPL, driven by the real lexer.
pub struct WormsHighlighter;

impl Highlighter for WormsHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if line.is_empty() {
            return styled;
        }

        let mut last_end = 0;
        for token in Lexer::new(line) {
            if matches!(token.kind, TokenKind::Eof) {
                break;
            }
            let start = token.span.start;
            let end = token.span.end;

            // Gaps are whitespace or comments; the lexer swallowed them.
            if start > last_end {
                push_gap(&mut styled, &line[last_end..start]);
            }

            styled.push((token_style(&token.kind), line[start..end].to_string()));
            last_end = end;
        }
        if last_end < line.len() {
            push_gap(&mut styled, &line[last_end..]);
        }
        styled
    }
}

fn push_gap(styled: &mut StyledText, gap: &str) {
    if let Some(comment_start) = gap.find("//") {
        let before = &gap[..comment_start];
        if !before.is_empty() {
            styled.push((Style::default(), before.to_string()));
        }
        styled.push((Color::DarkGray.normal(), gap[comment_start..].to_string()));
    } else {
        styled.push((Style::default(), gap.to_string()));
    }
}

fn token_style(kind: &TokenKind) -> Style {
    match kind {
        TokenKind::Double(_) => Color::Cyan.normal(),
        TokenKind::If
        | TokenKind::Else
        | TokenKind::While
        | TokenKind::Foreach
        | TokenKind::Proc
        | TokenKind::Print
        | TokenKind::Skip => Color::LightBlue.bold(),
        TokenKind::Turn
        | TokenKind::Move
        | TokenKind::Jump
        | TokenKind::Fire
        | TokenKind::Eat => Color::Yellow.normal(),
        TokenKind::True
        | TokenKind::False
        | TokenKind::Null
        | TokenKind::SelfKw => Color::Magenta.normal(),
        TokenKind::Worm | TokenKind::Food | TokenKind::Projectile | TokenKind::Any => {
            Color::Green.normal()
        }
        TokenKind::Error(_) => Color::Red.bold(),
        _ => Style::default(),
    }
}
