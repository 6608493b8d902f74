use crate::Span;

/// A located compile-time error.
///
/// Worm programs have no warning level: the parser stops at the first
/// error and the checker reports only type errors, so a diagnostic is
/// always fatal to compilation.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

/// Locates diagnostics in a program text and renders them with the
/// offending tokens underlined.
///
/// Worm programs are short (often a single REPL line), so positions are
/// computed by scanning on demand instead of keeping a line index.
pub struct SourceText<'a> {
    source: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// 1-indexed line and column of a byte offset. Columns count
    /// characters, so the caret lines up even after multi-byte input.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for (i, ch) in self.source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// The full source line containing the given byte offset.
    fn line_text(&self, offset: usize) -> &str {
        let offset = offset.min(self.source.len());
        let start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let rest = &self.source[start..];
        rest.find('\n')
            .map_or(rest, |i| &rest[..i])
            .trim_end_matches('\r')
    }

    pub fn render(&self, diag: &Diagnostic) -> String {
        if diag.span.is_synthetic() || diag.span.start > self.source.len() {
            return diag.to_string();
        }
        let (line, col) = self.line_col(diag.span.start);
        let text = self.line_text(diag.span.start);
        // Underline the span, clipped to the end of its line.
        let width = diag
            .span
            .len()
            .clamp(1, (text.chars().count() + 1).saturating_sub(col).max(1));
        format!(
            "{diag}\n  --> {line}:{col}\n   | {text}\n   | {pad}{carets}",
            pad = " ".repeat(col - 1),
            carets = "^".repeat(width),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let text = SourceText::new("x := 1.0;\nmove();");
        assert_eq!(text.line_col(0), (1, 1));
        assert_eq!(text.line_col(5), (1, 6));
        assert_eq!(text.line_col(10), (2, 1));
        assert_eq!(text.line_col(14), (2, 5));
    }

    #[test]
    fn render_underlines_the_offending_token() {
        let source = "x := 1.0;\ny := ;";
        let diag = Diagnostic::error("expected an expression, found ';'", Span::new(15, 16));
        let rendered = SourceText::new(source).render(&diag);
        assert_eq!(
            rendered,
            "error: expected an expression, found ';'\n\
             \x20 --> 2:6\n\
             \x20  | y := ;\n\
             \x20  |      ^"
        );
    }

    #[test]
    fn synthetic_span_renders_the_bare_message() {
        let diag = Diagnostic::error("unexpected end of input", Span::synthetic());
        let rendered = SourceText::new("x := 1.0;").render(&diag);
        assert_eq!(rendered, "error: unexpected end of input");
    }

    #[test]
    fn caret_width_follows_the_span() {
        let source = "jump(3.0);";
        let diag = Diagnostic::error("jump takes no argument", Span::new(5, 8));
        let rendered = SourceText::new(source).render(&diag);
        assert!(rendered.ends_with("   |      ^^^"));
    }
}
