use worms_ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Double(f64),

    // Identifier
    Ident(String),

    // Reserved keywords
    If,
    Else,
    While,
    Foreach,
    Proc,
    Print,
    Skip,
    Turn,
    Move,
    Jump,
    Fire,
    Eat,
    True,
    False,
    Null,
    SelfKw,
    Worm,
    Food,
    Projectile,
    Any,

    // Punctuation
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Comma,  // ,
    Semi,   // ;

    // Operators
    Assign,   // :=
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Bang,     // !
    EqEq,     // ==
    BangEq,   // !=
    Lt,       // <
    Gt,       // >
    LtEq,     // <=
    GtEq,     // >=
    AmpAmp,   // &&
    PipePipe, // ||

    Eof,

    // Invalid input; the parser surfaces these as lex errors.
    Error(String),
}

impl TokenKind {
    /// Human-readable name for "expected X, found Y" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Double(v) => format!("number {}", v),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::If => "'if'".into(),
            TokenKind::Else => "'else'".into(),
            TokenKind::While => "'while'".into(),
            TokenKind::Foreach => "'foreach'".into(),
            TokenKind::Proc => "'proc'".into(),
            TokenKind::Print => "'print'".into(),
            TokenKind::Skip => "'skip'".into(),
            TokenKind::Turn => "'turn'".into(),
            TokenKind::Move => "'move'".into(),
            TokenKind::Jump => "'jump'".into(),
            TokenKind::Fire => "'fire'".into(),
            TokenKind::Eat => "'eat'".into(),
            TokenKind::True => "'true'".into(),
            TokenKind::False => "'false'".into(),
            TokenKind::Null => "'null'".into(),
            TokenKind::SelfKw => "'self'".into(),
            TokenKind::Worm => "'worm'".into(),
            TokenKind::Food => "'food'".into(),
            TokenKind::Projectile => "'projectile'".into(),
            TokenKind::Any => "'any'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Semi => "';'".into(),
            TokenKind::Assign => "':='".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Bang => "'!'".into(),
            TokenKind::EqEq => "'=='".into(),
            TokenKind::BangEq => "'!='".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::LtEq => "'<='".into(),
            TokenKind::GtEq => "'>='".into(),
            TokenKind::AmpAmp => "'&&'".into(),
            TokenKind::PipePipe => "'||'".into(),
            TokenKind::Eof => "end of input".into(),
            TokenKind::Error(msg) => format!("invalid input ({})", msg),
        }
    }
}
