use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Ident,
    Num,
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    NewLine,
    Eof,
    Print,
}

impl SyntaxKind {
    /// Kind for a single-character punctuator, if `ch` is one.
    pub fn punct(ch: char) -> Option<Self> {
        let kind = match ch {
            '=' => SyntaxKind::Equal,
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '*' => SyntaxKind::Star,
            '/' => SyntaxKind::Slash,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            _ => return None,
        };
        Some(kind)
    }

    /// Reserved words share the identifier character class.
    pub fn keyword(ident: &str) -> Option<Self> {
        match ident {
            "print" => Some(SyntaxKind::Print),
            _ => None,
        }
    }

    pub fn starts_statement(self) -> bool {
        matches!(self, SyntaxKind::Ident | SyntaxKind::Print)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyntaxKind::Ident => "ID",
            SyntaxKind::Num => "NUM",
            SyntaxKind::Equal => "=",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::NewLine => "NEWLINE",
            SyntaxKind::Eof => "EOF",
            SyntaxKind::Print => "PRINT",
        };
        f.write_str(s)
    }
}
