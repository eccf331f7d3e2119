use std::iter::Peekable;
use std::str::CharIndices;

use miette::SourceSpan;
use tracing::debug;

use crate::error::LexicalError;
use crate::kind::SyntaxKind;

/// 1-based line and column of a token's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Position { line, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: String,
    /// Parsed value; set on every `Num` token and on nothing else. Private so
    /// that tokens only come out of [`lex`].
    value: Option<f64>,
    pub pos: Position,
    /// Byte offset into the source, for diagnostics.
    pub offset: usize,
}

impl Token {
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn span(&self) -> SourceSpan {
        (self.offset, self.text.len()).into()
    }
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            col: 1,
            tokens: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let (offset, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some((offset, ch))
    }

    /// Consumes characters while `pred` holds; returns the end byte offset.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, c)) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn push(&mut self, kind: SyntaxKind, start: usize, end: usize, pos: Position) {
        self.tokens.push(Token {
            kind,
            text: self.source[start..end].to_string(),
            value: None,
            pos,
            offset: start,
        });
    }

    fn number(&mut self, start: usize, pos: Position) -> Result<(), LexicalError> {
        let end = self.eat_while(|c| c.is_ascii_digit() || c == '.');
        let text = &self.source[start..end];
        let value = text
            .parse::<f64>()
            .map_err(|_| LexicalError::MalformedNumber {
                text: text.to_string(),
                line: pos.line,
                col: pos.col,
                span: (start, end - start).into(),
            })?;
        self.tokens.push(Token {
            kind: SyntaxKind::Num,
            text: text.to_string(),
            value: Some(value),
            pos,
            offset: start,
        });
        Ok(())
    }

    fn ident(&mut self, start: usize, pos: Position) {
        let end = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = SyntaxKind::keyword(&self.source[start..end]).unwrap_or(SyntaxKind::Ident);
        self.push(kind, start, end, pos);
    }

    fn run(mut self) -> Result<Vec<Token>, LexicalError> {
        while let Some(&(start, ch)) = self.chars.peek() {
            let pos = Position::new(self.line, self.col);
            match ch {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' => {
                    self.bump();
                    self.push(SyntaxKind::NewLine, start, start + 1, pos);
                }
                c if c.is_ascii_digit() => self.number(start, pos)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.ident(start, pos),
                c => {
                    let Some(kind) = SyntaxKind::punct(c) else {
                        return Err(LexicalError::IllegalChar {
                            ch: c,
                            line: pos.line,
                            col: pos.col,
                            span: (start, c.len_utf8()).into(),
                        });
                    };
                    self.bump();
                    self.push(kind, start, start + 1, pos);
                }
            }
        }

        let eof = Position::new(self.line, self.col);
        let end = self.source.len();
        self.push(SyntaxKind::Eof, end, end, eof);
        Ok(self.tokens)
    }
}

/// Splits `source` into tokens, ending with exactly one `Eof`.
///
/// Spaces, tabs and carriage returns are dropped; a line feed becomes a
/// `NewLine` token. The first character outside every token class aborts
/// the scan.
pub fn lex(source: &str) -> Result<Vec<Token>, LexicalError> {
    let tokens = Lexer::new(source).run()?;
    debug!(count = tokens.len(), "lexed source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn assignment_line() {
        let tokens = lex("x = 3 + 4\n").unwrap();
        let summary: Vec<_> = tokens
            .iter()
            .map(|t| (t.kind, t.value, t.pos.line, t.pos.col))
            .collect();
        assert_eq!(
            summary,
            vec![
                (SyntaxKind::Ident, None, 1, 1),
                (SyntaxKind::Equal, None, 1, 3),
                (SyntaxKind::Num, Some(3.0), 1, 5),
                (SyntaxKind::Plus, None, 1, 7),
                (SyntaxKind::Num, Some(4.0), 1, 9),
                (SyntaxKind::NewLine, None, 1, 10),
                (SyntaxKind::Eof, None, 2, 1),
            ]
        );
        assert_eq!(tokens[0].text, "x");
    }

    #[test]
    fn print_is_reserved() {
        let tokens = lex("print printer _print").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::Print);
        assert_eq!(tokens[1].kind, SyntaxKind::Ident);
        assert_eq!(tokens[1].text, "printer");
        assert_eq!(tokens[2].kind, SyntaxKind::Ident);
        assert_eq!(tokens[2].text, "_print");
    }

    #[test]
    fn punctuators() {
        assert_eq!(
            kinds("=+-*/()"),
            vec![
                SyntaxKind::Equal,
                SyntaxKind::Plus,
                SyntaxKind::Minus,
                SyntaxKind::Star,
                SyntaxKind::Slash,
                SyntaxKind::LParen,
                SyntaxKind::RParen,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn whitespace_produces_nothing() {
        assert_eq!(kinds(" \t\r "), vec![SyntaxKind::Eof]);
        assert_eq!(kinds(""), vec![SyntaxKind::Eof]);
    }

    #[test]
    fn decimals_and_identifier_digits() {
        let tokens = lex("a1_b = 2.5").unwrap();
        assert_eq!(tokens[0].text, "a1_b");
        assert_eq!(tokens[2].value, Some(2.5));
        assert_eq!(tokens[2].text, "2.5");
    }

    #[test]
    fn number_followed_by_letters_splits() {
        let tokens = lex("12ab").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::Num);
        assert_eq!(tokens[1].kind, SyntaxKind::Ident);
        assert_eq!(tokens[1].pos, Position::new(1, 3));
    }

    #[test]
    fn illegal_char_position() {
        let err = lex("x = 1\ny = $\n").unwrap_err();
        match err {
            LexicalError::IllegalChar { ch, line, col, .. } => {
                assert_eq!(ch, '$');
                assert_eq!((line, col), (2, 5));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_ascii_is_illegal() {
        let err = lex("é = 1").unwrap_err();
        assert_eq!(err.position(), Position::new(1, 1));
    }

    #[test]
    fn multiple_dots_rejected() {
        let err = lex("x = 1.2.3").unwrap_err();
        match err {
            LexicalError::MalformedNumber { text, line, col, .. } => {
                assert_eq!(text, "1.2.3");
                assert_eq!((line, col), (1, 5));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_dot_is_a_number() {
        let tokens = lex("7.").unwrap();
        assert_eq!(tokens[0].value, Some(7.0));
    }
}
