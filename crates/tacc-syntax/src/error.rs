//! Diagnostics for the two ways a compile can fail.
//!
//! Both error kinds are fatal: the pipeline stops at the first one and
//! returns no partial result. Every variant carries a [`SourceSpan`] so the
//! driver can point at the offending text.

use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::kind::SyntaxKind;
use crate::lexer::{Position, Token};

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum LexicalError {
    #[error("illegal character {ch:?} at line {line}, column {col}")]
    #[diagnostic(code(tacc::lex::illegal_char))]
    IllegalChar {
        ch: char,
        line: usize,
        col: usize,
        #[label("not part of any token")]
        span: SourceSpan,
    },

    #[error("malformed number {text:?} at line {line}, column {col}")]
    #[diagnostic(
        code(tacc::lex::malformed_number),
        help("a number takes at most one decimal point")
    )]
    MalformedNumber {
        text: String,
        line: usize,
        col: usize,
        #[label("not a valid number")]
        span: SourceSpan,
    },
}

impl LexicalError {
    pub fn position(&self) -> Position {
        match *self {
            LexicalError::IllegalChar { line, col, .. }
            | LexicalError::MalformedNumber { line, col, .. } => Position { line, col },
        }
    }
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Kind(SyntaxKind),
    Factor,
    Statement,
    /// Parentheses nested no deeper than this.
    NestingAtMost(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "{kind}"),
            Expected::Factor => f.write_str("a factor (NUM, ID or '(')"),
            Expected::Statement => f.write_str("a statement (ID or PRINT)"),
            Expected::NestingAtMost(limit) => write!(f, "at most {limit} nested parentheses"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} (line {line}, column {col})")]
    #[diagnostic(code(tacc::parse::expected))]
    Expected {
        expected: SyntaxKind,
        found: SyntaxKind,
        line: usize,
        col: usize,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected factor {found} (line {line}, column {col})")]
    #[diagnostic(
        code(tacc::parse::unexpected_factor),
        help("an operand is a number, a name or a parenthesised expression")
    )]
    UnexpectedFactor {
        found: SyntaxKind,
        line: usize,
        col: usize,
        #[label("expected a factor here")]
        span: SourceSpan,
    },

    #[error("unexpected start of statement {found} (line {line}, column {col})")]
    #[diagnostic(code(tacc::parse::unexpected_statement))]
    UnexpectedStatement {
        found: SyntaxKind,
        line: usize,
        col: usize,
        #[label("a statement starts with a name or `print`")]
        span: SourceSpan,
    },

    #[error("extra input after end of program: found {found} (line {line}, column {col})")]
    #[diagnostic(code(tacc::parse::extra_input))]
    ExtraInput {
        found: SyntaxKind,
        line: usize,
        col: usize,
        #[label("expected a new line or end of input")]
        span: SourceSpan,
    },

    #[error("parentheses nested deeper than {limit} (line {line}, column {col})")]
    #[diagnostic(
        code(tacc::parse::too_deep),
        help("split the expression across assignments")
    )]
    TooDeep {
        limit: usize,
        line: usize,
        col: usize,
        #[label("one level too deep")]
        span: SourceSpan,
    },

    /// The token slice handed to the parser does not end with `Eof`.
    #[error("token stream does not end with EOF")]
    #[diagnostic(code(tacc::parse::missing_eof))]
    MissingEof {
        last: Option<SyntaxKind>,
        line: usize,
        col: usize,
    },
}

impl SyntaxError {
    pub(crate) fn mismatch(expected: SyntaxKind, tok: &Token) -> Self {
        SyntaxError::Expected {
            expected,
            found: tok.kind,
            line: tok.pos.line,
            col: tok.pos.col,
            span: tok.span(),
        }
    }

    pub(crate) fn unexpected_factor(tok: &Token) -> Self {
        SyntaxError::UnexpectedFactor {
            found: tok.kind,
            line: tok.pos.line,
            col: tok.pos.col,
            span: tok.span(),
        }
    }

    pub(crate) fn unexpected_statement(tok: &Token) -> Self {
        SyntaxError::UnexpectedStatement {
            found: tok.kind,
            line: tok.pos.line,
            col: tok.pos.col,
            span: tok.span(),
        }
    }

    pub(crate) fn extra_input(tok: &Token) -> Self {
        SyntaxError::ExtraInput {
            found: tok.kind,
            line: tok.pos.line,
            col: tok.pos.col,
            span: tok.span(),
        }
    }

    pub(crate) fn too_deep(limit: usize, tok: &Token) -> Self {
        SyntaxError::TooDeep {
            limit,
            line: tok.pos.line,
            col: tok.pos.col,
            span: tok.span(),
        }
    }

    pub(crate) fn missing_eof(last: Option<&Token>) -> Self {
        let pos = last.map_or(Position { line: 1, col: 1 }, |tok| tok.pos);
        SyntaxError::MissingEof {
            last: last.map(|tok| tok.kind),
            line: pos.line,
            col: pos.col,
        }
    }

    pub fn expected(&self) -> Expected {
        match *self {
            SyntaxError::Expected { expected, .. } => Expected::Kind(expected),
            SyntaxError::UnexpectedFactor { .. } => Expected::Factor,
            SyntaxError::UnexpectedStatement { .. } => Expected::Statement,
            SyntaxError::ExtraInput { .. } | SyntaxError::MissingEof { .. } => {
                Expected::Kind(SyntaxKind::Eof)
            }
            SyntaxError::TooDeep { limit, .. } => Expected::NestingAtMost(limit),
        }
    }

    /// The offending token's kind; `None` only for an empty token slice.
    pub fn found(&self) -> Option<SyntaxKind> {
        match *self {
            SyntaxError::Expected { found, .. }
            | SyntaxError::UnexpectedFactor { found, .. }
            | SyntaxError::UnexpectedStatement { found, .. }
            | SyntaxError::ExtraInput { found, .. } => Some(found),
            SyntaxError::TooDeep { .. } => Some(SyntaxKind::LParen),
            SyntaxError::MissingEof { last, .. } => last,
        }
    }

    pub fn position(&self) -> Position {
        match *self {
            SyntaxError::Expected { line, col, .. }
            | SyntaxError::UnexpectedFactor { line, col, .. }
            | SyntaxError::UnexpectedStatement { line, col, .. }
            | SyntaxError::ExtraInput { line, col, .. }
            | SyntaxError::TooDeep { line, col, .. }
            | SyntaxError::MissingEof { line, col, .. } => Position { line, col },
        }
    }
}
