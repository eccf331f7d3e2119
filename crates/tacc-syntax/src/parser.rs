//! Recursive-descent parser, one method per production:
//!
//! ```text
//! Program       -> StatementList EOF
//! StatementList -> (NEWLINE)* Statement (NEWLINE+ Statement)* (NEWLINE)*
//! Statement     -> ID '=' Expression | PRINT '(' Expression ')'
//! Expression    -> Term (('+' | '-') Term)*
//! Term          -> Factor (('*' | '/') Factor)*
//! Factor        -> NUM | ID | '(' Expression ')'
//! ```
//!
//! Single-token lookahead, no backtracking. The first mismatch aborts.
//! Operator chains are built in loops; only parentheses recurse, and their
//! depth is capped at [`MAX_NESTING`].

use tracing::debug;

use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::SyntaxError;
use crate::kind::SyntaxKind;
use crate::lexer::Token;

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest parenthesis nesting accepted inside one expression.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'t> {
    /// Everything before the trailing `Eof`.
    tokens: &'t [Token],
    eof: &'t Token,
    pos: usize,
    nesting: usize,
}

impl<'t> Parser<'t> {
    /// `tokens` must end with `Eof`, as produced by [`crate::lexer::lex`].
    pub fn new(tokens: &'t [Token]) -> ParseResult<Self> {
        match tokens.split_last() {
            Some((eof, rest)) if eof.kind == SyntaxKind::Eof => Ok(Parser {
                tokens: rest,
                eof,
                pos: 0,
                nesting: 0,
            }),
            _ => Err(SyntaxError::missing_eof(tokens.last())),
        }
    }

    fn current(&self) -> &'t Token {
        // Past the end we keep answering with the trailing Eof.
        self.tokens.get(self.pos).unwrap_or(self.eof)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().kind == kind
    }

    fn eat(&mut self, kind: SyntaxKind) -> ParseResult<&'t Token> {
        let tok = self.current();
        if tok.kind != kind {
            return Err(SyntaxError::mismatch(kind, tok));
        }
        self.pos += 1;
        Ok(tok)
    }

    fn skip_newlines(&mut self) {
        while self.at(SyntaxKind::NewLine) {
            self.pos += 1;
        }
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let statements = self.parse_statement_list()?;
        if !self.at(SyntaxKind::Eof) {
            return Err(SyntaxError::extra_input(self.current()));
        }
        Ok(Program { statements })
    }

    fn parse_statement_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while self.current().kind.starts_statement() {
            statements.push(self.parse_statement()?);
            if !self.at(SyntaxKind::NewLine) {
                break;
            }
            self.skip_newlines();
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let tok = self.current();
        match tok.kind {
            SyntaxKind::Ident => {
                let name = self.eat(SyntaxKind::Ident)?.text.clone();
                self.eat(SyntaxKind::Equal)?;
                let expr = self.parse_expression()?;
                Ok(Stmt::Assign { name, expr })
            }
            SyntaxKind::Print => {
                self.eat(SyntaxKind::Print)?;
                self.eat(SyntaxKind::LParen)?;
                let expr = self.parse_expression()?;
                self.eat(SyntaxKind::RParen)?;
                Ok(Stmt::Print(expr))
            }
            _ => Err(SyntaxError::unexpected_statement(tok)),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                SyntaxKind::Plus => BinaryOp::Add,
                SyntaxKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            node = Expr::binary(op, node, rhs);
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut node = self.parse_factor()?;
        loop {
            let op = match self.current().kind {
                SyntaxKind::Star => BinaryOp::Mul,
                SyntaxKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_factor()?;
            node = Expr::binary(op, node, rhs);
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let tok = self.current();
        match (tok.kind, tok.value()) {
            (SyntaxKind::Num, Some(value)) => {
                self.pos += 1;
                Ok(Expr::Num(value))
            }
            (SyntaxKind::Ident, _) => {
                self.pos += 1;
                Ok(Expr::var(tok.text.clone()))
            }
            (SyntaxKind::LParen, _) => {
                if self.nesting == MAX_NESTING {
                    return Err(SyntaxError::too_deep(MAX_NESTING, tok));
                }
                self.pos += 1;
                self.nesting += 1;
                let expr = self.parse_expression()?;
                self.nesting -= 1;
                self.eat(SyntaxKind::RParen)?;
                Ok(expr)
            }
            _ => Err(SyntaxError::unexpected_factor(tok)),
        }
    }
}

/// Parses a full token stream into a [`Program`].
pub fn parse(tokens: &[Token]) -> Result<Program, SyntaxError> {
    let program = Parser::new(tokens)?.parse_program()?;
    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}
