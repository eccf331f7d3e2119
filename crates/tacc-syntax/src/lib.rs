//! Front end for a tiny assignment/print language.
//!
//! The pipeline is strictly linear: text is lexed into tokens, parsed into a
//! [`Program`], and the program is then walked twice, once for the
//! [`SymbolTable`] and once for three-address code. Each run owns all of its
//! state, so separate inputs can be analysed independently.

pub mod ast;
pub mod error;
pub mod kind;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod symbols;
pub mod tac;

pub use ast::{BinaryOp, Expr, Program, Stmt};
pub use error::{Error, Expected, LexicalError, SyntaxError};
pub use kind::SyntaxKind;
pub use lexer::{Position, Token, lex};
pub use parser::parse;
pub use symbols::{Symbol, SymbolTable, SymbolType};
pub use tac::{Instr, Place, Tac, TacGenerator};

/// Everything a successful run produces.
#[derive(Debug, PartialEq)]
pub struct Analysis {
    pub program: Program,
    pub symbols: SymbolTable,
    pub tac: Tac,
}

impl Analysis {
    pub fn grammar_report(&self) -> String {
        report::grammar_report(&self.program)
    }

    pub fn symbol_report(&self) -> String {
        report::symbol_report(&self.symbols)
    }

    pub fn tac_report(&self) -> String {
        report::tac_report(&self.tac)
    }
}

/// Runs every stage over `source`, stopping at the first lexical or
/// syntax error.
pub fn analyze(source: &str) -> Result<Analysis, Error> {
    let tokens = lex(source)?;
    let program = parse(&tokens)?;
    let symbols = SymbolTable::build(&program);
    let tac = tac::generate(&program);
    Ok(Analysis {
        program,
        symbols,
        tac,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_errors_surface_through_analyze() {
        let err = analyze("x = 1 $ 2\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Lexical(LexicalError::IllegalChar { ch: '$', .. })
        ));
    }

    #[test]
    fn syntax_errors_surface_through_analyze() {
        let err = analyze("print 1\n").unwrap_err();
        let Error::Syntax(err) = err else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.expected(), Expected::Kind(SyntaxKind::LParen));
        assert_eq!(err.found(), Some(SyntaxKind::Num));
    }

    #[test]
    fn reports_from_one_run() {
        let analysis = analyze("a = 1\nprint(a)\n").unwrap();
        assert_eq!(
            analysis.tac_report(),
            "== Three-address code ==\nt1 = 1.0\na = t1\nprint a\n"
        );
        assert_eq!(
            analysis.symbol_report(),
            "== Symbol table ==\na          tipo=num ocurrencias=2\n"
        );
        assert!(analysis.grammar_report().contains("== AST ==\nProgram\n"));
    }
}
