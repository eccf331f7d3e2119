//! Text renderings of the pipeline's outputs.

use itertools::Itertools;

use crate::ast::{Expr, Program, Stmt, format_number};
use crate::symbols::SymbolTable;
use crate::tac::Tac;

pub const GRAMMAR: &str = "\
Program        -> StatementList EOF

StatementList  -> (NEWLINE)* Statement (NEWLINE+ Statement)* (NEWLINE)*

Statement      -> ID '=' Expression
                | 'print' '(' Expression ')'

Expression     -> Term (('+' | '-') Term)*

Term           -> Factor (('*' | '/') Factor)*

Factor         -> NUM
                | ID
                | '(' Expression ')'
";

const INDENT: &str = "  ";

/// One line per node, children two spaces deeper than their parent.
pub fn render_ast(program: &Program) -> String {
    let mut out = String::from("Program\n");
    for stmt in &program.statements {
        render_stmt(&mut out, stmt, 1);
    }
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

fn render_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match stmt {
        Stmt::Assign { name, expr } => {
            line(out, depth, &format!("Assign(name={name})"));
            render_expr(out, expr, depth + 1);
        }
        Stmt::Print(expr) => {
            line(out, depth, "Print");
            render_expr(out, expr, depth + 1);
        }
    }
}

/// Pre-order over an explicit stack; the right operand is pushed first so
/// the left one prints first.
fn render_expr(out: &mut String, expr: &Expr, depth: usize) {
    let mut stack = vec![(expr, depth)];
    while let Some((expr, depth)) = stack.pop() {
        match expr {
            Expr::BinOp { op, lhs, rhs } => {
                line(out, depth, &format!("BinOp(op={op})"));
                stack.push((&**rhs, depth + 1));
                stack.push((&**lhs, depth + 1));
            }
            Expr::Num(value) => line(out, depth, &format!("Num({})", format_number(*value))),
            Expr::Var(name) => line(out, depth, &format!("Var({name})")),
        }
    }
}

/// Grammar text, a blank separator, then the AST.
pub fn grammar_report(program: &Program) -> String {
    format!(
        "== Grammar ==\n{GRAMMAR}\n== AST ==\n{}",
        render_ast(program)
    )
}

pub fn symbol_report(table: &SymbolTable) -> String {
    let rows = table
        .iter_sorted()
        .map(|(name, symbol)| {
            format!(
                "{name:<10} tipo={} ocurrencias={}",
                symbol.ty, symbol.occurrences
            )
        })
        .join("\n");
    if rows.is_empty() {
        "== Symbol table ==\n".to_string()
    } else {
        format!("== Symbol table ==\n{rows}\n")
    }
}

pub fn tac_report(tac: &Tac) -> String {
    std::iter::once("== Three-address code ==".to_string())
        .chain(tac.code.iter().map(ToString::to_string))
        .map(|l| l + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::lex, parser::parse, symbols::SymbolTable, tac::generate};

    fn program(source: &str) -> Program {
        parse(&lex(source).unwrap()).unwrap()
    }

    #[test]
    fn ast_is_indented_by_depth() {
        let rendered = render_ast(&program("x = 1 + y\nprint(x)\n"));
        assert_eq!(
            rendered,
            "Program\n  Assign(name=x)\n    BinOp(op=+)\n      Num(1.0)\n      Var(y)\n  Print\n    Var(x)\n"
        );
    }

    #[test]
    fn long_chain_renders_every_node() {
        let source = format!("x = {}\n", vec!["1"; 5_000].join(" * "));
        let rendered = render_ast(&program(&source));
        let lines: Vec<&str> = rendered.lines().collect();
        // Program, Assign, 4999 operators and 5000 literals.
        assert_eq!(lines.len(), 2 + 4_999 + 5_000);
        assert_eq!(lines[2], "    BinOp(op=*)");
        assert_eq!(lines.last(), Some(&"      Num(1.0)"));
    }

    #[test]
    fn exponent_literals_in_ast() {
        let rendered = render_ast(&program("print(100000000000000000000)\n"));
        assert_eq!(rendered, "Program\n  Print\n    Num(1e+20)\n");
    }

    #[test]
    fn grammar_report_layout() {
        let report = grammar_report(&program("a = 2\n"));
        assert!(report.starts_with("== Grammar ==\nProgram "));
        assert!(report.contains("'(' Expression ')'\n\n== AST ==\nProgram\n"));
        assert!(report.ends_with("  Assign(name=a)\n    Num(2.0)\n"));
    }

    #[test]
    fn symbol_rows_are_padded_and_sorted() {
        let table = SymbolTable::build(&program("b = 1\na = b + b\n"));
        assert_eq!(
            symbol_report(&table),
            "== Symbol table ==\n\
             a          tipo=num ocurrencias=1\n\
             b          tipo=num ocurrencias=3\n"
        );
    }

    #[test]
    fn empty_symbol_table() {
        let table = SymbolTable::build(&program("print(1)\n"));
        assert_eq!(symbol_report(&table), "== Symbol table ==\n");
    }

    #[test]
    fn tac_one_instruction_per_line() {
        let tac = generate(&program("a = 1\nprint(a)\n"));
        assert_eq!(
            tac_report(&tac),
            "== Three-address code ==\nt1 = 1.0\na = t1\nprint a\n"
        );
    }
}
