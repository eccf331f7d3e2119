//! Lowering to three-address code.
//!
//! A naive post-order walk: every literal and every operator result gets a
//! fresh temporary, variables are their own place, and temporaries are never
//! reused.

use std::fmt;

use tracing::{debug, trace};

use crate::ast::{BinaryOp, Expr, Program, Stmt, format_number};

/// Where a value lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    Temp(u32),
    Var(String),
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Temp(n) => write!(f, "t{n}"),
            Place::Var(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// `tN = v`
    Load { dest: u32, value: f64 },
    /// `tN = a op b`
    Binary {
        dest: u32,
        op: BinaryOp,
        lhs: Place,
        rhs: Place,
    },
    /// `name = place`
    Copy { name: String, src: Place },
    /// `print place`
    Print(Place),
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Load { dest, value } => {
                write!(f, "{} = {}", Place::Temp(*dest), format_number(*value))
            }
            Instr::Binary { dest, op, lhs, rhs } => {
                write!(f, "{} = {lhs} {op} {rhs}", Place::Temp(*dest))
            }
            Instr::Copy { name, src } => write!(f, "{name} = {src}"),
            Instr::Print(place) => write!(f, "print {place}"),
        }
    }
}

/// Generated code plus the final temporary counter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tac {
    pub code: Vec<Instr>,
    pub temps: u32,
}

/// Owns the counter and the output for one run; temporaries start at `t1`.
#[derive(Debug, Default)]
pub struct TacGenerator {
    temps: u32,
    code: Vec<Instr>,
}

impl TacGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_temp(&mut self) -> u32 {
        self.temps += 1;
        trace!(temp = self.temps, "allocated temporary");
        self.temps
    }

    pub fn generate(mut self, program: &Program) -> Tac {
        for stmt in &program.statements {
            self.gen_stmt(stmt);
        }
        debug!(
            instructions = self.code.len(),
            temps = self.temps,
            "generated three-address code"
        );
        Tac {
            code: self.code,
            temps: self.temps,
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { name, expr } => {
                let src = self.gen_expr(expr);
                self.code.push(Instr::Copy {
                    name: name.clone(),
                    src,
                });
            }
            Stmt::Print(expr) => {
                let place = self.gen_expr(expr);
                self.code.push(Instr::Print(place));
            }
        }
    }

    /// Lowers `expr` with an explicit stack of operand places, so long
    /// operator chains cost heap rather than call depth.
    fn gen_expr(&mut self, expr: &Expr) -> Place {
        let mut places: Vec<Place> = Vec::new();
        for node in expr.post_order() {
            let place = match node {
                Expr::Num(value) => {
                    let dest = self.new_temp();
                    self.code.push(Instr::Load {
                        dest,
                        value: *value,
                    });
                    Place::Temp(dest)
                }
                Expr::Var(name) => Place::Var(name.clone()),
                Expr::BinOp { op, .. } => {
                    let (Some(rhs), Some(lhs)) = (places.pop(), places.pop()) else {
                        unreachable!("post-order yields both operands before their operator");
                    };
                    let dest = self.new_temp();
                    self.code.push(Instr::Binary {
                        dest,
                        op: *op,
                        lhs,
                        rhs,
                    });
                    Place::Temp(dest)
                }
            };
            places.push(place);
        }
        match places.pop() {
            Some(place) if places.is_empty() => place,
            _ => unreachable!("an expression lowers to exactly one place"),
        }
    }
}

pub fn generate(program: &Program) -> Tac {
    TacGenerator::new().generate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::lex, parser::parse};

    fn lines(source: &str) -> Vec<String> {
        let program = parse(&lex(source).unwrap()).unwrap();
        generate(&program)
            .code
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn assign_and_print() {
        assert_eq!(lines("a = 1\nprint(a)\n"), vec!["t1 = 1.0", "a = t1", "print a"]);
    }

    #[test]
    fn operands_left_before_right() {
        assert_eq!(
            lines("x = 2 * y + 3.5\n"),
            vec!["t1 = 2.0", "t2 = t1 * y", "t3 = 3.5", "t4 = t2 + t3", "x = t4"]
        );
    }

    #[test]
    fn variables_are_not_copied_into_temps() {
        assert_eq!(lines("b = a\nprint(b)\n"), vec!["b = a", "print b"]);
    }

    #[test]
    fn right_nested_tree() {
        assert_eq!(
            lines("print(1 + 2 * 3)\n"),
            vec![
                "t1 = 1.0",
                "t2 = 2.0",
                "t3 = 3.0",
                "t4 = t2 * t3",
                "t5 = t1 + t4",
                "print t5"
            ]
        );
    }

    #[test]
    fn large_and_small_literals_use_signed_exponents() {
        assert_eq!(
            lines("x = 10000000000000000\ny = 0.00001\n"),
            vec!["t1 = 1e+16", "x = t1", "t2 = 1e-05", "y = t2"]
        );
    }

    #[test]
    fn ten_thousand_term_chain() {
        let source = format!("x = {}\n", vec!["1"; 10_000].join(" + "));
        let program = parse(&lex(&source).unwrap()).unwrap();
        let tac = generate(&program);
        // One load per literal plus one add per operator.
        assert_eq!(tac.temps, 19_999);
        assert_eq!(tac.code.len(), 20_000);
        assert_eq!(tac.code[2].to_string(), "t3 = t1 + t2");
        assert_eq!(tac.code.last().unwrap().to_string(), "x = t19999");
    }

    #[test]
    fn counter_is_reported_and_fresh_per_run() {
        let program = parse(&lex("x = 1 - 2\ny = x / 4\n").unwrap()).unwrap();
        let first = generate(&program);
        let second = generate(&program);
        assert_eq!(first.temps, 5);
        assert_eq!(first, second);
        assert_eq!(first.code[0], Instr::Load { dest: 1, value: 1.0 });
    }
}
