//! Abstract syntax tree.
//!
//! Statements and expressions are separate sum types, so every consumer
//! matches exhaustively and a statement can never sit in operand position.
//!
//! A chain like `1 + 1 + ... + 1` parses into a left-leaning tree as deep as
//! it is long, so nothing here recurses over `Expr`: traversal goes through
//! [`Expr::post_order`], and equality and drop use explicit stacks.

use std::fmt;
use std::mem;

use itertools::{EitherOrBoth, Itertools};

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Assign { name: String, expr: Expr },
    Print(Expr),
}

#[derive(Debug)]
pub enum Expr {
    BinOp {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Num(f64),
    Var(String),
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    /// Nodes in evaluation order: left operand, right operand, operator.
    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder {
            stack: vec![(self, false)],
        }
    }

    /// Compares this node alone, ignoring children.
    fn same_node(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::BinOp { op: a, .. }, Expr::BinOp { op: b, .. }) => a == b,
            (Expr::Num(a), Expr::Num(b)) => a == b,
            (Expr::Var(a), Expr::Var(b)) => a == b,
            _ => false,
        }
    }
}

pub struct PostOrder<'a> {
    stack: Vec<(&'a Expr, bool)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        while let Some((expr, expanded)) = self.stack.pop() {
            match expr {
                Expr::BinOp { lhs, rhs, .. } if !expanded => {
                    self.stack.push((expr, true));
                    self.stack.push((&**rhs, false));
                    self.stack.push((&**lhs, false));
                }
                _ => return Some(expr),
            }
        }
        None
    }
}

// Every node has a fixed arity, so equal post-order sequences mean equal trees.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.post_order()
            .zip_longest(other.post_order())
            .all(|pair| match pair {
                EitherOrBoth::Both(a, b) => a.same_node(b),
                _ => false,
            })
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach_children(&mut expr, &mut pending);
        }
    }
}

fn detach_children(expr: &mut Expr, pending: &mut Vec<Expr>) {
    if let Expr::BinOp { lhs, rhs, .. } = expr {
        pending.push(mem::replace(lhs.as_mut(), Expr::Num(0.0)));
        pending.push(mem::replace(rhs.as_mut(), Expr::Num(0.0)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Renders a literal the way the reports show it: shortest round-trip
/// digits, a `.0` on integral values, and a signed two-digit exponent
/// (`1e+16`, `1e-05`) outside `[1e-4, 1e16)`.
pub fn format_number(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
