use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use crate::ast::{Expr, Program, Stmt};

/// The only type in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolType {
    #[default]
    Num,
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolType::Num => f.write_str("num"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Symbol {
    pub ty: SymbolType,
    /// Assignment targets plus read references.
    pub occurrences: usize,
}

/// Names are declared implicitly on first mention; nothing is ever removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn build(program: &Program) -> Self {
        let mut table = SymbolTable::default();
        for stmt in &program.statements {
            table.visit_stmt(stmt);
        }
        debug!(symbols = table.len(), "built symbol table");
        table
    }

    fn mention(&mut self, name: &str) {
        match self.entries.get_mut(name) {
            Some(symbol) => symbol.occurrences += 1,
            None => {
                self.entries.insert(
                    name.to_string(),
                    Symbol {
                        ty: SymbolType::Num,
                        occurrences: 1,
                    },
                );
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { name, expr } => {
                self.mention(name);
                self.visit_expr(expr);
            }
            Stmt::Print(expr) => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        for node in expr.post_order() {
            match node {
                Expr::Var(name) => self.mention(name),
                Expr::BinOp { .. } | Expr::Num(_) => {}
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic order of name.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.entries
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(name, symbol)| (name.as_str(), symbol))
    }
}
