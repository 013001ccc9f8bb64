use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use super::{
    error::GrammarConflictError,
    first_follow::{FirstSets, FollowSets},
    Grammar, Symbol,
};

/// Points at one alternative of one production of the grammar the table was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableEntry {
    pub production: usize,
    pub alternative: usize,
}

/// A cell that was written twice. The replacement is what the table keeps.
/// `existing` and `replacement` are equal when a nullable alternative is
/// predicted through both FIRST and FOLLOW on the same lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: usize,
    pub lookahead: Symbol,
    pub existing: TableEntry,
    pub replacement: TableEntry,
}

impl Conflict {
    pub fn to_error(&self, g: &Grammar) -> GrammarConflictError {
        GrammarConflictError {
            non_terminal: g.get_symbol_name(Symbol::NonTerminal(self.non_terminal)).to_string(),
            lookahead: g.get_symbol_name(self.lookahead).to_string(),
            existing: g.entry_to_string(self.existing),
            replacement: g.entry_to_string(self.replacement),
        }
    }
}

/// Rows are nonterminals, columns are the terminals followed by `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1ParsingTable {
    rows: Vec<usize>,
    columns: Vec<Symbol>,
    row_index: HashMap<usize, usize>,
    column_index: HashMap<Symbol, usize>,
    cells: Vec<Vec<Option<TableEntry>>>,
    conflicts: Vec<Conflict>,
}

impl LL1ParsingTable {
    fn new(g: &Grammar) -> Self {
        let rows: Vec<usize> = g.non_terminals().to_vec();
        let columns: Vec<Symbol> = g
            .terminals()
            .iter()
            .map(|&t| Symbol::Terminal(t))
            .chain(std::iter::once(Symbol::EndMarker))
            .collect();
        Self {
            row_index: rows.iter().enumerate().map(|(i, &nt)| (nt, i)).collect(),
            column_index: columns.iter().enumerate().map(|(i, &t)| (t, i)).collect(),
            cells: vec![vec![None; columns.len()]; rows.len()],
            rows,
            columns,
            conflicts: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn columns(&self) -> &[Symbol] {
        &self.columns
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn get(&self, non_terminal: usize, lookahead: Symbol) -> Option<TableEntry> {
        let row = *self.row_index.get(&non_terminal)?;
        let col = *self.column_index.get(&lookahead)?;
        self.cells[row][col]
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<TableEntry> {
        self.cells[row][col]
    }

    fn set(&mut self, non_terminal: usize, lookahead: Symbol, entry: TableEntry) {
        let (row, col) = match (
            self.row_index.get(&non_terminal),
            self.column_index.get(&lookahead),
        ) {
            (Some(&row), Some(&col)) => (row, col),
            _ => return,
        };
        // any write to an occupied cell counts, even with the same entry
        if let Some(existing) = self.cells[row][col] {
            self.conflicts.push(Conflict {
                non_terminal,
                lookahead,
                existing,
                replacement: entry,
            });
        }
        self.cells[row][col] = Some(entry);
    }
}

impl Grammar {
    pub fn alternative_of(&self, entry: TableEntry) -> &[Symbol] {
        &self.productions[entry.production].alternatives[entry.alternative]
    }

    pub fn entry_to_string(&self, entry: TableEntry) -> String {
        let production = &self.productions[entry.production];
        format!(
            "{} -> {}",
            self.get_symbol_name(Symbol::NonTerminal(production.left)),
            self.alternative_to_vec_str(self.alternative_of(entry)).join(" ")
        )
    }

    /// Builds the prediction table. Conflicting cells keep the last alternative
    /// written and are reported through [`LL1ParsingTable::conflicts`].
    pub fn generate_ll1_parsing_table(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> LL1ParsingTable {
        let mut table = LL1ParsingTable::new(self);

        for (production_idx, production) in self.productions.iter().enumerate() {
            let left = production.left;
            for (alternative_idx, alternative) in production.alternatives.iter().enumerate() {
                let entry = TableEntry {
                    production: production_idx,
                    alternative: alternative_idx,
                };

                let first_of_alternative = first.of_sequence(alternative);
                for &symbol in first_of_alternative
                    .iter()
                    .filter(|s| **s != Symbol::Epsilon)
                {
                    table.set(left, symbol, entry);
                }

                if first_of_alternative.contains(&Symbol::Epsilon) {
                    if let Some(follow) = follow.get(left) {
                        for &symbol in follow {
                            table.set(left, symbol, entry);
                        }
                    }
                }
            }
        }

        for conflict in &table.conflicts {
            warn!("{}", conflict.to_error(self));
        }
        debug!(
            "LL(1) table: {} rows, {} columns, {} conflicts",
            table.rows.len(),
            table.columns.len(),
            table.conflicts.len()
        );

        table
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::Symbol;
    use crate::Grammar;

    fn build(text: &str) -> (Grammar, super::LL1ParsingTable) {
        let g = Grammar::parse(text).unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let table = g.generate_ll1_parsing_table(&first, &follow);
        (g, table)
    }

    fn cell(g: &Grammar, table: &super::LL1ParsingTable, nt: &str, t: &str) -> Option<String> {
        let nt = g.get_symbol(nt).unwrap().non_terminal().unwrap();
        let t = g.get_symbol(t)?;
        table.get(nt, t).map(|e| g.entry_to_string(e))
    }

    #[test]
    fn expression_table() {
        let (g, table) = build("E -> T E'\nE' -> + T E' | ε\nT -> id");
        assert!(table.is_ll1());
        assert_eq!(cell(&g, &table, "E", "id").as_deref(), Some("E -> T E'"));
        assert_eq!(cell(&g, &table, "E'", "+").as_deref(), Some("E' -> + T E'"));
        assert_eq!(cell(&g, &table, "E'", "$").as_deref(), Some("E' -> ε"));
        assert_eq!(cell(&g, &table, "T", "id").as_deref(), Some("T -> id"));
        assert_eq!(cell(&g, &table, "E", "+"), None);
        assert_eq!(cell(&g, &table, "T", "$"), None);
        assert_eq!(table.columns().last(), Some(&Symbol::EndMarker));
    }

    #[test]
    fn nullable_alternative_uses_follow() {
        let (g, table) = build("S -> A b\nA -> B\nB -> c | ε");
        assert!(table.is_ll1());
        assert_eq!(cell(&g, &table, "A", "b").as_deref(), Some("A -> B"));
        assert_eq!(cell(&g, &table, "A", "c").as_deref(), Some("A -> B"));
        assert_eq!(cell(&g, &table, "B", "b").as_deref(), Some("B -> ε"));
    }

    #[test]
    fn common_prefix_conflicts() {
        let (g, table) = build("S -> a | a b");
        assert!(!table.is_ll1());
        assert_eq!(table.conflicts().len(), 1);
        let conflict = table.conflicts()[0];
        assert_eq!(conflict.lookahead, g.get_symbol("a").unwrap());
        // last write wins
        assert_eq!(cell(&g, &table, "S", "a").as_deref(), Some("S -> a b"));
        let error = conflict.to_error(&g);
        assert_eq!(error.non_terminal, "S");
        assert_eq!(error.lookahead, "a");
        assert_eq!(error.existing, "S -> a");
        assert_eq!(error.replacement, "S -> a b");
    }

    #[test]
    fn rewriting_a_cell_with_the_same_entry_conflicts() {
        let (g, table) = build("S -> A a\nA -> B\nB -> a | ε");
        let cells: Vec<(String, String)> = table
            .conflicts()
            .iter()
            .map(|c| {
                let e = c.to_error(&g);
                (e.non_terminal, e.lookahead)
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                ("A".to_string(), "a".to_string()),
                ("B".to_string(), "a".to_string()),
            ]
        );

        let same = table.conflicts()[0];
        assert_eq!(same.existing, same.replacement);
        assert_eq!(cell(&g, &table, "A", "a").as_deref(), Some("A -> B"));
        // `B -> ε` is written last through FOLLOW(B)
        assert_eq!(cell(&g, &table, "B", "a").as_deref(), Some("B -> ε"));
    }

    #[test]
    fn construction_is_deterministic() {
        let text = "S -> a | a b | B\nB -> b | ε";
        let (_, t1) = build(text);
        let (_, t2) = build(text);
        assert_eq!(t1, t2);
        assert_eq!(t1.conflicts(), t2.conflicts());
    }
}
