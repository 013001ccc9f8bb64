use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::{Grammar, Symbol};

/// FIRST sets keyed by nonterminal. A set contains [`Symbol::Epsilon`] when the
/// nonterminal is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirstSets {
    sets: HashMap<usize, BTreeSet<Symbol>>,
}

impl FirstSets {
    pub fn get(&self, non_terminal: usize) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(&non_terminal)
    }

    pub fn is_nullable(&self, non_terminal: usize) -> bool {
        self.sets
            .get(&non_terminal)
            .map_or(false, |set| set.contains(&Symbol::Epsilon))
    }

    /// FIRST of a single symbol. Anything but a nonterminal is its own FIRST.
    pub fn of_symbol(&self, symbol: Symbol) -> BTreeSet<Symbol> {
        match symbol {
            Symbol::NonTerminal(idx) => self.sets.get(&idx).cloned().unwrap_or_default(),
            _ => std::iter::once(symbol).collect(),
        }
    }

    /// FIRST of a symbol sequence, scanning left to right while symbols are nullable.
    /// An empty or all-nullable sequence yields a set containing epsilon.
    pub fn of_sequence(&self, symbols: &[Symbol]) -> BTreeSet<Symbol> {
        let mut first = BTreeSet::new();
        for &symbol in symbols {
            let first_of_symbol = self.of_symbol(symbol);
            first.extend(first_of_symbol.iter().filter(|s| **s != Symbol::Epsilon));
            if !first_of_symbol.contains(&Symbol::Epsilon) {
                return first;
            }
        }
        first.insert(Symbol::Epsilon);
        first
    }

    /// One full pass over every alternative. Returns whether any set grew.
    pub fn refine(&mut self, grammar: &Grammar) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for alternative in &production.alternatives {
                let first = self.of_sequence(alternative);
                let set = self.sets.entry(production.left).or_default();
                for symbol in first {
                    changed |= set.insert(symbol);
                }
            }
        }
        changed
    }
}

/// FOLLOW sets keyed by nonterminal. A set contains [`Symbol::EndMarker`] when
/// the nonterminal can end a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowSets {
    sets: HashMap<usize, BTreeSet<Symbol>>,
}

impl FollowSets {
    pub fn get(&self, non_terminal: usize) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(&non_terminal)
    }

    /// One full pass over every symbol occurrence. `first` must be converged.
    pub fn refine(&mut self, grammar: &Grammar, first: &FirstSets) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for alternative in &production.alternatives {
                for (k, symbol) in alternative.iter().enumerate() {
                    let x = match symbol {
                        Symbol::NonTerminal(idx) => *idx,
                        _ => continue,
                    };

                    let tail_first = first.of_sequence(&alternative[k + 1..]);
                    let mut follow: Vec<Symbol> = tail_first
                        .iter()
                        .filter(|s| **s != Symbol::Epsilon)
                        .cloned()
                        .collect();
                    if tail_first.contains(&Symbol::Epsilon) {
                        if let Some(left_follow) = self.sets.get(&production.left) {
                            follow.extend(left_follow.iter().cloned());
                        }
                    }

                    let set = self.sets.entry(x).or_default();
                    for symbol in follow {
                        changed |= set.insert(symbol);
                    }
                }
            }
        }
        changed
    }
}

impl Grammar {
    pub fn first_sets(&self) -> FirstSets {
        let mut first = FirstSets {
            sets: self
                .non_terminals()
                .iter()
                .map(|&nt| (nt, BTreeSet::new()))
                .collect(),
        };

        let mut pass = 1;
        while first.refine(self) {
            pass += 1;
        }
        debug!("FIRST sets converged after {} passes", pass);

        first
    }

    pub fn follow_sets(&self, first: &FirstSets) -> FollowSets {
        let mut follow = FollowSets {
            sets: self
                .non_terminals()
                .iter()
                .map(|&nt| (nt, BTreeSet::new()))
                .collect(),
        };
        if let Some(start) = self.start_symbol() {
            follow
                .sets
                .entry(start)
                .or_default()
                .insert(Symbol::EndMarker);
        }

        let mut pass = 1;
        while follow.refine(self, first) {
            pass += 1;
        }
        debug!("FOLLOW sets converged after {} passes", pass);

        follow
    }
}
