use std::collections::HashMap;

use super::{END_MARK, EPSILON, EPSILON_ALIAS};

/// A grammar symbol. Terminals and nonterminals carry the id of their interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(usize),
    NonTerminal(usize),
    EndMarker,
    Epsilon,
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<usize> {
        match self {
            Symbol::NonTerminal(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Terminal,
    NonTerminal,
    EndMarker,
    Epsilon,
}

/// Classifies symbol text: a leading uppercase letter marks a nonterminal.
pub fn classify(name: &str) -> SymbolClass {
    if name == EPSILON || name == EPSILON_ALIAS {
        SymbolClass::Epsilon
    } else if name == END_MARK {
        SymbolClass::EndMarker
    } else if name.chars().next().map_or(false, char::is_uppercase) {
        SymbolClass::NonTerminal
    } else {
        SymbolClass::Terminal
    }
}

/// An alternative made only of epsilon markers (or nothing at all) derives the empty string.
pub fn is_epsilon_alternative(alternative: &[Symbol]) -> bool {
    alternative.iter().all(|s| *s == Symbol::Epsilon)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub left: usize,
    pub alternatives: Vec<Vec<Symbol>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grammar {
    names: Vec<String>,
    symbol_table: HashMap<String, Symbol>,
    pub(crate) productions: Vec<Production>,
    production_index: HashMap<usize, usize>,
    non_terminals: Vec<usize>,
    terminals: Vec<usize>,
    start_symbol: Option<usize>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> usize {
        let idx = self.names.len();
        self.names.push(name.to_string());
        idx
    }

    pub fn add_non_terminal(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.symbol_table.get(name) {
            return *symbol;
        }
        let idx = self.intern(name);
        let symbol = Symbol::NonTerminal(idx);
        self.symbol_table.insert(name.to_string(), symbol);
        self.non_terminals.push(idx);
        symbol
    }

    pub fn add_terminal(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.symbol_table.get(name) {
            return *symbol;
        }
        let idx = self.intern(name);
        let symbol = Symbol::Terminal(idx);
        self.symbol_table.insert(name.to_string(), symbol);
        self.terminals.push(idx);
        symbol
    }

    /// Registers `name` according to [`classify`]. The markers are never registered.
    pub fn add_symbol(&mut self, name: &str) -> Symbol {
        match classify(name) {
            SymbolClass::NonTerminal => self.add_non_terminal(name),
            SymbolClass::Terminal => self.add_terminal(name),
            SymbolClass::EndMarker => Symbol::EndMarker,
            SymbolClass::Epsilon => Symbol::Epsilon,
        }
    }

    /// Appends alternatives to the production of `left`, creating it on first use.
    /// The first production added fixes the start symbol.
    pub fn add_production(&mut self, left: usize, alternatives: Vec<Vec<Symbol>>) {
        let alternatives = alternatives.into_iter().map(normalize_alternative);
        if let Some(&idx) = self.production_index.get(&left) {
            self.productions[idx].alternatives.extend(alternatives);
            return;
        }
        self.production_index.insert(left, self.productions.len());
        self.productions.push(Production {
            left,
            alternatives: alternatives.collect(),
        });
        if self.start_symbol.is_none() {
            self.start_symbol = Some(left);
        }
    }

    pub fn production(&self, non_terminal: usize) -> Option<&Production> {
        self.production_index
            .get(&non_terminal)
            .map(|&idx| &self.productions[idx])
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn non_terminals(&self) -> &[usize] {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &[usize] {
        &self.terminals
    }

    pub fn start_symbol(&self) -> Option<usize> {
        self.start_symbol
    }

    /// Looks up already registered text, including the two markers.
    pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
        match classify(name) {
            SymbolClass::EndMarker => Some(Symbol::EndMarker),
            SymbolClass::Epsilon => Some(Symbol::Epsilon),
            _ => self.symbol_table.get(name).cloned(),
        }
    }

    pub fn get_symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Terminal(idx) | Symbol::NonTerminal(idx) => self.names[idx].as_str(),
            Symbol::EndMarker => END_MARK,
            Symbol::Epsilon => EPSILON,
        }
    }

    pub fn alternative_to_vec_str(&self, alternative: &[Symbol]) -> Vec<&str> {
        alternative.iter().map(|s| self.get_symbol_name(*s)).collect()
    }

    pub fn get_symbol_prime_name(&self, mut name: String) -> String {
        while self.symbol_table.contains_key(&name) {
            name.push('\'');
        }
        name
    }

    /// Creates `A'`, `A''`, ... for `A`, unique among every name seen so far.
    pub fn fresh_non_terminal(&mut self, base: usize) -> usize {
        let name = self.get_symbol_prime_name(format!("{}'", self.names[base]));
        let idx = self.intern(&name);
        self.symbol_table.insert(name, Symbol::NonTerminal(idx));
        self.non_terminals.push(idx);
        idx
    }

    /// Nonterminals that appear in some alternative but own no production.
    pub fn undefined_non_terminals(&self) -> Vec<usize> {
        self.non_terminals
            .iter()
            .filter(|nt| !self.production_index.contains_key(*nt))
            .cloned()
            .collect()
    }

    /// Same symbols and start symbol, no productions.
    pub(crate) fn without_productions(&self) -> Self {
        Self {
            productions: Vec::new(),
            production_index: HashMap::new(),
            ..self.clone()
        }
    }
}

fn normalize_alternative(alternative: Vec<Symbol>) -> Vec<Symbol> {
    if is_epsilon_alternative(&alternative) {
        vec![Symbol::Epsilon]
    } else {
        alternative
            .into_iter()
            .filter(|s| *s != Symbol::Epsilon)
            .collect()
    }
}
