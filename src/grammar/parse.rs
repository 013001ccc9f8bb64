use super::{
    error::GrammarError,
    grammar::{classify, SymbolClass},
    Grammar, Symbol,
};

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(usize, usize, &str)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            let line_no = i + 1;
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::TooManyArrows { line: line_no });
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::EmptyLeft { line: line_no });
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::LeftContainsWhitespace { line: line_no });
                } else if classify(left_str) != SymbolClass::NonTerminal {
                    return Err(GrammarError::LeftNotNonTerminal {
                        line: line_no,
                        name: left_str.to_string(),
                    });
                }
                match g.add_non_terminal(left_str) {
                    Symbol::NonTerminal(idx) => (idx, parts[1]),
                    _ => {
                        return Err(GrammarError::LeftNotNonTerminal {
                            line: line_no,
                            name: left_str.to_string(),
                        })
                    }
                }
            } else {
                match (parts[0].trim_start().strip_prefix('|'), previous_left) {
                    (Some(rights), Some(idx)) => (idx, rights),
                    (Some(_), None) => return Err(GrammarError::MissingLeft { line: line_no }),
                    (None, _) => return Err(GrammarError::MissingArrow { line: line_no }),
                }
            };

            previous_left = Some(left);

            raw_productions.push((line_no, left, rights));
        }

        for (line_no, left, rights) in raw_productions {
            let mut alternatives: Vec<Vec<Symbol>> = Vec::new();
            for right in rights.split('|') {
                let mut symbols = Vec::new();
                for s in right.split_whitespace() {
                    match g.add_symbol(s) {
                        Symbol::EndMarker => {
                            return Err(GrammarError::EndMarkerInRule { line: line_no })
                        }
                        symbol => symbols.push(symbol),
                    }
                }
                alternatives.push(symbols);
            }
            g.add_production(left, alternatives);
        }

        Ok(g)
    }
}
