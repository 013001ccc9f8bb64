use log::{debug, warn};

use super::{Grammar, Symbol};

impl Grammar {
    /// Removes direct left recursion, one production per nonterminal.
    ///
    /// `A -> A b1 | ... | A bn | a1 | ... | am` becomes
    /// `A -> a1 A' | ... | am A'` and `A' -> b1 A' | ... | bn A' | ε`.
    /// Indirect recursion through other nonterminals is left as it is.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let mut g = self.without_productions();

        for production in &self.productions {
            let left = production.left;
            let (recursive, non_recursive): (Vec<&Vec<Symbol>>, Vec<&Vec<Symbol>>) = production
                .alternatives
                .iter()
                .partition(|alt| alt.first() == Some(&Symbol::NonTerminal(left)));

            if recursive.is_empty() {
                g.add_production(left, production.alternatives.clone());
                continue;
            }

            // `A -> A` adds nothing to the language
            let betas: Vec<&[Symbol]> = recursive
                .iter()
                .map(|alt| &alt[1..])
                .filter(|beta| !beta.is_empty())
                .collect();
            if betas.is_empty() {
                debug!(
                    "dropping trivial cycle {0} -> {0}",
                    g.get_symbol_name(Symbol::NonTerminal(left))
                );
                g.add_production(left, non_recursive.into_iter().cloned().collect());
                continue;
            }

            let prime = g.fresh_non_terminal(left);
            let with_prime = |symbols: &[Symbol]| -> Vec<Symbol> {
                symbols
                    .iter()
                    .cloned()
                    .filter(|s| *s != Symbol::Epsilon)
                    .chain(std::iter::once(Symbol::NonTerminal(prime)))
                    .collect()
            };

            let alternatives: Vec<Vec<Symbol>> = if non_recursive.is_empty() {
                warn!(
                    "{} has no non-recursive alternative, falling back to {} -> {} {}",
                    g.get_symbol_name(Symbol::NonTerminal(left)),
                    g.get_symbol_name(Symbol::NonTerminal(left)),
                    g.alternative_to_vec_str(betas[0]).join(" "),
                    g.get_symbol_name(Symbol::NonTerminal(prime)),
                );
                vec![with_prime(betas[0])]
            } else {
                non_recursive
                    .iter()
                    .map(|alpha| with_prime(alpha.as_slice()))
                    .collect()
            };
            g.add_production(left, alternatives);

            let mut prime_alternatives: Vec<Vec<Symbol>> =
                betas.iter().map(|&beta| with_prime(beta)).collect();
            prime_alternatives.push(vec![Symbol::Epsilon]);
            g.add_production(prime, prime_alternatives);

            debug!(
                "eliminated left recursion of {} with {}",
                g.get_symbol_name(Symbol::NonTerminal(left)),
                g.get_symbol_name(Symbol::NonTerminal(prime))
            );
        }

        g
    }
}
