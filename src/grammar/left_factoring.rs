use log::debug;

use super::{grammar::is_epsilon_alternative, Grammar, Symbol};

/// Number of leading symbols shared by every alternative in `group`.
fn longest_common_prefix(group: &[&Vec<Symbol>]) -> usize {
    let first = group[0];
    (0..first.len())
        .take_while(|&k| group.iter().all(|alt| alt.get(k) == Some(&first[k])))
        .count()
}

impl Grammar {
    /// Returns a copy of the grammar in which no two alternatives of a production
    /// start with the same symbol.
    pub fn left_factor(&self) -> Grammar {
        let mut g = self.clone();

        let mut pass = 0;
        let mut changed = true;
        while changed {
            changed = false;
            pass += 1;
            // productions appended during the pass are visited in the same pass
            let mut i = 0;
            while i < g.productions.len() {
                let old_count = g.productions[i].alternatives.len();
                g.left_factor_production(i);
                if g.productions[i].alternatives.len() != old_count {
                    changed = true;
                }
                i += 1;
            }
            debug!(
                "left factoring pass {}: {} productions",
                pass,
                g.productions.len()
            );
        }

        g
    }

    fn left_factor_production(&mut self, index: usize) {
        let left = self.productions[index].left;
        let old_alternatives = std::mem::take(&mut self.productions[index].alternatives);

        let mut processed = vec![false; old_alternatives.len()];
        let mut alternatives: Vec<Vec<Symbol>> = Vec::new();
        let mut new_productions: Vec<(usize, Vec<Vec<Symbol>>)> = Vec::new();

        for i in 0..old_alternatives.len() {
            if processed[i] {
                continue;
            }
            processed[i] = true;

            let alternative = &old_alternatives[i];
            if is_epsilon_alternative(alternative) {
                alternatives.push(alternative.clone());
                continue;
            }

            let mut group = vec![alternative];
            for j in i + 1..old_alternatives.len() {
                let other = &old_alternatives[j];
                if !processed[j] && !is_epsilon_alternative(other) && other[0] == alternative[0] {
                    processed[j] = true;
                    group.push(other);
                }
            }

            if group.len() < 2 {
                alternatives.push(alternative.clone());
                continue;
            }

            let prefix_len = longest_common_prefix(&group);
            let fresh = self.fresh_non_terminal(left);

            let mut factored = alternative[..prefix_len].to_vec();
            factored.push(Symbol::NonTerminal(fresh));
            alternatives.push(factored);

            let suffixes = group
                .iter()
                .map(|alt| {
                    if alt.len() == prefix_len {
                        vec![Symbol::Epsilon]
                    } else {
                        alt[prefix_len..].to_vec()
                    }
                })
                .collect();
            new_productions.push((fresh, suffixes));
        }

        self.productions[index].alternatives = alternatives;
        for (fresh, suffixes) in new_productions {
            self.add_production(fresh, suffixes);
        }
    }
}
