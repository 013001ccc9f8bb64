use log::{debug, warn};

use super::{
    config::ParserConfig,
    first_follow::{FirstSets, FollowSets},
    ll1_table::LL1ParsingTable,
    predictive_parser::{InputReport, ParseAborted, ParseOutcome, PredictiveParser},
    Grammar, Symbol,
};

/// Every stage from the grammar as read to the LL(1) table, kept for inspection.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub original: Grammar,
    pub factored: Grammar,
    pub grammar: Grammar,
    pub first: FirstSets,
    pub follow: FollowSets,
    pub table: LL1ParsingTable,
    pub config: ParserConfig,
}

impl Pipeline {
    /// Takes ownership of the grammar as read and keeps it as `original`.
    pub fn build(original: Grammar) -> Self {
        for nt in original.undefined_non_terminals() {
            warn!(
                "{} is used but never defined",
                original.get_symbol_name(Symbol::NonTerminal(nt))
            );
        }

        let factored = original.left_factor();
        let grammar = factored.eliminate_left_recursion();
        debug!(
            "{} productions after left factoring, {} after left recursion removal",
            factored.productions().len(),
            grammar.productions().len()
        );

        let first = grammar.first_sets();
        let follow = grammar.follow_sets(&first);
        let table = grammar.generate_ll1_parsing_table(&first, &follow);

        Self {
            original,
            factored,
            grammar,
            first,
            follow,
            table,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn parser(&self) -> PredictiveParser<'_> {
        PredictiveParser::new(&self.grammar, &self.table).with_config(self.config)
    }

    pub fn parse_line(&self, line: &str) -> Result<ParseOutcome, ParseAborted> {
        self.parser().parse_line(line)
    }

    pub fn parse_input(&self, input: &str) -> InputReport {
        self.parser().parse_input(input)
    }
}
