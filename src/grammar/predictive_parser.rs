use log::{debug, info};
use thiserror::Error;

use super::{
    config::ParserConfig,
    error::{CapacityError, SyntaxError},
    ll1_table::{LL1ParsingTable, TableEntry},
    Grammar, Symbol, END_MARK,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAction {
    Match(Symbol),
    Expand(TableEntry),
    Error(SyntaxError),
}

/// One iteration of the parse loop, recorded before the action is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    /// Bottom to top.
    pub stack: Vec<Symbol>,
    pub lookahead: String,
    pub action: ParseAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    pub steps: Vec<ParseStep>,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parse cut short by a capacity limit, with the steps taken until then.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}")]
pub struct ParseAborted {
    pub cause: CapacityError,
    pub partial: ParseOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    /// 1-based, counting blank lines.
    pub line: usize,
    pub text: String,
    pub result: Result<ParseOutcome, ParseAborted>,
}

impl LineReport {
    /// A line cut short by a capacity limit counts as a single error.
    pub fn error_count(&self) -> usize {
        match &self.result {
            Ok(outcome) => outcome.error_count(),
            Err(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputReport {
    pub lines: Vec<LineReport>,
}

impl InputReport {
    pub fn total_errors(&self) -> usize {
        self.lines.iter().map(|l| l.error_count()).sum()
    }
}

/// Table-driven LL(1) parser with panic-mode recovery. Holds only shared
/// references, so one parser serves any number of lines.
pub struct PredictiveParser<'a> {
    grammar: &'a Grammar,
    table: &'a LL1ParsingTable,
    config: ParserConfig,
}

impl<'a> PredictiveParser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a LL1ParsingTable) -> Self {
        Self {
            grammar,
            table,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Terminals of the grammar and `$` are recognized, anything else is unknown.
    fn classify_token(&self, token: &str) -> Option<Symbol> {
        match self.grammar.get_symbol(token) {
            Some(symbol @ Symbol::Terminal(_)) | Some(symbol @ Symbol::EndMarker) => Some(symbol),
            _ => None,
        }
    }

    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParseOutcome, ParseAborted> {
        let mut input: Vec<(&str, Option<Symbol>)> = tokens
            .iter()
            .map(|&t| (t, self.classify_token(t)))
            .collect();
        input.push((END_MARK, Some(Symbol::EndMarker)));

        let mut stack: Vec<Symbol> = vec![Symbol::EndMarker];
        if let Some(start) = self.grammar.start_symbol() {
            stack.push(Symbol::NonTerminal(start));
        }

        let mut outcome = ParseOutcome::default();
        let mut position = 0;

        while position < input.len() {
            let top = match stack.last() {
                Some(&top) => top,
                None => break,
            };
            if outcome.steps.len() >= self.config.max_steps {
                return Err(ParseAborted {
                    cause: CapacityError::Steps {
                        limit: self.config.max_steps,
                    },
                    partial: outcome,
                });
            }

            let (text, lookahead) = input[position];
            let snapshot = stack.clone();

            let action = match top {
                Symbol::NonTerminal(nt) => match lookahead.and_then(|a| self.table.get(nt, a)) {
                    Some(entry) => {
                        stack.pop();
                        let alternative = self.grammar.alternative_of(entry);
                        let pushed = alternative.iter().filter(|s| **s != Symbol::Epsilon).count();
                        if stack.len() + pushed > self.config.max_stack_depth {
                            return Err(ParseAborted {
                                cause: CapacityError::StackDepth {
                                    limit: self.config.max_stack_depth,
                                },
                                partial: outcome,
                            });
                        }
                        stack.extend(
                            alternative
                                .iter()
                                .rev()
                                .filter(|s| **s != Symbol::Epsilon)
                                .cloned(),
                        );
                        ParseAction::Expand(entry)
                    }
                    None => {
                        // skip the offending token, keep the nonterminal
                        position += 1;
                        let error = SyntaxError::UnexpectedSymbol {
                            non_terminal: self.grammar.get_symbol_name(top).to_string(),
                            found: text.to_string(),
                        };
                        outcome.errors.push(error.clone());
                        ParseAction::Error(error)
                    }
                },
                _ => {
                    stack.pop();
                    if lookahead == Some(top) {
                        position += 1;
                        ParseAction::Match(top)
                    } else {
                        let error = SyntaxError::Mismatch {
                            expected: self.grammar.get_symbol_name(top).to_string(),
                            found: text.to_string(),
                        };
                        outcome.errors.push(error.clone());
                        ParseAction::Error(error)
                    }
                }
            };

            outcome.steps.push(ParseStep {
                stack: snapshot,
                lookahead: text.to_string(),
                action,
            });
        }

        // the appended `$` does not count as extra input
        if position + 1 < input.len() {
            outcome.errors.push(SyntaxError::ExtraInput);
        }
        if !stack.is_empty() && position >= input.len() {
            outcome.errors.push(SyntaxError::UnexpectedEndOfInput);
        }

        debug!(
            "parsed {} tokens in {} steps with {} errors",
            tokens.len(),
            outcome.steps.len(),
            outcome.error_count()
        );

        Ok(outcome)
    }

    pub fn parse_line(&self, line: &str) -> Result<ParseOutcome, ParseAborted> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.parse_tokens(&tokens)
    }

    /// Parses every non-blank line of `input` on its own.
    pub fn parse_input(&self, input: &str) -> InputReport {
        let mut report = InputReport::default();
        for (i, text) in input.lines().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            let line = LineReport {
                line: i + 1,
                text: text.to_string(),
                result: self.parse_line(text),
            };
            match &line.result {
                Ok(outcome) if outcome.is_accepted() => {
                    info!("Line {}: Parsing completed successfully", line.line)
                }
                Ok(outcome) => info!(
                    "Line {}: Parsing completed with {} errors",
                    line.line,
                    outcome.error_count()
                ),
                Err(e) => info!("Line {}: Parsing aborted: {}", line.line, e),
            }
            report.lines.push(line);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseAction, PredictiveParser};
    use crate::grammar::{config::ParserConfig, error::CapacityError, error::SyntaxError};
    use crate::Grammar;

    const EXPR: &str = "E -> T E'\nE' -> + T E' | ε\nT -> id";

    fn with_parser<F: FnOnce(&Grammar, PredictiveParser)>(text: &str, f: F) {
        let g = Grammar::parse(text).unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let table = g.generate_ll1_parsing_table(&first, &follow);
        f(&g, PredictiveParser::new(&g, &table));
    }

    #[test]
    fn accepts_sentence() {
        with_parser(EXPR, |g, parser| {
            let outcome = parser.parse_tokens(&["id", "+", "id"]).unwrap();
            assert_eq!(outcome.error_count(), 0);

            let actions: Vec<String> = outcome
                .steps
                .iter()
                .map(|step| match &step.action {
                    ParseAction::Match(s) => format!("match {}", g.get_symbol_name(*s)),
                    ParseAction::Expand(e) => format!("expand {}", g.entry_to_string(*e)),
                    ParseAction::Error(e) => format!("error {}", e),
                })
                .collect();
            assert_eq!(
                actions,
                vec![
                    "expand E -> T E'",
                    "expand T -> id",
                    "match id",
                    "expand E' -> + T E'",
                    "match +",
                    "expand T -> id",
                    "match id",
                    "expand E' -> ε",
                    "match $",
                ]
            );
        });
    }

    #[test]
    fn stack_snapshots_start_from_start_symbol() {
        with_parser(EXPR, |g, parser| {
            let outcome = parser.parse_line("id").unwrap();
            let first = &outcome.steps[0];
            let names: Vec<&str> = first.stack.iter().map(|s| g.get_symbol_name(*s)).collect();
            assert_eq!(names, vec!["$", "E"]);
            assert_eq!(first.lookahead, "id");
        });
    }

    #[test]
    fn missing_operand_reports_end_of_input() {
        with_parser(EXPR, |_, parser| {
            let outcome = parser.parse_tokens(&["id", "+"]).unwrap();
            assert!(outcome.error_count() >= 1);
            assert_eq!(
                outcome.errors.last(),
                Some(&SyntaxError::UnexpectedEndOfInput)
            );
        });
    }

    #[test]
    fn unknown_token_is_skipped() {
        with_parser(EXPR, |_, parser| {
            let outcome = parser.parse_line("id ? + id").unwrap();
            assert_eq!(
                outcome.errors,
                vec![SyntaxError::UnexpectedSymbol {
                    non_terminal: "E'".to_string(),
                    found: "?".to_string()
                }]
            );
        });
    }

    #[test]
    fn terminal_mismatch_pops_stack() {
        with_parser("S -> a b", |_, parser| {
            let outcome = parser.parse_line("a c").unwrap();
            assert_eq!(
                outcome.errors[0],
                SyntaxError::Mismatch {
                    expected: "b".to_string(),
                    found: "c".to_string()
                }
            );
            assert!(outcome.errors.contains(&SyntaxError::ExtraInput));
        });
    }

    #[test]
    fn trailing_token_after_complete_sentence() {
        with_parser(EXPR, |_, parser| {
            let outcome = parser.parse_line("id id").unwrap();
            // E' has no entry for `id`, the token is dropped and `$` closes the parse
            assert_eq!(
                outcome.errors,
                vec![SyntaxError::UnexpectedSymbol {
                    non_terminal: "E'".to_string(),
                    found: "id".to_string()
                }]
            );
        });
    }

    #[test]
    fn step_limit_is_reported() {
        // the cell [A, a] ends up as `A -> B`, and `A -> B`, `B -> A` never consumes input
        with_parser("A -> a | B\nB -> A", |_, parser| {
            let parser = parser.with_config(ParserConfig {
                max_steps: 50,
                ..ParserConfig::default()
            });
            let aborted = parser.parse_line("a").unwrap_err();
            assert_eq!(aborted.cause, CapacityError::Steps { limit: 50 });
            // the trace up to the limit is kept
            assert_eq!(aborted.partial.steps.len(), 50);
            assert!(aborted
                .partial
                .steps
                .iter()
                .all(|step| matches!(step.action, ParseAction::Expand(_))));
        });
    }

    #[test]
    fn stack_limit_is_reported() {
        with_parser("A -> B x\nB -> z | A y", |_, parser| {
            let parser = parser.with_config(ParserConfig {
                max_stack_depth: 16,
                ..ParserConfig::default()
            });
            let aborted = parser.parse_line("z y x").unwrap_err();
            assert_eq!(aborted.cause, CapacityError::StackDepth { limit: 16 });
            assert!(!aborted.partial.steps.is_empty());
            let deepest = aborted.partial.steps.iter().map(|s| s.stack.len()).max();
            assert!(deepest <= Some(16));
        });
    }

    #[test]
    fn input_report_keeps_line_numbers() {
        with_parser(EXPR, |_, parser| {
            let report = parser.parse_input("id + id\n\n   \nid +\nid");
            let lines: Vec<usize> = report.lines.iter().map(|l| l.line).collect();
            assert_eq!(lines, vec![1, 4, 5]);
            assert_eq!(report.lines[0].error_count(), 0);
            assert!(report.lines[1].error_count() >= 1);
            assert_eq!(report.lines[2].error_count(), 0);
            assert_eq!(report.total_errors(), report.lines[1].error_count());
        });
    }
}
