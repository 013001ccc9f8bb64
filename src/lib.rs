extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::pipeline::Pipeline;
pub use grammar::Grammar;

fn error_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => {
            let p = Pipeline::build(g);
            p.grammar.to_ll1_table_output(&p.table).to_json()
        }
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => {
            let p = Pipeline::build(g);
            p.grammar
                .to_first_follow_output_vec(&p.first, &p.follow)
                .to_json()
        }
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn parse_input_to_json(grammar: &str, input: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => {
            let p = Pipeline::build(g);
            let report = p.parse_input(input);
            p.grammar.to_parse_report_output("input", &report).to_json()
        }
        Err(e) => error_json(e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::grammar::{error::GrammarError, Symbol};

    #[test]
    fn simple_parse() {
        let g = crate::Grammar::parse("S -> a").unwrap();

        let s = g.get_symbol("S").unwrap();
        let a = g.get_symbol("a").unwrap();

        assert_eq!(g.get_symbol_name(s), "S");
        assert_eq!(g.get_symbol_name(a), "a");
        assert!(a.is_terminal());

        let s = s.non_terminal().unwrap();
        assert_eq!(g.start_symbol(), Some(s));
        assert_eq!(g.production(s).unwrap().alternatives[0], vec![a]);
    }

    #[test]
    fn simple_parse_with_space() {
        let g = crate::Grammar::parse("  S -> a ").unwrap();

        let s = g.get_symbol("S").unwrap().non_terminal().unwrap();
        let a = g.get_symbol("a").unwrap();

        assert_eq!(g.production(s).unwrap().alternatives[0], vec![a]);
    }

    #[test]
    fn simple_parse_with_space_and_newline() {
        let g = crate::Grammar::parse("  S -> a \n | b c").unwrap();

        let s = g.get_symbol("S").unwrap().non_terminal().unwrap();
        let a = g.get_symbol("a").unwrap();
        let b = g.get_symbol("b").unwrap();
        let c = g.get_symbol("c").unwrap();

        assert_eq!(g.production(s).unwrap().alternatives[0], vec![a]);
        assert_eq!(g.production(s).unwrap().alternatives[1], vec![b, c]);
    }

    #[test]
    fn repeated_left_side_merges() {
        let g = crate::Grammar::parse("S -> a\nA -> b\nS -> c").unwrap();
        assert_eq!(g.productions().len(), 2);
        let s = g.get_symbol("S").unwrap().non_terminal().unwrap();
        assert_eq!(g.production(s).unwrap().alternatives.len(), 2);
    }

    #[test]
    fn epsilon_alternatives() {
        let g = crate::Grammar::parse("S -> a | ε | ϵ |").unwrap();
        let s = g.get_symbol("S").unwrap().non_terminal().unwrap();
        let alternatives = &g.production(s).unwrap().alternatives;
        assert_eq!(alternatives.len(), 4);
        for alt in &alternatives[1..] {
            assert_eq!(alt, &vec![Symbol::Epsilon]);
        }
        assert!(g.terminals().len() == 1);
    }

    #[test]
    fn symbols_are_registered_once() {
        let mut g = crate::Grammar::new();
        let a = g.add_terminal("a");
        assert_eq!(g.add_terminal("a"), a);
        let s = g.add_non_terminal("S");
        assert_eq!(g.add_non_terminal("S"), s);
        assert_eq!(g.add_symbol("S"), s);
        assert_eq!(g.terminals().len(), 1);
        assert_eq!(g.non_terminals().len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let g = crate::Grammar::parse("S -> s S | x").unwrap();
        assert!(g.get_symbol("s").unwrap().is_terminal());
        assert!(g.get_symbol("S").unwrap().non_terminal().is_some());
    }

    #[test]
    fn undefined_non_terminals_are_reported() {
        let g = crate::Grammar::parse("S -> A b").unwrap();
        let a = g.get_symbol("A").unwrap().non_terminal().unwrap();
        assert_eq!(g.undefined_non_terminals(), vec![a]);
    }

    #[test]
    fn empty_parse() {
        let g = crate::Grammar::parse("  \n  ").unwrap();
        assert_eq!(g.start_symbol(), None);
    }

    #[test]
    fn two_rightarrows_parse() {
        let e = crate::Grammar::parse("S -> a -> b").unwrap_err();
        assert_eq!(e, GrammarError::TooManyArrows { line: 1 });
    }

    #[test]
    fn no_left_parse() {
        let e = crate::Grammar::parse("-> a").unwrap_err();
        assert_eq!(e, GrammarError::EmptyLeft { line: 1 });
    }

    #[test]
    fn no_previous_left_parse() {
        let e = crate::Grammar::parse("| a b\n S -> a").unwrap_err();
        assert_eq!(e, GrammarError::MissingLeft { line: 1 });
    }

    #[test]
    fn left_contain_space() {
        let e = crate::Grammar::parse("S a S -> x").unwrap_err();
        assert_eq!(e, GrammarError::LeftContainsWhitespace { line: 1 });
    }

    #[test]
    fn lowercase_left_side() {
        let e = crate::Grammar::parse("S -> a\ns -> x").unwrap_err();
        assert_eq!(
            e,
            GrammarError::LeftNotNonTerminal {
                line: 2,
                name: "s".to_string()
            }
        );
    }

    #[test]
    fn line_without_arrow() {
        let e = crate::Grammar::parse("S -> a\nS a").unwrap_err();
        assert_eq!(e, GrammarError::MissingArrow { line: 2 });
    }

    #[test]
    fn end_marker_in_rule() {
        let e = crate::Grammar::parse("S -> a $").unwrap_err();
        assert_eq!(e, GrammarError::EndMarkerInRule { line: 1 });
    }
}
