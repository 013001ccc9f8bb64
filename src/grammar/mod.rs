pub mod config;
pub mod eliminate_left_recursion;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod left_factoring;
pub mod ll1_table;
pub mod parse;
pub mod pipeline;
pub mod predictive_parser;
pub mod pretty_print;
pub use grammar::{Grammar, Production, Symbol};

pub const EPSILON: &str = "ε";
pub const EPSILON_ALIAS: &str = "ϵ";
pub const END_MARK: &str = "$";
