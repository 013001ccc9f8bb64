use std::path::PathBuf;

use thiserror::Error;

/// Errors found while reading grammar text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Line {line}: too many \"->\"")]
    TooManyArrows { line: usize },

    #[error("Line {line}: empty left side")]
    EmptyLeft { line: usize },

    #[error("Line {line}: left side contains whitespace")]
    LeftContainsWhitespace { line: usize },

    #[error("Line {line}: left side \"{name}\" is not a nonterminal")]
    LeftNotNonTerminal { line: usize, name: String },

    #[error("Line {line}: cannot find left side")]
    MissingLeft { line: usize },

    #[error("Line {line}: expected \"->\" or a continuation starting with \"|\"")]
    MissingArrow { line: usize },

    #[error("Line {line}: end marker \"$\" cannot appear in a rule")]
    EndMarkerInRule { line: usize },
}

/// A parse table cell received more than one candidate production.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Conflict in parsing table at [{non_terminal}, {lookahead}]: {existing} replaced by {replacement}, grammar is not LL(1)")]
pub struct GrammarConflictError {
    pub non_terminal: String,
    pub lookahead: String,
    pub existing: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Expected '{expected}', found '{found}'")]
    Mismatch { expected: String, found: String },

    #[error("Unexpected symbol '{found}'")]
    UnexpectedSymbol { non_terminal: String, found: String },

    #[error("Extra input after parsing completed")]
    ExtraInput,

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,
}

/// Raised when a parse outgrows the limits in [`ParserConfig`](super::config::ParserConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("parse stack exceeded {limit} symbols")]
    StackDepth { limit: usize },

    #[error("parse exceeded {limit} steps")]
    Steps { limit: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
