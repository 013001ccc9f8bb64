use serde::{Deserialize, Serialize};

use super::error::Error;

/// Limits applied to every line handed to the predictive parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub max_stack_depth: usize,
    pub max_steps: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 1024,
            max_steps: 100_000,
        }
    }
}

impl ParserConfig {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}
