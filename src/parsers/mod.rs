//! @ai:module:intent Pluggable parsers that turn run output into millisecond timings
//! @ai:module:layer application
//! @ai:module:public_api OutputParser, ParserRef, BuiltinParser, PatternParser

pub mod builtin;
pub mod pattern;

pub use builtin::BuiltinParser;
pub use pattern::PatternParser;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// @ai:intent Trait for result parsers applied to the captured run output
pub trait OutputParser {
    /// @ai:intent Extract ordered millisecond samples from output lines
    /// @ai:post result may be empty
    fn parse(&self, lines: &[String]) -> Result<Vec<f64>>;
}

impl<F> OutputParser for F
where
    F: Fn(&[String]) -> Result<Vec<f64>>,
{
    fn parse(&self, lines: &[String]) -> Result<Vec<f64>> {
        self(lines)
    }
}

/// @ai:intent Parser reference as written in a definition file
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParserRef {
    Builtin(BuiltinParser),
    Pattern {
        pattern: String,
        #[serde(default = "default_scale")]
        scale: f64,
    },
}

fn default_scale() -> f64 {
    1.0
}

impl ParserRef {
    /// @ai:intent Instantiate the referenced parser
    /// @ai:effects pure
    pub fn build(&self) -> Result<Box<dyn OutputParser>> {
        match self {
            ParserRef::Builtin(parser) => Ok(Box::new(*parser)),
            ParserRef::Pattern { pattern, scale } => Ok(Box::new(PatternParser::new(pattern, *scale)?)),
        }
    }
}

impl std::fmt::Display for ParserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserRef::Builtin(parser) => write!(f, "{parser}"),
            ParserRef::Pattern { pattern, .. } => write!(f, "pattern {pattern:?}"),
        }
    }
}
