//! @ai:module:intent Regex-driven parser for targets without a built-in format
//! @ai:module:layer infrastructure
//! @ai:module:public_api PatternParser
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::parsers::OutputParser;
use regex::Regex;

/// @ai:intent Extracts one sample per regex match, scaled to milliseconds
pub struct PatternParser {
    regex: Regex,
    scale: f64,
}

impl PatternParser {
    /// @ai:intent Compile a pattern; the first capture group (or whole match) is the sample
    /// @ai:effects pure
    pub fn new(pattern: &str, scale: f64) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            scale,
        })
    }
}

impl OutputParser for PatternParser {
    /// @ai:effects pure
    fn parse(&self, lines: &[String]) -> Result<Vec<f64>> {
        let mut times = Vec::new();

        for line in lines {
            for captures in self.regex.captures_iter(line) {
                // group 1 is the sample when the pattern has one; an unmatched optional group skips
                let group = if self.regex.captures_len() > 1 { 1 } else { 0 };
                let Some(sample) = captures.get(group) else {
                    continue;
                };

                let value: f64 = sample.as_str().trim().parse().map_err(|e: std::num::ParseFloatError| {
                    Error::Parse {
                        parser: format!("pattern {:?}", self.regex.as_str()),
                        line: line.clone(),
                        message: e.to_string(),
                    }
                })?;

                times.push(value * self.scale);
            }
        }

        Ok(times)
    }
}
