//! @ai:module:intent Named parsers for the output formats of the supported runtimes
//! @ai:module:layer infrastructure
//! @ai:module:public_api BuiltinParser
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::parsers::OutputParser;
use serde::{Deserialize, Serialize};

const LF_C_PREFIX: &str = "---- Elapsed physical time (in nsec): ";

/// @ai:intent Built-in parser selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinParser {
    /// `... Iteration-N: <time> ms`
    Akka,
    /// `... iteration-N: <time> ms`
    Caf,
    /// `Iteration N - <time> ms`
    LfCpp,
    /// `---- Elapsed physical time (in nsec): 1,234,567`
    LfC,
}

impl BuiltinParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinParser::Akka => "akka",
            BuiltinParser::Caf => "caf",
            BuiltinParser::LfCpp => "lf-cpp",
            BuiltinParser::LfC => "lf-c",
        }
    }

    /// @ai:intent Extract the sample of one line, if the line carries one
    /// @ai:effects pure
    fn parse_line(&self, line: &str) -> Result<Option<f64>> {
        match self {
            BuiltinParser::Akka => self.parse_iteration_ms(line, "Iteration-"),
            BuiltinParser::Caf => self.parse_iteration_ms(line, "iteration-"),
            BuiltinParser::LfCpp => {
                let fields: Vec<&str> = line.split_whitespace().collect();

                if line.contains("Iteration ") && fields.len() == 5 && fields[2] == "-" && fields[4] == "ms" {
                    self.parse_float(line, fields[3]).map(Some)
                } else {
                    Ok(None)
                }
            }
            BuiltinParser::LfC => match line.strip_prefix(LF_C_PREFIX) {
                Some(rest) => {
                    let digits = rest.trim().replace(',', "");
                    let ns: i64 = digits.parse().map_err(|e: std::num::ParseIntError| {
                        self.parse_error(line, e.to_string())
                    })?;
                    Ok(Some(ns as f64 / 1_000_000.0))
                }
                None => Ok(None),
            },
        }
    }

    /// @ai:intent Shared format of akka and caf: four fields, third is the time, fourth is `ms`
    /// @ai:effects pure
    fn parse_iteration_ms(&self, line: &str, marker: &str) -> Result<Option<f64>> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if line.contains(marker) && fields.len() == 4 && fields[3] == "ms" {
            self.parse_float(line, fields[2]).map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse_float(&self, line: &str, field: &str) -> Result<f64> {
        field
            .parse::<f64>()
            .map_err(|e| self.parse_error(line, e.to_string()))
    }

    fn parse_error(&self, line: &str, message: String) -> Error {
        Error::Parse {
            parser: self.as_str().to_string(),
            line: line.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for BuiltinParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OutputParser for BuiltinParser {
    /// @ai:intent Collect one sample per matching line, in output order
    /// @ai:effects pure
    fn parse(&self, lines: &[String]) -> Result<Vec<f64>> {
        let mut times = Vec::new();

        for line in lines {
            if let Some(time) = self.parse_line(line)? {
                times.push(time);
            }
        }

        Ok(times)
    }
}
