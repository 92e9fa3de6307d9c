//! @ai:module:intent Parameter values and parameter sets for benchmarks and targets
//! @ai:module:layer domain
//! @ai:module:public_api ParamValue, ParameterSet
//! @ai:module:stateless true

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// @ai:intent A concrete parameter value as written in a definition file
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// @ai:intent Parse a command-line value, trying integer, float and bool before text
    /// @ai:effects pure
    /// @ai:example ("1000") -> Integer(1000)
    /// @ai:example ("0.5") -> Float(0.5)
    /// @ai:example ("fast") -> Text("fast")
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Ok(value) = raw.parse::<i64>() {
            return ParamValue::Integer(value);
        }

        // "inf" and "nan" stay text
        if let Ok(value) = raw.parse::<f64>() {
            if value.is_finite() {
                return ParamValue::Float(value);
            }
        }

        match raw {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => ParamValue::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Integer(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{}", format_float(*value)),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

/// @ai:intent Render a float so integral values keep their decimal point
/// @ai:effects pure
/// @ai:example (12.0) -> "12.0"
/// @ai:example (3.25) -> "3.25"
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

/// @ai:intent Ordered mapping from parameter name to value
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(IndexMap<String, ParamValue>);

impl ParameterSet {
    /// @ai:intent Create an empty parameter set
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Look up a parameter value by name
    /// @ai:effects pure
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// @ai:intent Check whether a parameter is declared
    /// @ai:effects pure
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// @ai:intent Declared parameter names in declaration order
    /// @ai:effects pure
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// @ai:intent Insert or replace a value, keeping the original position of existing names
    /// @ai:effects state:write
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ParamValue)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
