//! @ai:module:intent Benchmark definitions: parameters, supported targets and argument groups
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkSpec, TargetBinding, ArgumentGroup, ArgsSlot
//! @ai:module:stateless true

use crate::parsers::ParserRef;
use crate::spec::params::ParameterSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// @ai:intent Marker inside a fragment that is replaced by the parameter value
pub const PLACEHOLDER: &str = "<value>";

/// @ai:intent Lifecycle step whose arguments come from a benchmark argument group
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgsSlot {
    Gen,
    Compile,
    Run,
}

impl ArgsSlot {
    pub const ALL: [ArgsSlot; 3] = [ArgsSlot::Gen, ArgsSlot::Compile, ArgsSlot::Run];

    /// @ai:intent Name of the argument group in benchmark files
    /// @ai:effects pure
    pub fn group_name(&self) -> &'static str {
        match self {
            ArgsSlot::Gen => "gen_args",
            ArgsSlot::Compile => "compile_args",
            ArgsSlot::Run => "run_args",
        }
    }
}

impl std::fmt::Display for ArgsSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.group_name())
    }
}

/// @ai:intent Mapping from parameter name to ordered fragment templates
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentGroup(IndexMap<String, Vec<String>>);

impl ArgumentGroup {
    /// @ai:intent Referenced parameter names in declaration order
    /// @ai:effects pure
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, fragments)| (name.as_str(), fragments.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ArgumentGroup {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// @ai:intent How a benchmark passes its parameters to one supported target
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetBinding {
    #[serde(default)]
    pub gen_args: Option<ArgumentGroup>,
    #[serde(default)]
    pub compile_args: Option<ArgumentGroup>,
    #[serde(default)]
    pub run_args: Option<ArgumentGroup>,
    /// Overrides the parser declared by the target
    #[serde(default)]
    pub parser: Option<ParserRef>,
}

impl TargetBinding {
    /// @ai:intent Argument group for a lifecycle slot, if declared
    /// @ai:effects pure
    pub fn group(&self, slot: ArgsSlot) -> Option<&ArgumentGroup> {
        match slot {
            ArgsSlot::Gen => self.gen_args.as_ref(),
            ArgsSlot::Compile => self.compile_args.as_ref(),
            ArgsSlot::Run => self.run_args.as_ref(),
        }
    }
}

/// @ai:intent A benchmark definition
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    pub name: String,
    #[serde(default)]
    pub params: ParameterSet,
    /// Supported targets keyed by target name
    #[serde(default)]
    pub targets: IndexMap<String, TargetBinding>,
}

impl BenchmarkSpec {
    /// @ai:intent Check whether the benchmark declares support for a target
    /// @ai:effects pure
    pub fn supports(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    pub fn binding(&self, target: &str) -> Option<&TargetBinding> {
        self.targets.get(target)
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}
