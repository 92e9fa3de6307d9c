//! @ai:module:intent Target definitions: lifecycle commands, parameters and parser choice
//! @ai:module:layer domain
//! @ai:module:public_api TargetSpec, Command, CommandToken, LifecycleStage
//! @ai:module:stateless true

use crate::parsers::ParserRef;
use crate::spec::benchmark::ArgsSlot;
use crate::spec::params::{ParamValue, ParameterSet};
use serde::{Deserialize, Serialize};

/// @ai:intent Ordered stages of a target's lifecycle
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Prepare,
    Copy,
    Gen,
    Compile,
    Run,
}

impl LifecycleStage {
    /// Stages that run before `Run`, in execution order
    pub const SETUP: [LifecycleStage; 4] = [
        LifecycleStage::Prepare,
        LifecycleStage::Copy,
        LifecycleStage::Gen,
        LifecycleStage::Compile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Prepare => "prepare",
            LifecycleStage::Copy => "copy",
            LifecycleStage::Gen => "gen",
            LifecycleStage::Compile => "compile",
            LifecycleStage::Run => "run",
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Run-level setting a command can reference
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunSetting {
    Iterations,
    Threads,
}

impl std::fmt::Display for RunSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunSetting::Iterations => f.write_str("iterations"),
            RunSetting::Threads => f.write_str("threads"),
        }
    }
}

/// @ai:intent One element of a command line: a literal, a benchmark argument group slot or a run setting
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandToken {
    /// Numbers and booleans are accepted and kept in their textual form
    #[serde(deserialize_with = "literal_text")]
    Literal(String),
    Group { args: ArgsSlot },
    Setting { setting: RunSetting },
}

fn literal_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    ParamValue::deserialize(deserializer).map(|value| value.to_string())
}

/// @ai:intent Unresolved command line; the first token is the executable
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Vec<CommandToken>);

impl Command {
    pub fn new(tokens: Vec<CommandToken>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[CommandToken] {
        &self.0
    }

    /// @ai:intent Executable name if the command starts with a literal
    /// @ai:effects pure
    pub fn program(&self) -> Option<&str> {
        match self.0.first() {
            Some(CommandToken::Literal(program)) if !program.is_empty() => Some(program),
            _ => None,
        }
    }

    /// @ai:intent Argument group slots referenced by this command
    /// @ai:effects pure
    pub fn slots(&self) -> impl Iterator<Item = ArgsSlot> + '_ {
        self.0.iter().filter_map(|token| match token {
            CommandToken::Group { args } => Some(*args),
            CommandToken::Literal(_) | CommandToken::Setting { .. } => None,
        })
    }
}

/// @ai:intent A target definition
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    #[serde(default)]
    pub params: ParameterSet,
    #[serde(default)]
    pub parser: Option<ParserRef>,
    #[serde(default)]
    pub prepare: Option<Command>,
    #[serde(default)]
    pub copy: Option<Command>,
    #[serde(default)]
    pub gen: Option<Command>,
    #[serde(default)]
    pub compile: Option<Command>,
    #[serde(default)]
    pub run: Option<Command>,
}

impl TargetSpec {
    /// @ai:intent Command for a lifecycle stage, if defined
    /// @ai:effects pure
    pub fn command(&self, stage: LifecycleStage) -> Option<&Command> {
        match stage {
            LifecycleStage::Prepare => self.prepare.as_ref(),
            LifecycleStage::Copy => self.copy.as_ref(),
            LifecycleStage::Gen => self.gen.as_ref(),
            LifecycleStage::Compile => self.compile.as_ref(),
            LifecycleStage::Run => self.run.as_ref(),
        }
    }

    /// @ai:intent All defined commands with their stage, in lifecycle order
    /// @ai:effects pure
    pub fn commands(&self) -> impl Iterator<Item = (LifecycleStage, &Command)> {
        LifecycleStage::SETUP
            .into_iter()
            .chain(std::iter::once(LifecycleStage::Run))
            .filter_map(|stage| self.command(stage).map(|command| (stage, command)))
    }
}
