//! @ai:module:intent Expand argument-group templates against a parameter set
//! @ai:module:layer domain
//! @ai:module:public_api ArgumentResolver, ResolvedCommand, substitute
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::spec::{ArgumentGroup, Command, CommandToken, ParameterSet, RunSetting, TargetBinding, PLACEHOLDER};

/// @ai:intent Replace every placeholder in a fragment with a value
/// @ai:effects pure
/// @ai:example ("--n=<value>", "10") -> "--n=10"
/// @ai:example ("--verbose", "10") -> "--verbose"
pub fn substitute(fragment: &str, value: &str) -> String {
    fragment.replace(PLACEHOLDER, value)
}

/// @ai:intent Fully resolved command line ready for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ResolvedCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl std::fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;

        for arg in &self.args {
            write!(f, " {arg}")?;
        }

        Ok(())
    }
}

/// @ai:intent Effective run-level settings of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunValues {
    pub iterations: u32,
    pub threads: usize,
}

impl RunValues {
    /// @ai:effects pure
    pub fn value(&self, setting: RunSetting) -> String {
        match setting {
            RunSetting::Iterations => self.iterations.to_string(),
            RunSetting::Threads => self.threads.to_string(),
        }
    }
}

/// @ai:intent Resolves argument groups against one fixed parameter set
/// @ai:effects pure
#[derive(Debug, Clone, Copy)]
pub struct ArgumentResolver<'a> {
    params: &'a ParameterSet,
    settings: RunValues,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(params: &'a ParameterSet, settings: RunValues) -> Self {
        Self { params, settings }
    }

    /// @ai:intent Expand a group into tokens, group order first then fragment order
    /// @ai:pre every referenced parameter exists in the parameter set
    /// @ai:post tokens are never reordered
    /// @ai:effects pure
    pub fn resolve(&self, group: Option<&ArgumentGroup>) -> Result<Vec<String>> {
        let Some(group) = group else {
            return Ok(Vec::new());
        };

        let mut tokens = Vec::new();

        for (name, fragments) in group.entries() {
            let value = self
                .params
                .get(name)
                .ok_or_else(|| Error::UnknownParameter(name.to_string()))?
                .to_string();

            tokens.extend(fragments.iter().map(|fragment| substitute(fragment, &value)));
        }

        Ok(tokens)
    }

    /// @ai:intent Flatten a command, splicing resolved argument groups in place of their slots
    /// @ai:pre command starts with a literal executable
    /// @ai:effects pure
    pub fn build_command(&self, command: &Command, binding: &TargetBinding) -> Result<ResolvedCommand> {
        let mut parts = Vec::new();

        for token in command.tokens() {
            match token {
                CommandToken::Literal(literal) => parts.push(literal.clone()),
                CommandToken::Group { args } => {
                    parts.extend(self.resolve(binding.group(*args))?);
                }
                CommandToken::Setting { setting } => parts.push(self.settings.value(*setting)),
            }
        }

        let mut parts = parts.into_iter();
        // loader rejects commands without a leading literal, so this only trips on hand-built ones
        let program = parts.next().unwrap_or_default();

        Ok(ResolvedCommand::new(program, parts.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ArgsSlot, ParamValue};
    use pretty_assertions::assert_eq;

    const SETTINGS: RunValues = RunValues {
        iterations: 12,
        threads: 4,
    };

    fn params() -> ParameterSet {
        [
            ("size", ParamValue::Integer(1000)),
            ("mode", ParamValue::Text("fast".to_string())),
        ]
        .into_iter()
        .collect()
    }

    fn group(entries: &[(&str, &[&str])]) -> ArgumentGroup {
        entries
            .iter()
            .map(|(name, fragments)| {
                (
                    name.to_string(),
                    fragments.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_literal_fragments_pass_through_in_order() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let group = group(&[("mode", &["--quiet", "-x"]), ("size", &["--flag"])]);

        let tokens = resolver.resolve(Some(&group)).unwrap();
        assert_eq!(tokens, vec!["--quiet", "-x", "--flag"]);
    }

    #[test]
    fn test_placeholders_are_substituted() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let group = group(&[("size", &["--n", "<value>"]), ("mode", &["--mode=<value>-<value>"])]);

        let tokens = resolver.resolve(Some(&group)).unwrap();
        assert_eq!(tokens, vec!["--n", "1000", "--mode=fast-fast"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let group = group(&[("size", &["<value>"]), ("mode", &["<value>"])]);

        let first = resolver.resolve(Some(&group)).unwrap();
        let second = resolver.resolve(Some(&group)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_or_empty_group_yields_no_tokens() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);

        assert!(resolver.resolve(None).unwrap().is_empty());
        assert!(resolver.resolve(Some(&ArgumentGroup::default())).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_parameter_fails() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let group = group(&[("threads", &["<value>"])]);

        let err = resolver.resolve(Some(&group)).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "threads"));
    }

    #[test]
    fn test_build_command_flattens_slots() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let binding = TargetBinding {
            run_args: Some(group(&[("size", &["--n", "<value>"])])),
            ..Default::default()
        };
        let command = Command::new(vec![
            CommandToken::Literal("bench".to_string()),
            CommandToken::Group { args: ArgsSlot::Run },
            CommandToken::Literal("--verbose".to_string()),
            CommandToken::Group { args: ArgsSlot::Gen },
        ]);

        let resolved = resolver.build_command(&command, &binding).unwrap();
        assert_eq!(resolved.program, "bench");
        assert_eq!(resolved.args, vec!["--n", "1000", "--verbose"]);
        assert_eq!(resolved.to_string(), "bench --n 1000 --verbose");
    }

    #[test]
    fn test_setting_tokens_take_run_values() {
        let params = params();
        let resolver = ArgumentResolver::new(&params, SETTINGS);
        let command = Command::new(vec![
            CommandToken::Literal("bench".to_string()),
            CommandToken::Setting {
                setting: RunSetting::Iterations,
            },
            CommandToken::Literal("-t".to_string()),
            CommandToken::Setting {
                setting: RunSetting::Threads,
            },
        ]);

        let resolved = resolver.build_command(&command, &TargetBinding::default()).unwrap();
        assert_eq!(resolved.to_string(), "bench 12 -t 4");
    }
}
