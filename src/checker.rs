//! @ai:module:intent Validate that a target can run a benchmark before anything executes
//! @ai:module:layer domain
//! @ai:module:public_api CompatibilityChecker, CompatibilityReport, Diagnostic, Severity
//! @ai:module:stateless true

use crate::spec::{ArgsSlot, BenchmarkSpec};
use serde::Serialize;
use std::collections::HashSet;

/// @ai:intent Severity of a compatibility diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// @ai:intent A single finding of the compatibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnsupportedTarget { benchmark: String, target: String },
    UndeclaredParameterReference { parameter: String, group: ArgsSlot },
    UnusedParameter { parameter: String },
}

impl Diagnostic {
    /// @ai:effects pure
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnusedParameter { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedTarget { benchmark, target } => {
                write!(f, "target {target} is not supported by the benchmark {benchmark}")
            }
            Diagnostic::UndeclaredParameterReference { parameter, group } => {
                write!(f, "{parameter} is not a parameter of the benchmark (referenced in {group})")
            }
            Diagnostic::UnusedParameter { parameter } => {
                write!(f, "the benchmark parameter {parameter} is not used in any command")
            }
        }
    }
}

/// @ai:intent Outcome of a compatibility check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl CompatibilityReport {
    /// @ai:intent True when no error-severity diagnostic was recorded
    /// @ai:effects pure
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count()
    }

    /// @ai:intent Emit every diagnostic through tracing at its severity
    /// @ai:effects io
    pub fn log(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic.severity() {
                Severity::Error => tracing::error!("{}", diagnostic),
                Severity::Warning => tracing::warn!("{}", diagnostic),
            }
        }
    }
}

/// @ai:intent Checks benchmark/target compatibility
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    /// @ai:intent Check that `target` is supported and only references declared parameters
    /// @ai:post every undeclared reference is reported, not only the first
    /// @ai:post unused parameters produce warnings that never fail the check
    /// @ai:effects pure
    pub fn check(benchmark: &BenchmarkSpec, target: &str) -> CompatibilityReport {
        let mut report = CompatibilityReport::default();

        let Some(binding) = benchmark.binding(target) else {
            report.diagnostics.push(Diagnostic::UnsupportedTarget {
                benchmark: benchmark.name.clone(),
                target: target.to_string(),
            });
            return report;
        };

        let declared: HashSet<&str> = benchmark.params.names().collect();
        let mut used = HashSet::new();

        for slot in ArgsSlot::ALL {
            let Some(group) = binding.group(slot) else {
                continue;
            };

            for parameter in group.parameters() {
                if declared.contains(parameter) {
                    used.insert(parameter);
                } else {
                    report.diagnostics.push(Diagnostic::UndeclaredParameterReference {
                        parameter: parameter.to_string(),
                        group: slot,
                    });
                }
            }
        }

        for parameter in benchmark.params.names() {
            if !used.contains(parameter) {
                report.diagnostics.push(Diagnostic::UnusedParameter {
                    parameter: parameter.to_string(),
                });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn benchmark(content: &str) -> BenchmarkSpec {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_declared_references_pass_without_diagnostics() {
        let spec = benchmark(
            r#"
name = "sort"
[params]
size = 1000
seed = 1
[targets.quicksort]
gen_args = { seed = ["--seed", "<value>"] }
run_args = { size = ["--n", "<value>"] }
"#,
        );

        let report = CompatibilityChecker::check(&spec, "quicksort");
        assert!(report.passed());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_unsupported_target_fails_immediately() {
        let spec = benchmark("name = \"sort\"\n[params]\nsize = 1\n[targets.quicksort]\n");

        let report = CompatibilityChecker::check(&spec, "bubblesort");
        assert!(!report.passed());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnsupportedTarget {
                benchmark: "sort".to_string(),
                target: "bubblesort".to_string(),
            }]
        );
    }

    #[test]
    fn test_undeclared_reference_names_exactly_that_parameter() {
        let spec = benchmark(
            r#"
name = "sort"
[params]
size = 1000
[targets.quicksort]
run_args = { size = ["--n", "<value>"], depth = ["--depth", "<value>"] }
"#,
        );

        let report = CompatibilityChecker::check(&spec, "quicksort");
        assert!(!report.passed());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UndeclaredParameterReference {
                parameter: "depth".to_string(),
                group: ArgsSlot::Run,
            }]
        );
    }

    #[test]
    fn test_collects_violations_across_all_groups() {
        let spec = benchmark(
            r#"
name = "sort"
[params]
size = 1000
[targets.quicksort]
gen_args = { alpha = ["<value>"] }
compile_args = { beta = ["<value>"] }
run_args = { size = ["<value>"] }
"#,
        );

        let report = CompatibilityChecker::check(&spec, "quicksort");
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_unused_parameter_is_only_a_warning() {
        let spec = benchmark(
            r#"
name = "sort"
[params]
size = 1000
seed = 3
[targets.quicksort]
run_args = { size = ["<value>"] }
"#,
        );

        let report = CompatibilityChecker::check(&spec, "quicksort");
        assert!(report.passed());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnusedParameter {
                parameter: "seed".to_string()
            }]
        );
        assert_eq!(report.diagnostics[0].severity(), Severity::Warning);
    }
}
