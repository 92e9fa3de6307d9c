//! @ai:module:intent Drive one benchmark run: check, execute lifecycle, write results
//! @ai:module:layer application
//! @ai:module:public_api RunPlan, RunOutcome, RunManifest
//! @ai:module:stateless false

use crate::checker::{CompatibilityChecker, CompatibilityReport};
use crate::config::RunSettings;
use crate::error::{Error, Result};
use crate::resolver::RunValues;
use crate::results::{ResultWriter, RunContext};
use crate::runner::executor::{CommandExecutor, CommandExecutorTrait, ErrorPolicy};
use crate::runner::lifecycle::LifecycleRunner;
use crate::spec::{BenchmarkSpec, ParameterSet, TargetSpec};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

const RESULTS_FILE: &str = "results.csv";
const MANIFEST_FILE: &str = "run.toml";

/// @ai:intent How a run ended without an error
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { samples: usize, results_path: PathBuf },
    /// Compatibility check failed under the continue policy; nothing executed
    Skipped { report: CompatibilityReport },
}

/// @ai:intent Record of a run's effective configuration, written next to its results
#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub benchmark: &'a str,
    pub target: &'a str,
    pub started_at: DateTime<Utc>,
    pub iterations: u32,
    pub threads: usize,
    pub continue_on_error: bool,
    pub params: &'a ParameterSet,
    pub target_params: &'a ParameterSet,
}

/// @ai:intent Everything one isolated pipeline invocation needs
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Benchmark with the effective parameter values of this run
    pub benchmark: BenchmarkSpec,
    pub target: TargetSpec,
    pub iterations: u32,
    pub threads: usize,
    pub policy: ErrorPolicy,
    /// Working directory of every command and home of the results file
    pub run_dir: PathBuf,
}

impl RunPlan {
    /// @ai:intent Build a plan with `params` replacing the benchmark's declared values
    /// @ai:effects env
    pub fn new(
        benchmark: &BenchmarkSpec,
        target: &TargetSpec,
        params: ParameterSet,
        settings: &RunSettings,
        run_dir: PathBuf,
    ) -> Self {
        let mut benchmark = benchmark.clone();
        benchmark.params = params;

        Self {
            benchmark,
            target: target.clone(),
            iterations: settings.iterations,
            threads: settings.resolved_threads(),
            policy: settings.policy(),
            run_dir,
        }
    }

    /// @ai:intent Execute with a process executor rooted in the run directory
    /// @ai:effects process, fs:write
    pub fn execute(&self) -> Result<RunOutcome> {
        let executor = CommandExecutor::new(self.policy).in_dir(&self.run_dir);
        self.execute_with(&executor)
    }

    /// @ai:intent Gate on compatibility, run the lifecycle, write results
    /// @ai:post under abort policy any failure leaves no results file
    /// @ai:effects process, fs:write
    pub fn execute_with<E: CommandExecutorTrait>(&self, executor: &E) -> Result<RunOutcome> {
        let benchmark = &self.benchmark;
        let target = &self.target;

        tracing::info!("Running {} using the {} target.", benchmark.name, target.name);

        let report = CompatibilityChecker::check(benchmark, &target.name);
        report.log();

        if !report.passed() {
            return match self.policy {
                ErrorPolicy::Continue => {
                    tracing::error!("Skipping {} on {}: incompatible configuration", benchmark.name, target.name);
                    Ok(RunOutcome::Skipped { report })
                }
                ErrorPolicy::Abort => Err(Error::CompatibilityFailed {
                    benchmark: benchmark.name.clone(),
                    target: target.name.clone(),
                    violations: report.error_count(),
                }),
            };
        }

        let binding = benchmark
            .binding(&target.name)
            .ok_or_else(|| Error::UnsupportedTarget {
                benchmark: benchmark.name.clone(),
                target: target.name.clone(),
            })?;

        let parser = binding
            .parser
            .as_ref()
            .or(target.parser.as_ref())
            .ok_or_else(|| Error::MissingParser(target.name.clone()))?
            .build()?;

        std::fs::create_dir_all(&self.run_dir)?;
        self.write_manifest()?;

        let settings = RunValues {
            iterations: self.iterations,
            threads: self.threads,
        };
        let runner = LifecycleRunner::new(executor, &benchmark.params, settings);
        let times = runner.run(target, binding, parser.as_ref())?;

        let context = RunContext {
            benchmark: &benchmark.name,
            target: &target.name,
            total_iterations: self.iterations,
            threads: self.threads,
            benchmark_params: &benchmark.params,
            target_params: &target.params,
        };

        let results_path = self.run_dir.join(RESULTS_FILE);
        ResultWriter::new().write_file(&context, &times, &results_path)?;

        Ok(RunOutcome::Completed {
            samples: times.len(),
            results_path,
        })
    }

    /// @ai:effects fs:write
    fn write_manifest(&self) -> Result<()> {
        let manifest = RunManifest {
            benchmark: &self.benchmark.name,
            target: &self.target.name,
            started_at: Utc::now(),
            iterations: self.iterations,
            threads: self.threads,
            continue_on_error: self.policy == ErrorPolicy::Continue,
            params: &self.benchmark.params,
            target_params: &self.target.params,
        };

        std::fs::write(self.run_dir.join(MANIFEST_FILE), toml::to_string_pretty(&manifest)?)?;
        Ok(())
    }
}


#[cfg(all(test, unix))]
mod process_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn spin_benchmark() -> BenchmarkSpec {
        toml::from_str(
            r#"
name = "spin"
[params]
delay = 0
[targets.posix-sh]
run_args = { delay = ["<value>"] }
"#,
        )
        .unwrap()
    }

    fn shell_target(prepare: &str) -> TargetSpec {
        let content = format!(
            r#"
name = "posix-sh"
parser = {{ pattern = 'took ([0-9.]+) ms' }}
prepare = ["sh", "-c", "{prepare}"]
run = [
    "sh",
    "-c",
    'for i in $(seq "$1"); do sleep "$2"; echo "took 1.5 ms"; done',
    "spin",
    {{ setting = "iterations" }},
    {{ args = "run" }},
]
"#
        );
        toml::from_str(&content).unwrap()
    }

    fn plan(target: &TargetSpec, dir: &TempDir, continue_on_error: bool) -> RunPlan {
        let benchmark = spin_benchmark();
        let settings = RunSettings {
            iterations: 3,
            threads: Some(2),
            continue_on_error,
        };
        RunPlan::new(
            &benchmark,
            target,
            benchmark.params.clone(),
            &settings,
            dir.path().join("run"),
        )
    }

    #[test]
    fn test_iterations_setting_drives_sample_count() {
        let temp = TempDir::new().unwrap();
        let plan = plan(&shell_target("true"), &temp, false);

        let outcome = plan.execute().unwrap();

        let RunOutcome::Completed { samples, results_path } = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(samples, 3);

        let csv = std::fs::read_to_string(results_path).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().skip(1).all(|row| row.starts_with("spin,posix-sh,3,2,")));
    }

    #[test]
    fn test_failing_prepare_aborts_without_results() {
        let temp = TempDir::new().unwrap();
        let plan = plan(&shell_target("exit 3"), &temp, false);

        let err = plan.execute().unwrap_err();

        assert!(matches!(err, Error::CommandFailed { exit_code: 3, .. }));
        assert!(!temp.path().join("run").join(RESULTS_FILE).exists());
    }

    #[test]
    fn test_failing_prepare_continues_under_continue_policy() {
        let temp = TempDir::new().unwrap();
        let plan = plan(&shell_target("exit 3"), &temp, true);

        let outcome = plan.execute().unwrap();

        assert!(matches!(outcome, RunOutcome::Completed { samples: 3, .. }));
        assert!(temp.path().join("run").join(RESULTS_FILE).exists());
    }

    #[test]
    fn test_commands_run_inside_run_dir() {
        let temp = TempDir::new().unwrap();
        let plan = plan(&shell_target("touch prepared.txt"), &temp, false);

        plan.execute().unwrap();

        assert!(temp.path().join("run").join("prepared.txt").exists());
    }
}
