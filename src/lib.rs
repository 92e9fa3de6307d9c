//! @ai:module:intent Parameterized benchmark runner library
//! @ai:module:layer application
//! @ai:module:public_api config, spec, resolver, checker, runner, parsers, results, sweep, error

pub mod checker;
pub mod config;
pub mod error;
pub mod parsers;
pub mod resolver;
pub mod results;
pub mod runner;
pub mod spec;
pub mod sweep;

pub use checker::{CompatibilityChecker, CompatibilityReport, Diagnostic, Severity};
pub use config::{PathConfig, RunSettings, RunnerConfig};
pub use error::{Error, Result};
pub use parsers::{BuiltinParser, OutputParser, ParserRef, PatternParser};
pub use resolver::{ArgumentResolver, ResolvedCommand, RunValues};
pub use results::{ResultCollector, ResultWriter, RunContext};
pub use runner::{CommandExecutor, CommandExecutorTrait, ErrorPolicy, LifecycleRunner, RunOutcome, RunPlan};
pub use spec::{BenchmarkSpec, ParameterSet, SpecLoader, SpecLoaderTrait, TargetSpec};
pub use sweep::ParamOverride;
