//! @ai:module:intent Benchmark and target definitions and their loading
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkSpec, TargetSpec, ParameterSet, ArgumentGroup, SpecLoader

pub mod benchmark;
pub mod loader;
pub mod params;
pub mod target;

pub use benchmark::{ArgsSlot, ArgumentGroup, BenchmarkSpec, TargetBinding, PLACEHOLDER};
pub use loader::{SpecLoader, SpecLoaderTrait};
pub use params::{format_float, ParamValue, ParameterSet};
pub use target::{Command, CommandToken, LifecycleStage, RunSetting, TargetSpec};
