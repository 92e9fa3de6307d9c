//! @ai:module:intent Command execution and benchmark lifecycle orchestration
//! @ai:module:layer application
//! @ai:module:public_api CommandExecutor, LifecycleRunner, RunPlan, LogSink, ErrorPolicy

pub mod executor;
pub mod lifecycle;
pub mod pipeline;
pub mod sink;

pub use executor::{CommandExecutor, CommandExecutorTrait, ErrorPolicy, ExecutionResult};
pub use lifecycle::LifecycleRunner;
pub use pipeline::{RunManifest, RunOutcome, RunPlan};
pub use sink::{LogSink, TracingSink};
