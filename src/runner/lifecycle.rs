//! @ai:module:intent Sequence a target's lifecycle stages and parse the run output
//! @ai:module:layer application
//! @ai:module:public_api LifecycleRunner
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::parsers::OutputParser;
use crate::resolver::{ArgumentResolver, RunValues};
use crate::runner::executor::CommandExecutorTrait;
use crate::spec::{LifecycleStage, ParameterSet, TargetBinding, TargetSpec};

/// @ai:intent Runs prepare, copy, gen, compile and run in order
pub struct LifecycleRunner<'a, E: CommandExecutorTrait> {
    executor: &'a E,
    resolver: ArgumentResolver<'a>,
}

impl<'a, E: CommandExecutorTrait> LifecycleRunner<'a, E> {
    /// @ai:effects pure
    pub fn new(executor: &'a E, params: &'a ParameterSet, settings: RunValues) -> Self {
        Self {
            executor,
            resolver: ArgumentResolver::new(params, settings),
        }
    }

    /// @ai:intent Execute every defined stage and return the parsed run timings
    /// @ai:pre target defines a run command
    /// @ai:post no stage starts before the previous one finished
    /// @ai:effects process, io
    pub fn run(
        &self,
        target: &TargetSpec,
        binding: &TargetBinding,
        parser: &dyn OutputParser,
    ) -> Result<Vec<f64>> {
        let run = target
            .command(LifecycleStage::Run)
            .ok_or_else(|| Error::MissingRunCommand(target.name.clone()))?;

        for stage in LifecycleStage::SETUP {
            let Some(command) = target.command(stage) else {
                continue;
            };

            tracing::info!("Stage {} of target {}", stage, target.name);
            let resolved = self.resolver.build_command(command, binding)?;
            self.executor.execute(&resolved)?;
        }

        tracing::info!("Stage {} of target {}", LifecycleStage::Run, target.name);
        let resolved = self.resolver.build_command(run, binding)?;
        let output = self.executor.execute(&resolved)?;

        let times = parser.parse(&output.lines)?;
        tracing::info!("Parsed {} timing samples", times.len());

        Ok(times)
    }
}
