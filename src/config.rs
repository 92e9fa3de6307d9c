//! @ai:module:intent Configuration structs for the benchmark runner
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunnerConfig, RunSettings, PathConfig
//! @ai:module:stateless true

use crate::runner::ErrorPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the benchmark runner
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Run-level settings shared by every lifecycle stage
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Defaults to the host's available parallelism when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(default)]
    pub continue_on_error: bool,
}

/// @ai:intent Locations of definitions and run outputs
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_benchmarks_dir")]
    pub benchmarks_dir: PathBuf,
    #[serde(default = "default_targets_dir")]
    pub targets_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            threads: None,
            continue_on_error: false,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            benchmarks_dir: default_benchmarks_dir(),
            targets_dir: default_targets_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_iterations() -> u32 {
    12
}

fn default_benchmarks_dir() -> PathBuf {
    PathBuf::from("conf/benchmark")
}

fn default_targets_dir() -> PathBuf {
    PathBuf::from("conf/target")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl RunSettings {
    /// @ai:intent Error policy derived from `continue_on_error`
    /// @ai:effects pure
    pub fn policy(&self) -> ErrorPolicy {
        ErrorPolicy::from_continue_flag(self.continue_on_error)
    }

    /// @ai:intent Configured thread count, or the host's available parallelism
    /// @ai:effects env
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

impl RunnerConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
