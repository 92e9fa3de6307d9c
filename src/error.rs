//! @ai:module:intent Define error types for the benchmark runner
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all benchmark runner operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    SpecParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid definition {path}: {message}")]
    InvalidSpec { path: PathBuf, message: String },

    #[error("Benchmark not found: {0}")]
    BenchmarkNotFound(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Target {target} is not supported by the benchmark {benchmark}")]
    UnsupportedTarget { benchmark: String, target: String },

    #[error("Target {target} is not compatible with benchmark {benchmark} ({violations} violation(s))")]
    CompatibilityFailed {
        benchmark: String,
        target: String,
        violations: usize,
    },

    #[error("{0} is not a parameter of the benchmark")]
    UnknownParameter(String),

    #[error("No run command provided for target {0}")]
    MissingRunCommand(String),

    #[error("No result parser configured for target {0}")]
    MissingParser(String),

    #[error("Failed to start command {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `exit_code` is -1 when the process was terminated by a signal.
    #[error("Command {program} returned with non-zero exit code ({exit_code})")]
    CommandFailed { program: String, exit_code: i32 },

    #[error("{parser} parser could not read {line:?}: {message}")]
    Parse {
        parser: String,
        line: String,
        message: String,
    },

    #[error("Invalid parser pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid parameter override {0:?}, expected key=value")]
    InvalidOverride(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
