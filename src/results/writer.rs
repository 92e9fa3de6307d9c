//! @ai:module:intent Flatten timing samples into result rows and write them as CSV
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultWriter, ResultRow, RunContext
//! @ai:module:stateless true

use crate::error::Result;
use crate::spec::{format_float, ParameterSet};
use indexmap::IndexMap;
use std::path::Path;

const ITERATION: &str = "iteration";
const TIME_MS: &str = "time_ms";

/// @ai:intent Identity and settings shared by every row of one run
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub benchmark: &'a str,
    pub target: &'a str,
    pub total_iterations: u32,
    pub threads: usize,
    pub benchmark_params: &'a ParameterSet,
    pub target_params: &'a ParameterSet,
}

impl RunContext<'_> {
    /// @ai:intent Parameter columns; target values win over benchmark values of the same name
    /// @ai:effects pure
    fn params(&self) -> IndexMap<String, String> {
        self.benchmark_params
            .iter()
            .chain(self.target_params.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

/// @ai:intent One timing sample with its run context
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub benchmark: String,
    pub target: String,
    pub total_iterations: u32,
    pub threads: usize,
    pub iteration: usize,
    pub time_ms: f64,
    pub params: IndexMap<String, String>,
}

impl ResultRow {
    /// @ai:intent Cell for a column; iteration and time always come from the sample
    /// @ai:effects pure
    pub fn value(&self, column: &str) -> String {
        match column {
            ITERATION => self.iteration.to_string(),
            TIME_MS => format_float(self.time_ms),
            _ => {
                if let Some(value) = self.params.get(column) {
                    return value.clone();
                }

                match column {
                    "benchmark" => self.benchmark.clone(),
                    "target" => self.target.clone(),
                    "total_iterations" => self.total_iterations.to_string(),
                    "threads" => self.threads.to_string(),
                    _ => String::new(),
                }
            }
        }
    }

    pub fn record(&self, header: &[String]) -> Vec<String> {
        header.iter().map(|column| self.value(column)).collect()
    }
}

/// @ai:intent Writes results tables
pub struct ResultWriter;

impl ResultWriter {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Column order: run metadata, iteration, time, then parameters
    /// @ai:post a parameter sharing a metadata column name does not add a column
    /// @ai:effects pure
    pub fn header(&self, context: &RunContext<'_>) -> Vec<String> {
        let mut header: Vec<String> = ["benchmark", "target", "total_iterations", "threads", ITERATION, TIME_MS]
            .iter()
            .map(|c| c.to_string())
            .collect();

        for name in context.params().into_keys() {
            if !header.contains(&name) {
                header.push(name);
            }
        }

        header
    }

    /// @ai:intent One row per sample, zero-based iteration, input order kept
    /// @ai:effects pure
    pub fn rows(&self, context: &RunContext<'_>, times: &[f64]) -> Vec<ResultRow> {
        let params = context.params();

        times
            .iter()
            .enumerate()
            .map(|(iteration, &time_ms)| ResultRow {
                benchmark: context.benchmark.to_string(),
                target: context.target.to_string(),
                total_iterations: context.total_iterations,
                threads: context.threads,
                iteration,
                time_ms,
                params: params.clone(),
            })
            .collect()
    }

    /// @ai:intent Serialize header and rows as CSV
    /// @ai:post empty `times` writes only the header
    /// @ai:effects io
    pub fn write<W: std::io::Write>(&self, context: &RunContext<'_>, times: &[f64], writer: W) -> Result<()> {
        let header = self.header(context);
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(&header)?;

        for row in self.rows(context, times) {
            csv.write_record(row.record(&header))?;
        }

        csv.flush()?;
        Ok(())
    }

    /// @ai:intent Write the results table to a file
    /// @ai:effects fs:write
    pub fn write_file(&self, context: &RunContext<'_>, times: &[f64], path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(context, times, file)?;

        tracing::info!("Wrote {} result rows to {}", times.len(), path.display());
        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}
