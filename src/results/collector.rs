//! @ai:module:intent Gather results tables from many runs into one table
//! @ai:module:layer application
//! @ai:module:public_api ResultCollector, CollectedTable, TimingSummary
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::spec::format_float;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const RESULTS_FILE: &str = "results.csv";

type Row = IndexMap<String, String>;

/// @ai:intent Min, max, median and mean of a run's samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mean: f64,
}

impl TimingSummary {
    /// @ai:intent Summarize samples; None when there are none
    /// @ai:effects pure
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            median,
            mean: sorted.iter().sum::<f64>() / n as f64,
        })
    }
}

/// @ai:intent Table with an ordered column union; missing cells are empty
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl CollectedTable {
    fn push(&mut self, row: Row) {
        for column in row.keys() {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }

        self.rows.push(row);
    }

    /// @ai:effects io
    pub fn write<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;

        for row in &self.rows {
            csv.write_record(
                self.columns
                    .iter()
                    .map(|column| row.get(column).map(String::as_str).unwrap_or("")),
            )?;
        }

        csv.flush()?;
        Ok(())
    }

    /// @ai:effects fs:write
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(file)
    }
}

/// @ai:intent Collects `results.csv` files below a directory
pub struct ResultCollector {
    raw: bool,
}

impl ResultCollector {
    /// @ai:intent `raw` keeps every sample; otherwise each file collapses to summary rows
    /// @ai:effects pure
    pub fn new(raw: bool) -> Self {
        Self { raw }
    }

    /// @ai:intent Find all results files, sorted by path
    /// @ai:effects fs:read
    pub fn find_results(src: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(src)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == RESULTS_FILE)
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// @ai:intent Read and combine every results file below `src`
    /// @ai:effects fs:read
    pub fn collect(&self, src: &Path) -> Result<CollectedTable> {
        let mut table = CollectedTable::default();

        for path in Self::find_results(src) {
            tracing::debug!("Collecting {}", path.display());
            let rows = read_rows(&path)?;

            let rows = if self.raw { rows } else { summarize(&path, rows)? };

            for row in rows {
                table.push(row);
            }
        }

        tracing::info!("Collected {} rows from {}", table.rows.len(), src.display());
        Ok(table)
    }
}

/// @ai:effects fs:read
fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }

    Ok(rows)
}

/// @ai:intent Drop per-sample columns, de-duplicate, append timing summary
/// @ai:effects pure
fn summarize(path: &Path, rows: Vec<Row>) -> Result<Vec<Row>> {
    let mut samples = Vec::with_capacity(rows.len());
    let mut reduced: Vec<Row> = Vec::new();

    for mut row in rows {
        if let Some(time) = row.shift_remove("time_ms") {
            let value = time.trim().parse::<f64>().map_err(|e| Error::Parse {
                parser: format!("results {}", path.display()),
                line: time.clone(),
                message: e.to_string(),
            })?;
            samples.push(value);
        }
        row.shift_remove("iteration");

        if !reduced.contains(&row) {
            reduced.push(row);
        }
    }

    let summary = TimingSummary::from_samples(&samples);
    let cell = |pick: fn(&TimingSummary) -> f64| {
        summary
            .as_ref()
            .map(|s| format_float(pick(s)))
            .unwrap_or_default()
    };

    for row in &mut reduced {
        row.insert("min_time_ms".to_string(), cell(|s| s.min));
        row.insert("max_time_ms".to_string(), cell(|s| s.max));
        row.insert("median_time_ms".to_string(), cell(|s| s.median));
        row.insert("mean_time_ms".to_string(), cell(|s| s.mean));
    }

    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_results(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel).join(RESULTS_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn table_to_string(table: &CollectedTable) -> String {
        let mut buf = Vec::new();
        table.write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_statistics() {
        let summary = TimingSummary::from_samples(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.mean, 2.5);
        assert!(TimingSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_collect_summarizes_each_run() {
        let temp = TempDir::new().unwrap();
        write_results(
            temp.path(),
            "0",
            "benchmark,target,iteration,time_ms,size\nsort,quick,0,3.0,10\nsort,quick,1,1.0,10\nsort,quick,2,2.0,10\n",
        );
        write_results(
            temp.path(),
            "1",
            "benchmark,target,iteration,time_ms,size\nsort,quick,0,5.0,20\n",
        );

        let table = ResultCollector::new(false).collect(temp.path()).unwrap();

        assert_eq!(
            table_to_string(&table),
            "benchmark,target,size,min_time_ms,max_time_ms,median_time_ms,mean_time_ms\n\
             sort,quick,10,1.0,3.0,2.0,2.0\n\
             sort,quick,20,5.0,5.0,5.0,5.0\n"
        );
    }

    #[test]
    fn test_collect_raw_unions_columns() {
        let temp = TempDir::new().unwrap();
        write_results(temp.path(), "a", "benchmark,time_ms,size\nsort,1.0,10\n");
        write_results(temp.path(), "b", "benchmark,time_ms,depth\nsort,2.0,3\n");

        let table = ResultCollector::new(true).collect(temp.path()).unwrap();

        assert_eq!(
            table_to_string(&table),
            "benchmark,time_ms,size,depth\nsort,1.0,10,\nsort,2.0,,3\n"
        );
    }

    #[test]
    fn test_header_only_file_contributes_no_rows() {
        let temp = TempDir::new().unwrap();
        write_results(temp.path(), "0", "benchmark,iteration,time_ms\n");

        let table = ResultCollector::new(false).collect(temp.path()).unwrap();

        assert!(table.rows.is_empty());
        assert_eq!(table.columns, Vec::<String>::new());
    }
}
