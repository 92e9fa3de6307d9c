//! @ai:module:intent TOML loader for benchmark and target definitions
//! @ai:module:layer infrastructure
//! @ai:module:public_api SpecLoader, SpecLoaderTrait
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::spec::benchmark::BenchmarkSpec;
use crate::spec::target::TargetSpec;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for loading benchmark and target definitions
pub trait SpecLoaderTrait: Send + Sync {
    /// @ai:intent Load all benchmark definitions from a directory
    fn load_benchmarks(&self, dir: &Path) -> Result<Vec<BenchmarkSpec>>;

    /// @ai:intent Load all target definitions from a directory
    fn load_targets(&self, dir: &Path) -> Result<Vec<TargetSpec>>;

    /// @ai:intent Load a single benchmark by name
    fn load_benchmark(&self, dir: &Path, name: &str) -> Result<BenchmarkSpec>;

    /// @ai:intent Load a single target by name
    fn load_target(&self, dir: &Path, name: &str) -> Result<TargetSpec>;
}

/// @ai:intent Loads definitions from TOML files, one definition per file
/// @ai:effects pure (stateless)
pub struct SpecLoader;

impl SpecLoader {
    /// @ai:intent Create a new definition loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse a single definition file
    /// @ai:pre path points to a TOML file
    /// @ai:effects fs:read
    fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::SpecParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:intent Find all TOML files in directory, sorted by path
    /// @ai:effects fs:read
    fn find_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// @ai:intent Load and validate a target file
    /// @ai:effects fs:read
    fn parse_target_file(path: &Path) -> Result<TargetSpec> {
        let target: TargetSpec = Self::parse_file(path)?;
        validate_target(&target, path)?;
        Ok(target)
    }

    /// @ai:intent Load every file of a kind, skipping files that fail to parse
    /// @ai:effects fs:read
    fn load_all<T, F>(dir: &Path, parse: F) -> Vec<T>
    where
        F: Fn(&Path) -> Result<T>,
    {
        let mut specs = Vec::new();

        for path in Self::find_files(dir) {
            match parse(&path) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    tracing::warn!("Skipping invalid definition {}: {}", path.display(), e);
                }
            }
        }

        specs
    }

    /// @ai:intent Locate the file defining `name`, preferring `<name>.toml`
    /// @ai:effects fs:read
    fn find_named<T, F>(dir: &Path, name: &str, parse: F, name_of: fn(&T) -> &str) -> Result<Option<T>>
    where
        F: Fn(&Path) -> Result<T>,
    {
        let direct = dir.join(format!("{name}.toml"));

        if direct.is_file() {
            let spec = parse(&direct)?;

            if name_of(&spec) == name {
                return Ok(Some(spec));
            }
        }

        Ok(Self::load_all(dir, parse)
            .into_iter()
            .find(|spec| name_of(spec) == name))
    }
}

impl Default for SpecLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Reject commands that cannot be executed
/// @ai:effects pure
fn validate_target(target: &TargetSpec, path: &Path) -> Result<()> {
    for (stage, command) in target.commands() {
        if command.program().is_none() {
            return Err(Error::InvalidSpec {
                path: path.to_path_buf(),
                message: format!(
                    "{} command of target {} must start with a literal executable",
                    stage, target.name
                ),
            });
        }
    }

    Ok(())
}

impl SpecLoaderTrait for SpecLoader {
    /// @ai:intent Load all benchmark definitions
    /// @ai:effects fs:read
    fn load_benchmarks(&self, dir: &Path) -> Result<Vec<BenchmarkSpec>> {
        let mut benchmarks = Self::load_all(dir, Self::parse_file::<BenchmarkSpec>);
        benchmarks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(benchmarks)
    }

    /// @ai:intent Load all target definitions
    /// @ai:effects fs:read
    fn load_targets(&self, dir: &Path) -> Result<Vec<TargetSpec>> {
        let mut targets = Self::load_all(dir, Self::parse_target_file);
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    /// @ai:intent Load a single benchmark by name
    /// @ai:effects fs:read
    fn load_benchmark(&self, dir: &Path, name: &str) -> Result<BenchmarkSpec> {
        Self::find_named(dir, name, Self::parse_file::<BenchmarkSpec>, |b| b.name.as_str())?
            .ok_or_else(|| Error::BenchmarkNotFound(name.to_string()))
    }

    /// @ai:intent Load a single target by name
    /// @ai:effects fs:read
    fn load_target(&self, dir: &Path, name: &str) -> Result<TargetSpec> {
        Self::find_named(dir, name, Self::parse_target_file, |t| t.name.as_str())?
            .ok_or_else(|| Error::TargetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_benchmark_by_file_name() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "sort.toml",
            "name = \"sort\"\n[params]\nsize = 1000\n[targets.quicksort]\n",
        );

        let loader = SpecLoader::new();
        let benchmark = loader.load_benchmark(temp.path(), "sort").unwrap();
        assert_eq!(benchmark.name, "sort");
        assert!(benchmark.supports("quicksort"));
    }

    #[test]
    fn test_load_benchmark_by_name_field() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "nested/pingpong.toml", "name = \"PingPong\"\n");

        let loader = SpecLoader::new();
        let benchmark = loader.load_benchmark(temp.path(), "PingPong").unwrap();
        assert_eq!(benchmark.name, "PingPong");
    }

    #[test]
    fn test_missing_benchmark_is_not_found() {
        let temp = TempDir::new().unwrap();
        let loader = SpecLoader::new();

        let err = loader.load_benchmark(temp.path(), "sort").unwrap_err();
        assert!(matches!(err, Error::BenchmarkNotFound(name) if name == "sort"));
    }

    #[test]
    fn test_target_without_literal_program_is_invalid() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "bad.toml", "name = \"bad\"\nrun = [{ args = \"run\" }]\n");

        let loader = SpecLoader::new();
        let err = loader.load_target(temp.path(), "bad").unwrap_err();
        assert!(matches!(err, Error::InvalidSpec { .. }));

        // listing skips the invalid file instead of failing
        assert!(loader.load_targets(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_targets_sorted() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "b.toml", "name = \"zeta\"\nrun = [\"z\"]\n");
        write_file(temp.path(), "a.toml", "name = \"alpha\"\nrun = [\"a\"]\n");

        let loader = SpecLoader::new();
        let names: Vec<_> = loader
            .load_targets(temp.path())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_bundled_conf_is_compatible() {
        let conf = Path::new(env!("CARGO_MANIFEST_DIR")).join("conf");
        let loader = SpecLoader::new();

        let benchmark = loader.load_benchmark(&conf.join("benchmark"), "spin").unwrap();
        let target = loader.load_target(&conf.join("target"), "posix-sh").unwrap();

        let report = crate::checker::CompatibilityChecker::check(&benchmark, &target.name);
        assert!(report.diagnostics.is_empty());
        assert!(target.parser.is_some());
    }
}
