//! @ai:module:intent CLI for the parameterized benchmark runner
//! @ai:module:layer presentation

use anyhow::Result;
use bench_runner::{
    checker::CompatibilityChecker,
    config::RunnerConfig,
    results::ResultCollector,
    runner::{RunOutcome, RunPlan},
    spec::{SpecLoader, SpecLoaderTrait},
    sweep::{self, ParamOverride},
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bench-runner")]
#[command(about = "Run parameterized benchmarks against configurable targets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark on a target
    Run {
        /// Benchmark name
        #[arg(short, long)]
        benchmark: String,

        /// Target name
        #[arg(short, long)]
        target: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of iterations recorded with the results
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Thread count recorded with the results (default: available parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Log failing commands and keep going instead of aborting
        #[arg(long)]
        continue_on_error: bool,

        /// Override a benchmark parameter; comma-separated values sweep (key=v1,v2)
        #[arg(short, long = "param", value_name = "KEY=VALUES")]
        params: Vec<ParamOverride>,

        /// Output directory for run results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a target is compatible with a benchmark
    Check {
        /// Benchmark name
        #[arg(short, long)]
        benchmark: String,

        /// Target name
        #[arg(short, long)]
        target: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List benchmarks and their supported targets
    List {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Combine results.csv files from many runs into one table
    Collect {
        /// Directory searched recursively for results.csv files
        src: PathBuf,

        /// Output CSV file
        out: PathBuf,

        /// Keep every sample instead of min/max/median/mean per run
        #[arg(long)]
        raw: bool,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "bench-runner.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bench_runner=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            benchmark,
            target,
            config,
            iterations,
            threads,
            continue_on_error,
            params,
            output,
        } => run_benchmark(RunArgs {
            benchmark,
            target,
            config,
            iterations,
            threads,
            continue_on_error,
            params,
            output,
        })
        .map(|_| ExitCode::SUCCESS),
        Commands::Check {
            benchmark,
            target,
            config,
            json,
        } => check(&benchmark, &target, config, json),
        Commands::List { config } => list(config).map(|_| ExitCode::SUCCESS),
        Commands::Collect { src, out, raw } => collect(&src, &out, raw).map(|_| ExitCode::SUCCESS),
        Commands::Init { output } => init_config(output).map(|_| ExitCode::SUCCESS),
    }
}

struct RunArgs {
    benchmark: String,
    target: String,
    config: Option<PathBuf>,
    iterations: Option<u32>,
    threads: Option<usize>,
    continue_on_error: bool,
    params: Vec<ParamOverride>,
    output: Option<PathBuf>,
}

/// @ai:intent Run a benchmark once per sweep point, each in its own directory
/// @ai:effects process, fs:read, fs:write
fn run_benchmark(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(iterations) = args.iterations {
        config.run.iterations = iterations;
    }
    if args.threads.is_some() {
        config.run.threads = args.threads;
    }
    if args.continue_on_error {
        config.run.continue_on_error = true;
    }
    if let Some(output) = args.output {
        config.paths.output_dir = output;
    }

    let loader = SpecLoader::new();
    let benchmark = loader.load_benchmark(&config.paths.benchmarks_dir, &args.benchmark)?;
    let target = loader.load_target(&config.paths.targets_dir, &args.target)?;

    let points = sweep::expand(&benchmark.params, &args.params)?;
    let run_dirs = run_directories(&config.paths.output_dir, points.len())?;

    if points.len() > 1 {
        tracing::info!("Sweeping {} parameter combinations", points.len());
    }

    for (params, run_dir) in points.into_iter().zip(run_dirs) {
        tracing::info!("Output directory: {}", run_dir.display());

        let plan = RunPlan::new(&benchmark, &target, params, &config.run, run_dir);

        match plan.execute()? {
            RunOutcome::Completed {
                samples,
                results_path,
            } => {
                println!("{} samples written to {}", samples, results_path.display());
            }
            RunOutcome::Skipped { report } => {
                println!(
                    "Skipped {} on {}: {} error(s)",
                    benchmark.name,
                    target.name,
                    report.error_count()
                );
            }
        }
    }

    Ok(())
}

/// @ai:intent Timestamped run directories; sweeps get one numbered subdirectory per point
/// @ai:effects time, env
fn run_directories(output_dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    let now = chrono::Utc::now();
    let date = now.format("%Y-%m-%d").to_string();
    let time = now.format("%H-%M-%S").to_string();
    let output_dir = std::path::absolute(output_dir)?;

    if count == 1 {
        return Ok(vec![output_dir.join(date).join(time)]);
    }

    let base = output_dir.join("multirun").join(date).join(time);
    Ok((0..count).map(|i| base.join(i.to_string())).collect())
}

/// @ai:intent Print compatibility diagnostics; failure exits non-zero
/// @ai:effects fs:read, io
fn check(benchmark: &str, target: &str, config: Option<PathBuf>, json: bool) -> Result<ExitCode> {
    let config = load_or_default_config(config)?;
    let benchmark = SpecLoader::new().load_benchmark(&config.paths.benchmarks_dir, benchmark)?;

    let report = CompatibilityChecker::check(&benchmark, target);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for diagnostic in &report.diagnostics {
            let level = match diagnostic.severity() {
                bench_runner::Severity::Error => "ERROR",
                bench_runner::Severity::Warning => "WARN",
            };
            println!("{level} {diagnostic}");
        }

        if report.passed() {
            println!("{} is compatible with {}", target, benchmark.name);
        }
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// @ai:intent List available benchmarks
/// @ai:effects fs:read, io
fn list(config: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config)?;
    let benchmarks = SpecLoader::new().load_benchmarks(&config.paths.benchmarks_dir)?;

    println!("Available benchmarks ({}):", benchmarks.len());
    println!();
    println!("{:<30} {:<40} {}", "Name", "Targets", "Parameters");
    println!("{}", "-".repeat(90));

    for benchmark in &benchmarks {
        let targets: Vec<_> = benchmark.target_names().collect();
        let params: Vec<_> = benchmark
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();

        println!(
            "{:<30} {:<40} {}",
            benchmark.name,
            targets.join(", "),
            params.join(" ")
        );
    }

    Ok(())
}

/// @ai:intent Collect results files into one table
/// @ai:effects fs:read, fs:write
fn collect(src: &Path, out: &Path, raw: bool) -> Result<()> {
    if !src.is_dir() {
        anyhow::bail!("Not a directory: {}", src.display());
    }

    let table = ResultCollector::new(raw).collect(src)?;
    table.write_file(out)?;

    println!("Collected {} rows into {}", table.rows.len(), out.display());
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = RunnerConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<RunnerConfig> {
    match path {
        Some(p) => RunnerConfig::load(&p),
        None => {
            let default_path = PathBuf::from("bench-runner.toml");

            if default_path.exists() {
                RunnerConfig::load(&default_path)
            } else {
                Ok(RunnerConfig::default())
            }
        }
    }
}
