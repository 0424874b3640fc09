use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "pathlabel workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search benchmarks and write a report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Criterion baseline to save the run under
        #[arg(long, default_value = "current")]
        baseline: String,

        /// Build with the `tracing` feature to measure its overhead
        #[arg(long, default_value_t = false)]
        tracing: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH: &str = "search_benchmark";
const REPORT_PATH: &str = "benchmark_results/report.md";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            baseline,
            tracing,
            report_only,
        } => {
            if !report_only {
                run_benchmarks(quick, &baseline, tracing)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, baseline: &str, tracing: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let mut build = Command::new("cargo");
    build.args(["build", "--bench", BENCH, "--release"]);
    if tracing {
        build.args(["--features", "tracing"]);
    }
    let status = build.status().context("Failed to spawn cargo build")?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    println!("\n>>> Benchmarking baseline: {baseline}");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", BENCH]);
    if tracing {
        cmd.args(["--features", "tracing"]);
    }

    // Args for the test runner (Criterion) go after --
    cmd.arg("--").arg("--save-baseline").arg(baseline);
    if quick {
        cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run benchmarks for baseline {baseline}"))?;
    if !status.success() {
        anyhow::bail!("Benchmarks failed for baseline {baseline}");
    }
    println!("Finished {baseline} in {:.2?}", start.elapsed());
    Ok(())
}

#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// Workload -> baseline -> throughput (elements or iterations per second).
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, criterion_dir, &mut results)?;

    let baselines: BTreeSet<&String> = results.values().flat_map(BTreeMap::keys).collect();
    let reference = baselines.iter().next().copied();

    let report_path = Path::new(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("Failed to create {}", report_path.display()))?;

    writeln!(file, "# Search Benchmark Report")?;
    writeln!(file)?;

    write!(file, "| Workload |")?;
    for baseline in &baselines {
        write!(file, " {baseline} (ops/s) | vs {} |", reference.map_or("-", String::as_str))?;
    }
    writeln!(file)?;

    write!(file, "|---|")?;
    for _ in &baselines {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    for (workload, by_baseline) in &results {
        write!(file, "| {workload} |")?;
        let reference_ops = reference
            .and_then(|r| by_baseline.get(r))
            .copied()
            .unwrap_or(0.0);

        for baseline in &baselines {
            match by_baseline.get(*baseline) {
                Some(&ops) => {
                    let rel = if reference_ops > 0.0 { ops / reference_ops } else { 0.0 };
                    write!(file, " {} | **{rel:.2}x** |", format_ops(ops))?;
                }
                None => write!(file, " N/A | - |")?,
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks criterion's output tree. Layout: `<root>/<group>[/<param>]/<baseline>/estimates.json`.
fn collect_results(root: &Path, dir: &Path, results: &mut Results) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(root, &path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else { continue };
        let Some(workload_dir) = baseline_dir.parent() else { continue };
        let Some(baseline) = baseline_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if baseline == "report" || baseline == "new" || baseline == "base" || baseline == "change" {
            continue;
        }
        let workload = workload_dir
            .strip_prefix(root)
            .unwrap_or(workload_dir)
            .to_string_lossy()
            .replace('\\', "/");

        let mut elements = None;
        let bench_json = baseline_dir.join("benchmark.json");
        if let Ok(content) = fs::read_to_string(&bench_json) {
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Malformed {}", bench_json.display()))?;
            elements = json
                .get("throughput")
                .and_then(|t| t.get("Elements"))
                .and_then(serde_json::Value::as_f64);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let estimates: Estimates = serde_json::from_str(&content)
            .with_context(|| format!("Malformed {}", path.display()))?;
        let time_ns = estimates.mean.point_estimate;
        if time_ns <= 0.0 {
            continue;
        }

        let metric = elements.unwrap_or(1.0) * 1e9 / time_ns;
        results
            .entry(workload)
            .or_default()
            .insert(baseline.to_string(), metric);
    }
    Ok(())
}
