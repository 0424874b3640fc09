//! Runs a search on a generated grid and prints its statistics as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pathlabel::{
    AdjacencyGraph, Direction, LabelSearch, Pareto, ScalarWeight, SearchConfig, SearchStats,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Single-criterion shortest path
    Scalar,
    /// Two-criteria Pareto front
    Pareto,
}

#[derive(Parser)]
#[command(name = "path-probe")]
#[command(about = "Label search probe on a generated grid graph", long_about = None)]
struct Cli {
    /// Policy to run
    #[arg(long, value_enum, default_value_t = Mode::Scalar)]
    mode: Mode,

    /// Grid rows
    #[arg(long, default_value_t = 64)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 64)]
    cols: usize,

    /// Largest edge weight (weights are drawn from 1..=max)
    #[arg(long, default_value_t = 100)]
    max_weight: u32,

    /// Seed for the weight generator
    #[arg(long, default_value_t = 0x9E37_79B9)]
    seed: u64,

    /// Search configuration as JSON, e.g. '{"pool":{"chunk_bytes":65536}}'
    #[arg(long)]
    config: Option<String>,

    /// Search the reversed graph from the last cell
    #[arg(long, default_value_t = false)]
    backward: bool,
}

#[derive(Serialize)]
struct Report {
    mode: &'static str,
    nodes: usize,
    edges: usize,
    config: SearchConfig,
    stats: SearchStats,
    target_labels: usize,
    target_cost: Option<Vec<u32>>,
}

fn weights(count: usize, max: u32, seed: u64) -> Vec<u32> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % u64::from(max.max(1))) as u32 + 1
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    anyhow::ensure!(cli.rows > 0 && cli.cols > 0, "grid must have at least one cell");

    let config: SearchConfig = match &cli.config {
        Some(text) => serde_json::from_str(text).context("Failed to parse --config")?,
        None => SearchConfig::default(),
    };

    let graph = AdjacencyGraph::grid(cli.rows, cli.cols);
    let last = cli.rows * cli.cols - 1;
    let (source, target, direction) = if cli.backward {
        (last, 0, Direction::Backward)
    } else {
        (0, last, Direction::Forward)
    };

    let report = match cli.mode {
        Mode::Scalar => {
            let w = weights(graph.edge_count(), cli.max_weight, cli.seed);
            let mut search = LabelSearch::with_config(&graph, &w, ScalarWeight::new(), config);
            let cost = search
                .solve_to(source, target, direction)
                .context("Scalar search failed")?
                .terminal_cost();
            Report {
                mode: "scalar",
                nodes: cli.rows * cli.cols,
                edges: graph.edge_count(),
                config,
                stats: *search.stats(),
                target_labels: search.labels_at(target).count(),
                target_cost: cost.map(|c| vec![c]),
            }
        }
        Mode::Pareto => {
            let a = weights(graph.edge_count(), cli.max_weight, cli.seed);
            let b = weights(graph.edge_count(), cli.max_weight, cli.seed.rotate_left(32));
            let w: Vec<[u32; 2]> = a.into_iter().zip(b).map(|(x, y)| [x, y]).collect();
            let mut search = LabelSearch::with_config(&graph, &w, Pareto::<u32, 2>::new(), config);
            search
                .solve(source, |_| false, direction)
                .context("Pareto search failed")?;
            let cost = search
                .resident(target)
                .and_then(|id| search.label(id))
                .map(|label| label.payload().to_vec());
            Report {
                mode: "pareto",
                nodes: cli.rows * cli.cols,
                edges: graph.edge_count(),
                config,
                stats: *search.stats(),
                target_labels: search.labels_at(target).count(),
                target_cost: cost,
            }
        }
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}
