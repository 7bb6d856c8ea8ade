use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cluegrid::{certify, BoardBuilder, BoardLinter, BoardSpec, Complexity, EngineConfig, PlaceholderLinter, Position};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Lint a generated board specification and decide whether it is fit to play.
#[derive(Parser, Debug)]
#[command(name = "checker", version)]
struct Args {
    /// Board specification JSON file
    spec: PathBuf,

    /// Engine configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reachability bar in percent, overriding the configuration
    #[arg(long)]
    threshold: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.reachability_threshold = threshold;
        config.validate().context("invalid --threshold")?;
    }
    Ok(config)
}

fn kinds(complexity: &Complexity) -> BTreeMap<String, usize> {
    complexity
        .by_kind
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(kind, count)| (kind.to_string(), *count))
        .collect()
}

fn cycle_text(cycle: &[Position]) -> String {
    cycle.iter().map(ToString::to_string).collect::<Vec<_>>().join(" <-> ")
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let args = Args::parse();

    let text = fs::read_to_string(&args.spec).with_context(|| format!("failed to read {}", args.spec.display()))?;
    let spec = BoardSpec::from_json(&text).with_context(|| format!("failed to decode {}", args.spec.display()))?;
    let config = load_config(&args)?;
    debug!(path = %args.spec.display(), items = spec.items.len(), "loaded board specification");

    let linter = PlaceholderLinter::new().context("failed to compile clue patterns")?;
    let lint = linter.lint(&spec);

    let board = BoardBuilder::from_spec(&spec).config(config.clone()).build().ok();
    let complexity = board.as_ref().and_then(|b| b.graph()).map(|g| g.complexity());
    let cycles = board.as_ref().and_then(|b| b.graph()).map(|g| g.gating_cycles()).unwrap_or_default();
    let report = board.as_ref().map(|b| b.starter_reachability());

    let verdict = certify(&spec, &linter, &config);

    if args.json {
        let output = json!({
            "category": spec.category,
            "grid_size": spec.grid_size,
            "lint": lint.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "relationships": complexity.as_ref().map(|c| json!({
                "total": c.total,
                "by_kind": kinds(c),
                "many_to_many": c.many_to_many,
                "max_positions": c.max_positions,
            })),
            "gating_cycles": cycles,
            "reachability": report,
            "certified": verdict.is_ok(),
            "rejection": verdict.as_ref().err().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} ({}x{})", spec.category, spec.grid_size, spec.grid_size);

        if lint.is_empty() {
            println!("lint: clean");
        } else {
            println!("lint: {} issue(s)", lint.len());
            for issue in &lint {
                println!("  - {issue}");
            }
        }

        match &complexity {
            Some(c) => {
                let by_kind = kinds(c).iter().map(|(k, n)| format!("{k} {n}")).collect::<Vec<_>>().join(", ");
                println!(
                    "relationships: {} ({by_kind}), {} many-to-many, widest names {} positions",
                    c.total, c.many_to_many, c.max_positions
                );
            }
            None => println!("relationships: none, revealing by references"),
        }
        for cycle in &cycles {
            println!("gating cycle: {}", cycle_text(cycle));
        }
        if let Some(report) = &report {
            println!("reachability: {report}");
        }

        match &verdict {
            Ok(_) => println!("certified"),
            Err(rejection) => println!("{rejection}"),
        }
    }

    Ok(if verdict.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
